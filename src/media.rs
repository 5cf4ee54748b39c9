//! Shared helpers for the batch video utilities.
//!
//! The utilities run at content-authoring time only: they enumerate the video
//! directory, shell out to ffmpeg, and never touch the site at runtime beyond
//! producing the files it references by path.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use walkdir::WalkDir;

/// Console logging for the batch tools; `RUST_LOG` overrides the level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

/// Extensions the batch tools treat as video input.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi"];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lists video files directly inside `dir`, sorted by name. A missing or
/// unreadable directory is a hard error; an empty one is not.
pub fn list_video_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to read video directory {}", dir.display()))?;
        if entry.file_type().is_file() && is_video_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Output name for a compressed video: original stem, always `.mp4`.
pub fn compressed_output_name(input: &Path) -> String {
    format!("{}.mp4", stem(input))
}

/// Output name for an extracted thumbnail: original stem, always `.jpg`.
pub fn thumbnail_output_name(input: &Path) -> String {
    format!("{}.jpg", stem(input))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name(path))
}

pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB)
}

fn ffmpeg_binary() -> String {
    std::env::var("FFMPEG").unwrap_or_else(|_| "ffmpeg".into())
}

/// Runs ffmpeg with the given arguments, surfacing its stderr on failure.
pub fn run_ffmpeg(args: &[String]) -> Result<()> {
    let binary = ffmpeg_binary();
    let output = Command::new(&binary)
        .args(args)
        .output()
        .with_context(|| format!("failed to launch {binary}; is ffmpeg on your PATH?"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg exited with {}: {}", output.status, stderr.trim());
    }
    Ok(())
}

/// Web-optimization settings for the compression pass.
#[derive(Debug, Clone)]
pub struct CompressionSettings {
    /// Constant rate factor, 0-51; higher compresses more.
    pub crf: u32,
    /// x264 preset; slower presets trade time for size.
    pub preset: String,
    /// Width cap in pixels, aspect ratio preserved.
    pub max_width: u32,
    /// AAC audio bitrate, e.g. `96k`.
    pub audio_bitrate: String,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            crf: 28,
            preset: "slow".into(),
            max_width: 1280,
            audio_bitrate: "96k".into(),
        }
    }
}

/// ffmpeg arguments for one compression run.
pub fn compression_args(
    input: &Path,
    output: &Path,
    settings: &CompressionSettings,
) -> Vec<String> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-i".into(),
        input.display().to_string(),
        "-c:v".into(),
        "libx264".into(),
        "-crf".into(),
        settings.crf.to_string(),
        "-preset".into(),
        settings.preset.clone(),
        // Cap width, keep aspect, keep dimensions even for yuv420p.
        "-vf".into(),
        format!("scale='min({},iw)':-2", settings.max_width),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        settings.audio_bitrate.clone(),
        "-movflags".into(),
        "+faststart".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-y".into(),
        output.display().to_string(),
    ]
}

/// ffmpeg arguments for extracting a first-frame JPEG.
pub fn thumbnail_args(input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-ss".into(),
        "0".into(),
        "-i".into(),
        input.display().to_string(),
        "-vframes".into(),
        "1".into(),
        "-q:v".into(),
        "2".into(),
        "-y".into(),
        output.display().to_string(),
    ]
}

/// Rollup of one batch run. Byte totals cover successful files only, so a
/// failed transcode never skews the savings figure.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl BatchSummary {
    pub fn record_success(&mut self, input_bytes: u64, output_bytes: u64) {
        self.processed += 1;
        self.input_bytes += input_bytes;
        self.output_bytes += output_bytes;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Percent saved across successful files, `None` when nothing succeeded.
    pub fn savings_percent(&self) -> Option<f64> {
        if self.input_bytes == 0 {
            return None;
        }
        Some((1.0 - self.output_bytes as f64 / self.input_bytes as f64) * 100.0)
    }
}

#[derive(Debug, Serialize)]
pub struct SizeEntry {
    pub name: String,
    pub bytes: u64,
}

/// Per-file size report for the videos directory.
#[derive(Debug, Serialize)]
pub struct SizeReport {
    pub entries: Vec<SizeEntry>,
    pub total_bytes: u64,
}

impl SizeReport {
    pub fn collect(paths: &[PathBuf]) -> Result<Self> {
        let mut entries = Vec::with_capacity(paths.len());
        let mut total_bytes = 0u64;
        for path in paths {
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("failed to stat {}", path.display()))?;
            total_bytes += metadata.len();
            entries.push(SizeEntry {
                name: file_name(path),
                bytes: metadata.len(),
            });
        }
        Ok(Self {
            entries,
            total_bytes,
        })
    }

    pub fn average_bytes(&self) -> u64 {
        if self.entries.is_empty() {
            0
        } else {
            self.total_bytes / self.entries.len() as u64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_video_extensions_case_insensitively() {
        assert!(is_video_file(Path::new("clip.mp4")));
        assert!(is_video_file(Path::new("clip.MOV")));
        assert!(is_video_file(Path::new("clip.webm")));
        assert!(is_video_file(Path::new("clip.avi")));
        assert!(!is_video_file(Path::new("clip.mkv")));
        assert!(!is_video_file(Path::new("poster.jpg")));
        assert!(!is_video_file(Path::new("noextension")));
    }

    #[test]
    fn output_names_swap_extension_but_keep_stem() {
        assert_eq!(compressed_output_name(Path::new("a/b/demo.mov")), "demo.mp4");
        assert_eq!(compressed_output_name(Path::new("demo.mp4")), "demo.mp4");
        assert_eq!(thumbnail_output_name(Path::new("a/demo.webm")), "demo.jpg");
    }

    #[test]
    fn compression_args_encode_the_web_profile() {
        let settings = CompressionSettings::default();
        let args = compression_args(Path::new("in.mov"), Path::new("out/in.mp4"), &settings);
        let joined = args.join(" ");
        assert!(joined.contains("-c:v libx264"));
        assert!(joined.contains("-crf 28"));
        assert!(joined.contains("-preset slow"));
        assert!(joined.contains("scale='min(1280,iw)':-2"));
        assert!(joined.contains("-b:a 96k"));
        assert!(joined.contains("-movflags +faststart"));
        assert!(joined.contains("-pix_fmt yuv420p"));
        assert!(args.ends_with(&["-y".to_string(), "out/in.mp4".to_string()]));
    }

    #[test]
    fn thumbnail_args_grab_the_first_frame() {
        let args = thumbnail_args(Path::new("in.mp4"), Path::new("thumbs/in.jpg"));
        let joined = args.join(" ");
        assert!(joined.contains("-ss 0"));
        assert!(joined.contains("-vframes 1"));
        assert!(joined.contains("-q:v 2"));
    }

    #[test]
    fn summary_counts_successes_only() {
        let mut summary = BatchSummary::default();
        summary.record_success(10_000_000, 4_000_000);
        summary.record_failure();
        summary.record_success(20_000_000, 8_000_000);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.input_bytes, 30_000_000);
        let savings = summary.savings_percent().unwrap();
        assert!((savings - 60.0).abs() < 1e-9);
    }

    #[test]
    fn summary_with_no_successes_reports_no_savings() {
        let mut summary = BatchSummary::default();
        summary.record_failure();
        assert_eq!(summary.savings_percent(), None);
    }

    #[test]
    fn formats_sizes_in_megabytes() {
        assert_eq!(format_size_mb(1024 * 1024), "1.00 MB");
        assert_eq!(format_size_mb(3 * 1024 * 1024 / 2), "1.50 MB");
    }
}
