//! Re-encodes the site's videos for the web. Failures are per-file: a bad
//! input is logged and skipped, never aborting the batch.

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use portfolio_site::media::{self, BatchSummary, CompressionSettings};
    use std::fs;
    use std::path::PathBuf;
    use tracing::{error, info};

    #[derive(Parser)]
    #[command(about = "Compress the site's videos for web delivery via ffmpeg")]
    struct Args {
        /// Directory containing the source videos.
        #[arg(long, default_value = "public/videos")]
        input_dir: PathBuf,
        /// Directory the compressed videos are written to.
        #[arg(long, default_value = "public/videos-compressed")]
        output_dir: PathBuf,
        /// Constant rate factor (0-51, higher compresses more).
        #[arg(long, default_value_t = 28)]
        crf: u32,
        /// x264 encoding preset.
        #[arg(long, default_value = "slow")]
        preset: String,
        /// Width cap in pixels; aspect ratio is preserved.
        #[arg(long, default_value_t = 1280)]
        max_width: u32,
        /// AAC audio bitrate.
        #[arg(long, default_value = "96k")]
        audio_bitrate: String,
    }

    pub fn run() -> Result<()> {
        media::init_tracing();
        let args = Args::parse();

        let files = media::list_video_files(&args.input_dir)?;
        if files.is_empty() {
            info!(dir = %args.input_dir.display(), "no video files found");
            return Ok(());
        }

        fs::create_dir_all(&args.output_dir).with_context(|| {
            format!("failed to create output directory {}", args.output_dir.display())
        })?;

        let settings = CompressionSettings {
            crf: args.crf,
            preset: args.preset.clone(),
            max_width: args.max_width,
            audio_bitrate: args.audio_bitrate.clone(),
        };

        let mut summary = BatchSummary::default();
        for (index, input) in files.iter().enumerate() {
            let name = media::file_name(input);
            let output = args.output_dir.join(media::compressed_output_name(input));
            info!("[{}/{}] compressing {name}", index + 1, files.len());

            let input_bytes = match fs::metadata(input) {
                Ok(metadata) => metadata.len(),
                Err(err) => {
                    error!(file = %name, error = %err, "failed to stat input; skipping");
                    summary.record_failure();
                    continue;
                }
            };

            if let Err(err) = media::run_ffmpeg(&media::compression_args(input, &output, &settings))
            {
                error!(file = %name, error = %err, "compression failed; continuing");
                summary.record_failure();
                continue;
            }

            match fs::metadata(&output) {
                Ok(metadata) => {
                    let output_bytes = metadata.len();
                    let saved = (1.0 - output_bytes as f64 / input_bytes as f64) * 100.0;
                    info!(
                        "  {} -> {} ({saved:.1}% reduction)",
                        media::format_size_mb(input_bytes),
                        media::format_size_mb(output_bytes),
                    );
                    summary.record_success(input_bytes, output_bytes);
                }
                Err(err) => {
                    error!(file = %name, error = %err, "missing compressed output");
                    summary.record_failure();
                }
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            "compression complete"
        );
        if let Some(savings) = summary.savings_percent() {
            info!(
                "total {} -> {} ({savings:.1}% saved)",
                media::format_size_mb(summary.input_bytes),
                media::format_size_mb(summary.output_bytes),
            );
        }
        Ok(())
    }
}
