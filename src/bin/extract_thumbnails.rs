//! Extracts a first-frame JPEG poster for each of the site's videos.

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
    use portfolio_site::media;
    use std::fs;
    use std::path::PathBuf;
    use tracing::{error, info};

    #[derive(Parser)]
    #[command(about = "Extract a first-frame poster image per video via ffmpeg")]
    struct Args {
        /// Directory containing the source videos.
        #[arg(long, default_value = "public/videos")]
        input_dir: PathBuf,
        /// Directory the thumbnails are written to.
        #[arg(long, default_value = "public/thumbnails")]
        output_dir: PathBuf,
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

        let mut extracted = 0usize;
        let mut failed = 0usize;
        for (index, input) in files.iter().enumerate() {
            let name = media::file_name(input);
            let output = args.output_dir.join(media::thumbnail_output_name(input));
            info!("[{}/{}] extracting {name}", index + 1, files.len());

            match media::run_ffmpeg(&media::thumbnail_args(input, &output)) {
                Ok(()) => extracted += 1,
                Err(err) => {
                    error!(file = %name, error = %err, "thumbnail extraction failed; continuing");
                    failed += 1;
                }
            }
        }

        info!(extracted, failed, dir = %args.output_dir.display(), "thumbnail extraction complete");
        Ok(())
    }
}
