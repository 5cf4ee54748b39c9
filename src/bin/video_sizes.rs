//! Reports the on-disk size of every video the site ships.

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::Result;
    use clap::Parser;
    use portfolio_site::media::{self, SizeReport};
    use std::path::PathBuf;

    #[derive(Parser)]
    #[command(about = "Report per-file and total sizes of the site's videos")]
    struct Args {
        /// Directory containing the source videos.
        #[arg(long, default_value = "public/videos")]
        dir: PathBuf,
        /// Emit the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        media::init_tracing();
        let args = Args::parse();

        let files = media::list_video_files(&args.dir)?;
        if files.is_empty() {
            tracing::info!(dir = %args.dir.display(), "no video files found");
            return Ok(());
        }

        let report = SizeReport::collect(&files)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Video file sizes:");
        println!("{}", "-".repeat(72));
        for entry in &report.entries {
            println!(
                "{:<44} {:>12} ({} bytes)",
                entry.name,
                media::format_size_mb(entry.bytes),
                entry.bytes
            );
        }
        println!("{}", "-".repeat(72));
        println!(
            "Total: {} across {} file(s), average {}",
            media::format_size_mb(report.total_bytes),
            report.entries.len(),
            media::format_size_mb(report.average_bytes()),
        );
        Ok(())
    }
}
