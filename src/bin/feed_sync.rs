use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use h2h_terminal::config::{self, AppConfig};
use h2h_terminal::feed::HttpFeedSource;
use h2h_terminal::logging;
use h2h_terminal::sync::sync_feeds;

/// Downloads every catalog feed into a local directory for offline loading.
#[derive(Parser)]
#[command(name = "feed_sync")]
struct Args {
    #[arg(long, default_value = "./data")]
    dir: PathBuf,
}

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_logging();
    let args = Args::parse();

    let catalog = AppConfig::from_env().catalog();
    if catalog.feeds().is_empty() {
        return Err(anyhow!("no feeds selected"));
    }

    let source = HttpFeedSource::new(catalog.clone());
    let report = sync_feeds(&catalog, &source, &args.dir)?;

    println!("Feed sync complete");
    println!("Dir: {}", args.dir.display());
    println!("Saved: {}/{}", report.saved.len(), report.attempted());
    if !report.failures.is_empty() {
        println!("Errors: {}", report.failures.len());
        for failure in report.failures.iter().take(8) {
            println!(" - {failure}");
        }
    }
    Ok(())
}
