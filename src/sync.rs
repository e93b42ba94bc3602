use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::feed::{FeedFailure, FeedSource, feed_file_name};

/// Outcome of mirroring the catalog into a directory.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub saved: Vec<String>,
    pub failures: Vec<FeedFailure>,
}

impl SyncReport {
    pub fn attempted(&self) -> usize {
        self.saved.len() + self.failures.len()
    }
}

/// Writes each feed to `<dir>/<season>_<competition>.csv` byte for byte. A failed
/// fetch leaves any existing file alone; only directory creation is fatal.
pub fn sync_feeds(catalog: &Catalog, source: &dyn FeedSource, dir: &Path) -> Result<SyncReport> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let mut report = SyncReport::default();
    for (season, competition) in catalog.feeds() {
        let file_name = feed_file_name(season, competition);
        let outcome = source
            .fetch(season, competition)
            .and_then(|body| write_atomic(&dir.join(&file_name), &body));
        match outcome {
            Ok(()) => {
                info!(file = %file_name, "saved");
                report.saved.push(file_name);
            }
            Err(err) => {
                let failure = FeedFailure {
                    season: season.label.clone(),
                    competition: competition.label.clone(),
                    cause: format!("{err:#}"),
                };
                warn!(file = %file_name, cause = %failure.cause, "download failed");
                report.failures.push(failure);
            }
        }
    }
    Ok(report)
}

fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    fs::write(&tmp, body).with_context(|| format!("write {}", tmp.display()))?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("swap {}", path.display()));
    }
    Ok(())
}
