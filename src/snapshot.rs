use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::BuildError;
use crate::feed::{FeedFailure, FeedSource, LoadReport, load_feeds};
use crate::merge::{RawMatch, merge_feeds};
use crate::reshape::{TeamMatchEvent, reshape};

/// Read-only tables built from one complete feed load.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub catalog: Catalog,
    pub matches: Vec<RawMatch>,
    pub events: Vec<TeamMatchEvent>,
    pub failures: Vec<FeedFailure>,
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Zero loaded feeds is fatal; anything else builds.
    pub fn from_report(catalog: Catalog, report: LoadReport) -> Result<Self, BuildError> {
        if report.feeds.is_empty() {
            return Err(BuildError::NoFeeds {
                failures: report.failures,
            });
        }
        let matches = merge_feeds(&report.feeds);
        let events = reshape(&matches);
        Ok(Self {
            catalog,
            matches,
            events,
            failures: report.failures,
            built_at: Utc::now(),
        })
    }
}

pub fn build_snapshot(
    catalog: &Catalog,
    source: &dyn FeedSource,
    parallelism: usize,
) -> Result<Snapshot, BuildError> {
    let report = load_feeds(catalog, source, parallelism);
    let snapshot = Snapshot::from_report(catalog.clone(), report)?;
    info!(
        matches = snapshot.matches.len(),
        events = snapshot.events.len(),
        failed_feeds = snapshot.failures.len(),
        "snapshot built"
    );
    Ok(snapshot)
}

/// Holds the currently published snapshot. Readers clone the `Arc` and keep a
/// consistent view for as long as they hold it.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Builds outside the lock, then swaps. On failure the previous snapshot stays.
    pub fn refresh(
        &self,
        catalog: &Catalog,
        source: &dyn FeedSource,
        parallelism: usize,
    ) -> Result<Arc<Snapshot>, BuildError> {
        match build_snapshot(catalog, source, parallelism) {
            Ok(snapshot) => Ok(self.publish(snapshot)),
            Err(err) => {
                warn!(error = %err, kept_previous = self.current().is_some(), "refresh failed");
                Err(err)
            }
        }
    }
}
