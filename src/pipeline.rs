//! Season-scoped persistence plus cumulative JSON snapshots.
//!
//! Two policies, depending on sweep mode:
//!
//! - A current-season sweep first purges every stored row of the current
//!   season (one delete per dataset kind, keyed by the short year key), then
//!   appends each page's records. Rerunning the whole sweep is idempotent at
//!   season granularity. A sweep that aborts partway leaves some countries
//!   purged but not yet re-appended; there is no transaction spanning the
//!   purge and the appends.
//! - A history sweep never purges. Rerunning one without external cleanup
//!   duplicates historical rows.
//!
//! In parallel, the pipeline accumulates one snapshot per dataset kind
//! (`country → season → records`) and rewrites the whole JSON document after
//! every page, so the on-disk file is always valid for what has been
//! collected so far.

use crate::error::HarvestError;
use crate::models::{season_key, DatasetKind, DatasetRecord, Snapshot};
use crate::store::EloStore;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Owns the per-kind snapshot accumulators and drives store writes. One
/// instance lives for one run; no state is shared behind it.
pub struct LoadPipeline {
    output_dir: PathBuf,
    competition: Snapshot,
    ranking: Snapshot,
    matches: Snapshot,
}

impl LoadPipeline {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            competition: Snapshot::new(),
            ranking: Snapshot::new(),
            matches: Snapshot::new(),
        }
    }

    /// Current-season purge: one delete per dataset kind, keyed by the year
    /// key of the label (`"2023"` for `"2023-2024"`). Issued once, before
    /// any country is visited. Returns the total number of rows removed.
    #[instrument(level = "info", skip(self, store))]
    pub async fn purge_current_season<S: EloStore>(
        &self,
        store: &S,
        current_season: &str,
    ) -> Result<u64, HarvestError> {
        let key = season_key(current_season);
        let mut removed = 0;
        for kind in DatasetKind::ALL {
            removed += store.delete_season(kind, key).await?;
        }
        info!(season = key, rows = removed, "Purged current season from store");
        Ok(removed)
    }

    /// Load one page's records for one dataset kind: append to the store,
    /// insert into the kind's snapshot at `[country][season]`, and rewrite
    /// the snapshot document.
    pub async fn load<S: EloStore>(
        &mut self,
        store: &S,
        kind: DatasetKind,
        country: &str,
        season: &str,
        records: Vec<DatasetRecord>,
    ) -> Result<(), HarvestError> {
        store.append_records(kind, &records).await?;
        debug!(
            kind = kind.name(),
            country,
            season,
            records = records.len(),
            "Appended records to store"
        );

        self.snapshot_mut(kind)
            .entry(country.to_string())
            .or_default()
            .insert(season.to_string(), records);
        self.write_snapshot(kind).await
    }

    pub fn snapshot(&self, kind: DatasetKind) -> &Snapshot {
        match kind {
            DatasetKind::Competition => &self.competition,
            DatasetKind::Ranking => &self.ranking,
            DatasetKind::Matches => &self.matches,
        }
    }

    fn snapshot_mut(&mut self, kind: DatasetKind) -> &mut Snapshot {
        match kind {
            DatasetKind::Competition => &mut self.competition,
            DatasetKind::Ranking => &mut self.ranking,
            DatasetKind::Matches => &mut self.matches,
        }
    }

    /// Rewrite the whole document for `kind`. Writing everything each time
    /// costs O(pages visited) bytes over a run but keeps the file valid JSON
    /// at every point.
    async fn write_snapshot(&self, kind: DatasetKind) -> Result<(), HarvestError> {
        fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(kind.snapshot_file());
        let json = serde_json::to_string_pretty(self.snapshot(kind))?;
        fs::write(&path, json).await?;
        debug!(path = %path.display(), "Rewrote snapshot");
        Ok(())
    }
}
