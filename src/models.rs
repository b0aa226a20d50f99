//! Data models shared across the harvesting pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NavigationEntry`]: one item of a site navigation menu (country or season)
//! - [`RawTable`]: exact cell text of a rendered table, no type coercion
//! - [`DatasetKind`]: the three dataset families extracted from every page
//! - [`DatasetRecord`]: a normalized table row tagged with country and season
//! - [`Snapshot`] / [`HistoryMap`]: the accumulator shapes used by the pipeline
//!
//! Records keep their columns in header order; the JSON snapshots therefore
//! mirror the tables as rendered on the site.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One item of a navigation menu: display text plus a site-relative link.
///
/// Produced by hierarchy discovery and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    /// Display text, e.g. `"England"` or `"2022-2023"`.
    pub label: String,
    /// Site-relative link target, e.g. `"country/england/2023-2024"`.
    pub path: String,
}

/// A table as rendered on a page: header labels plus body rows of trimmed
/// cell text. No parsing happens at this level.
///
/// A row whose cell count differs from the header count is malformed; the
/// transformer rejects such rows individually.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The three dataset families extracted from every country/season page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Competition standings, always the first table on the page.
    Competition,
    /// Team ranking with Elo ratings and recent form.
    Ranking,
    /// Head-to-head match results.
    Matches,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Competition,
        DatasetKind::Ranking,
        DatasetKind::Matches,
    ];

    /// Store table the dataset is appended to.
    pub fn table_name(self) -> &'static str {
        match self {
            DatasetKind::Competition => "elo_competition",
            DatasetKind::Ranking => "elo_ranking",
            DatasetKind::Matches => "elo_matches",
        }
    }

    /// File name of the cumulative JSON snapshot for the dataset.
    pub fn snapshot_file(self) -> &'static str {
        match self {
            DatasetKind::Competition => "competition_data.json",
            DatasetKind::Ranking => "ranking_data.json",
            DatasetKind::Matches => "matches_data.json",
        }
    }

    /// Lowercase name used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            DatasetKind::Competition => "competition",
            DatasetKind::Ranking => "ranking",
            DatasetKind::Matches => "matches",
        }
    }
}

/// A normalized table row tagged with the country and season it was read
/// under.
///
/// `fields` maps snake_cased column names to parsed cell values (integer,
/// float, string, or null for placeholder cells) in header order. The
/// `season` tag is the full season label (`"2023-2024"`); the store derives
/// its partition key from it via [`season_key`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub country: String,
    pub season: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Cumulative per-kind accumulator: `country → season label → records`.
///
/// Fully rewritten to disk after every page so the on-disk document is
/// always valid JSON for whatever has been collected so far.
pub type Snapshot = BTreeMap<String, BTreeMap<String, Vec<DatasetRecord>>>;

/// Resolved historical paths per country, most-recent-season first.
pub type HistoryMap = BTreeMap<String, Vec<String>>;

/// Derive the store partition key from a season label: the substring before
/// the first `-`, e.g. `"2023"` from `"2023-2024"`. A label without a
/// separator is its own key.
pub fn season_key(label: &str) -> &str {
    label.split('-').next().unwrap_or(label)
}

/// Diagnostic counters for one run.
///
/// The classifier silently skips a dataset kind when its scan window is
/// exhausted; these counters are the visibility that policy requires. Logged
/// once at the end of a sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestStats {
    /// Pages successfully navigated to and extracted.
    pub pages_visited: usize,
    /// Per-kind count of pages where no table matched the classification rule.
    tables_not_found: [usize; 3],
    /// Rows rejected because their cell count did not match the header count.
    pub malformed_rows: usize,
    /// Records appended to the store across all kinds.
    pub records_loaded: usize,
}

impl HarvestStats {
    pub fn note_table_not_found(&mut self, kind: DatasetKind) {
        self.tables_not_found[kind as usize] += 1;
    }

    pub fn tables_not_found(&self, kind: DatasetKind) -> usize {
        self.tables_not_found[kind as usize]
    }
}
