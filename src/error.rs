//! Error taxonomy for the harvester.
//!
//! Only conditions that abort a run are errors. A dataset table missing from
//! a page is a classification outcome (`None`), and a malformed row is a
//! counter — neither appears here.

use thiserror::Error;

/// Fatal conditions. None of these is retried; each aborts the sweep.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The page did not load within the navigation timeout.
    #[error("navigation to {path} timed out after {timeout_secs}s")]
    NavigationTimeout { path: String, timeout_secs: u64 },

    /// Any other navigation failure (connection refused, bad status, ...).
    #[error("navigation to {path} failed: {source}")]
    Navigation {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page URL could not be resolved against the site base URL.
    #[error("invalid path {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// A navigation menu the hierarchy depends on is not present. The run
    /// cannot proceed without the country/season hierarchy.
    #[error("navigation menu {index} not present on page")]
    MenuMissing { index: usize },

    /// The "Selected season:" heading is missing, so records for the page
    /// cannot be season-tagged.
    #[error("selected-season heading not present on page")]
    SeasonHeadingMissing,

    /// A delete or append against the relational store failed.
    #[error("store write failed: {0}")]
    StoreWrite(#[from] sqlx::Error),

    /// Rewriting a snapshot document failed.
    #[error("snapshot write failed: {0}")]
    SnapshotWrite(#[from] std::io::Error),

    /// Record serialization failed while writing a snapshot or store payload.
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
