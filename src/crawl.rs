//! Crawl orchestration: discover the hierarchy, then sweep pages.
//!
//! A run is strictly sequential — one page handle, one store — and follows
//! `Init → discover hierarchy → {current-season sweep | history sweep} →
//! done`. Every page visit runs the same extraction: classify the rendered
//! tables, transform the matches, load records through the pipeline.
//!
//! Failure policy: a navigation timeout or store failure aborts the sweep
//! with no retry; a dataset kind whose classification rule finds no table is
//! skipped for that page only and counted.

use crate::classify;
use crate::error::HarvestError;
use crate::hierarchy;
use crate::models::{DatasetKind, HarvestStats, NavigationEntry};
use crate::pipeline::LoadPipeline;
use crate::site::SitePage;
use crate::store::EloStore;
use crate::transform;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Drives one run against a page handle and a store.
pub struct Crawler<P: SitePage, S: EloStore> {
    page: P,
    store: S,
    pipeline: LoadPipeline,
    current_season: String,
    history_seasons: Vec<(String, String)>,
    /// Season menu of each visited country, collected for bookkeeping.
    season_menus: BTreeMap<String, Vec<NavigationEntry>>,
    stats: HarvestStats,
}

impl<P: SitePage, S: EloStore> Crawler<P, S> {
    pub fn new(
        page: P,
        store: S,
        pipeline: LoadPipeline,
        current_season: String,
        history_seasons: Vec<(String, String)>,
    ) -> Self {
        Self {
            page,
            store,
            pipeline,
            current_season,
            history_seasons,
            season_menus: BTreeMap::new(),
            stats: HarvestStats::default(),
        }
    }

    /// Current-season sweep: purge the current season once, then visit every
    /// discovered country in menu order and append fresh records.
    #[instrument(level = "info", skip(self), fields(season = %self.current_season))]
    pub async fn run_current_season(&mut self) -> Result<HarvestStats, HarvestError> {
        info!("Starting current-season sweep");
        self.page.navigate("").await?;
        let countries = hierarchy::discover_countries(&self.page)?;
        info!(countries = countries.len(), "Hierarchy discovered");

        self.pipeline
            .purge_current_season(&self.store, &self.current_season)
            .await?;

        for country in &countries {
            self.visit_page(&country.label, &country.path).await?;
        }
        Ok(self.finish("current"))
    }

    /// History sweep: derive historical paths for every country by season
    /// token substitution, then visit country × season (country outer,
    /// most-recent-season first). Historical rows are appended without any
    /// purge; rerunning duplicates them unless the store is cleaned first.
    #[instrument(level = "info", skip(self), fields(season = %self.current_season))]
    pub async fn run_history(&mut self) -> Result<HarvestStats, HarvestError> {
        info!(
            seasons = self.history_seasons.len(),
            "Starting history sweep"
        );
        self.page.navigate("").await?;
        let countries = hierarchy::discover_countries(&self.page)?;
        let history =
            hierarchy::resolve_history(&countries, &self.current_season, &self.history_seasons);
        info!(countries = countries.len(), "Historical paths resolved");

        for country in &countries {
            let Some(paths) = history.get(&country.label) else {
                continue;
            };
            for path in paths {
                self.visit_page(&country.label, path).await?;
            }
        }
        Ok(self.finish("history"))
    }

    /// Extract all three dataset kinds from one page.
    async fn visit_page(&mut self, country: &str, path: &str) -> Result<(), HarvestError> {
        info!(country, path, "Visiting page");
        self.page.navigate(path).await?;

        let season = self
            .page
            .selected_season()
            .ok_or(HarvestError::SeasonHeadingMissing)?;
        let seasons = hierarchy::collect_season_menu(&self.page)?;
        debug!(country, menu_seasons = seasons.len(), "Collected season menu");
        self.season_menus.insert(country.to_string(), seasons);

        let tables = self.page.tables();
        for rule in &classify::RULES {
            match classify::classify(rule, &tables) {
                Some(table) => {
                    let output = transform::transform(rule.kind, table, country, &season);
                    self.stats.malformed_rows += output.malformed_rows;
                    self.stats.records_loaded += output.records.len();
                    self.pipeline
                        .load(&self.store, rule.kind, country, &season, output.records)
                        .await?;
                }
                None => {
                    self.stats.note_table_not_found(rule.kind);
                    warn!(
                        kind = rule.kind.name(),
                        country,
                        season,
                        "No table matched within scan window; skipping dataset for this page"
                    );
                }
            }
        }

        self.stats.pages_visited += 1;
        Ok(())
    }

    fn finish(&self, mode: &str) -> HarvestStats {
        info!(
            mode,
            pages = self.stats.pages_visited,
            records = self.stats.records_loaded,
            malformed_rows = self.stats.malformed_rows,
            competition_missing = self.stats.tables_not_found(DatasetKind::Competition),
            ranking_missing = self.stats.tables_not_found(DatasetKind::Ranking),
            matches_missing = self.stats.tables_not_found(DatasetKind::Matches),
            "Sweep complete"
        );
        self.stats.clone()
    }

    pub fn pipeline(&self) -> &LoadPipeline {
        &self.pipeline
    }

    pub fn season_menus(&self) -> &BTreeMap<String, Vec<NavigationEntry>> {
        &self.season_menus
    }
}
