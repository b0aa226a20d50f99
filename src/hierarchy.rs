//! Site hierarchy: country menu, per-country season menu, and derivation of
//! historical season paths.
//!
//! The home page carries two dropdown menus: the first lists countries, the
//! second lists the seasons of whatever country page is open. Historical
//! paths are not discovered — they are derived from each country's current
//! path by substituting the season token.

use crate::error::HarvestError;
use crate::models::{HistoryMap, NavigationEntry};
use crate::site::SitePage;
use tracing::debug;

/// Dropdown listing countries, present on every page.
pub const COUNTRY_MENU_INDEX: usize = 0;

/// Dropdown listing the open country's seasons.
pub const SEASON_MENU_INDEX: usize = 1;

/// Aggregate menu entry that is not a country and is never crawled.
const EXCLUDED_AGGREGATE: &str = "UEFA Competitions";

/// Historical seasons, year key → full label, most recent first.
pub const HISTORY_SEASONS: [(&str, &str); 4] = [
    ("2023", "2023-2024"),
    ("2022", "2022-2023"),
    ("2021", "2021-2022"),
    ("2020", "2020-2021"),
];

/// [`HISTORY_SEASONS`] as owned pairs, for crawler configuration.
pub fn default_history_seasons() -> Vec<(String, String)> {
    HISTORY_SEASONS
        .iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect()
}

/// Read the country menu, dropping the aggregate entry. Menu order is
/// preserved; it is the order countries are crawled in.
pub fn discover_countries<P: SitePage>(page: &P) -> Result<Vec<NavigationEntry>, HarvestError> {
    let countries: Vec<NavigationEntry> = page
        .menu_entries(COUNTRY_MENU_INDEX)?
        .into_iter()
        .filter(|entry| entry.label != EXCLUDED_AGGREGATE)
        .collect();
    debug!(count = countries.len(), "Discovered country menu");
    Ok(countries)
}

/// Read the season menu of the currently open country page. Collected per
/// country as the sweep visits it; bookkeeping only.
pub fn collect_season_menu<P: SitePage>(page: &P) -> Result<Vec<NavigationEntry>, HarvestError> {
    page.menu_entries(SEASON_MENU_INDEX)
}

/// Derive historical paths for every country by literal substitution of the
/// current season label inside the country's current path, one candidate per
/// configured historical label, most recent first.
///
/// The substitution is a raw text replace of every occurrence. If the current
/// label coincidentally appears elsewhere in a path the derived path is
/// wrong; that limitation is inherited from the site's URL scheme and is
/// deliberately not papered over with token-boundary heuristics. A path
/// containing no occurrence is returned unchanged.
pub fn resolve_history(
    countries: &[NavigationEntry],
    current_season: &str,
    history_seasons: &[(String, String)],
) -> HistoryMap {
    let mut history = HistoryMap::new();
    for country in countries {
        let paths = history_seasons
            .iter()
            .map(|(_, label)| country.path.replace(current_season, label))
            .collect();
        history.insert(country.label.clone(), paths);
    }
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawTable;

    struct MenuPage {
        menus: Vec<Vec<NavigationEntry>>,
    }

    impl SitePage for MenuPage {
        async fn navigate(&mut self, _path: &str) -> Result<(), HarvestError> {
            Ok(())
        }

        fn tables(&self) -> Vec<RawTable> {
            vec![]
        }

        fn menu_entries(&self, index: usize) -> Result<Vec<NavigationEntry>, HarvestError> {
            self.menus
                .get(index)
                .cloned()
                .ok_or(HarvestError::MenuMissing { index })
        }

        fn selected_season(&self) -> Option<String> {
            None
        }
    }

    fn entry(label: &str, path: &str) -> NavigationEntry {
        NavigationEntry {
            label: label.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_discover_countries_excludes_aggregate() {
        let page = MenuPage {
            menus: vec![vec![
                entry("England", "country/england/2023-2024"),
                entry("UEFA Competitions", "uefa/2023-2024"),
                entry("Spain", "country/spain/2023-2024"),
            ]],
        };
        let countries = discover_countries(&page).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].label, "England");
        assert_eq!(countries[1].label, "Spain");
    }

    #[test]
    fn test_discover_countries_missing_menu_is_fatal() {
        let page = MenuPage { menus: vec![] };
        assert!(matches!(
            discover_countries(&page),
            Err(HarvestError::MenuMissing { index: 0 })
        ));
    }

    #[test]
    fn test_resolve_history_substitutes_season_token() {
        let countries = vec![entry("England", "/england/2023-2024")];
        let seasons = vec![("2022".to_string(), "2022-2023".to_string())];
        let history = resolve_history(&countries, "2023-2024", &seasons);
        assert_eq!(history["England"], vec!["/england/2022-2023"]);
    }

    #[test]
    fn test_resolve_history_most_recent_first() {
        let countries = vec![entry("Spain", "country/spain/2023-2024/table")];
        let history = resolve_history(&countries, "2023-2024", &default_history_seasons());
        assert_eq!(
            history["Spain"],
            vec![
                "country/spain/2023-2024/table",
                "country/spain/2022-2023/table",
                "country/spain/2021-2022/table",
                "country/spain/2020-2021/table",
            ]
        );
    }

    #[test]
    fn test_resolve_history_without_occurrence_keeps_path() {
        let countries = vec![entry("England", "/england/current")];
        let seasons = vec![("2021".to_string(), "2021-2022".to_string())];
        let history = resolve_history(&countries, "2023-2024", &seasons);
        assert_eq!(history["England"], vec!["/england/current"]);
    }
}
