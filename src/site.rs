//! Page boundary: navigation and DOM queries against the source site.
//!
//! The crawler only ever talks to [`SitePage`], which models the handful of
//! primitives the site requires:
//!
//! - navigate to a site-relative path (bounded by a fixed timeout)
//! - list the table-like elements on the current page, in render order
//! - read a navigation dropdown menu by position
//! - read the "Selected season:" heading
//!
//! [`HttpPage`] is the production implementation over `reqwest` + `scraper`.
//! The site renders its tables server-side, so plain HTTP fetching is
//! sufficient; the raw document is kept and re-parsed per query so the page
//! handle stays `Send`.

use crate::error::HarvestError;
use crate::models::{NavigationEntry, RawTable};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Every navigation must complete within this bound; exceeding it is fatal.
pub const NAVIGATION_TIMEOUT_SECS: u64 = 60;

/// CSS class combination the site uses for all three dataset tables.
const TABLE_SELECTOR: &str = ".sortable.fixed.primary";

/// Container class of both navigation dropdowns (countries, seasons).
const MENU_SELECTOR: &str = ".dropdown-menu";

/// Marker text of the heading that names the season a page is showing.
const SEASON_MARKER: &str = "Selected season:";

/// Navigation and DOM-query primitives of the source site.
///
/// Implementations are driven strictly sequentially; `navigate` replaces the
/// current document and the query methods read from it.
#[allow(async_fn_in_trait)]
pub trait SitePage {
    /// Load the page at a site-relative path. A timeout is fatal and is
    /// never retried.
    async fn navigate(&mut self, path: &str) -> Result<(), HarvestError>;

    /// All table-like elements on the current page, in render order.
    fn tables(&self) -> Vec<RawTable>;

    /// Entries of the dropdown menu at `index` (0 = countries, 1 = seasons).
    /// A missing menu is fatal: the hierarchy cannot be discovered without it.
    fn menu_entries(&self, index: usize) -> Result<Vec<NavigationEntry>, HarvestError>;

    /// Season label from the "Selected season:" heading, if present.
    fn selected_season(&self) -> Option<String>;
}

/// [`SitePage`] over plain HTTP: one `reqwest` client, one current document.
pub struct HttpPage {
    client: reqwest::Client,
    base: Url,
    document: String,
}

impl HttpPage {
    /// Build a page handle rooted at `base`. The client carries the fixed
    /// navigation timeout.
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(NAVIGATION_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base,
            document: String::new(),
        })
    }

    fn html(&self) -> Html {
        Html::parse_document(&self.document)
    }
}

impl SitePage for HttpPage {
    #[instrument(level = "debug", skip(self))]
    async fn navigate(&mut self, path: &str) -> Result<(), HarvestError> {
        let url = self
            .base
            .join(path)
            .map_err(|source| HarvestError::InvalidPath {
                path: path.to_string(),
                source,
            })?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| {
                if source.is_timeout() {
                    HarvestError::NavigationTimeout {
                        path: path.to_string(),
                        timeout_secs: NAVIGATION_TIMEOUT_SECS,
                    }
                } else {
                    HarvestError::Navigation {
                        path: path.to_string(),
                        source,
                    }
                }
            })?;

        self.document = response
            .text()
            .await
            .map_err(|source| HarvestError::Navigation {
                path: path.to_string(),
                source,
            })?;

        debug!(%url, bytes = self.document.len(), "Loaded page");
        Ok(())
    }

    fn tables(&self) -> Vec<RawTable> {
        let document = self.html();
        let table_selector = Selector::parse(TABLE_SELECTOR).unwrap();
        let head_row_selector = Selector::parse("thead tr").unwrap();
        let body_row_selector = Selector::parse("tbody tr").unwrap();
        let cell_selector = Selector::parse("th, td").unwrap();

        document
            .select(&table_selector)
            .map(|table| {
                let headers = table
                    .select(&head_row_selector)
                    .next()
                    .map(|row| cell_texts(row, &cell_selector))
                    .unwrap_or_default();
                let rows = table
                    .select(&body_row_selector)
                    .map(|row| cell_texts(row, &cell_selector))
                    .collect();
                RawTable { headers, rows }
            })
            .collect()
    }

    fn menu_entries(&self, index: usize) -> Result<Vec<NavigationEntry>, HarvestError> {
        let document = self.html();
        let menu_selector = Selector::parse(MENU_SELECTOR).unwrap();
        let link_selector = Selector::parse("a").unwrap();

        let menu = document
            .select(&menu_selector)
            .nth(index)
            .ok_or(HarvestError::MenuMissing { index })?;

        let entries = menu
            .select(&link_selector)
            .filter_map(|link| {
                let path = link.value().attr("href")?;
                let label = link.text().collect::<String>().trim().to_string();
                Some(NavigationEntry {
                    label,
                    path: path.to_string(),
                })
            })
            .collect();
        Ok(entries)
    }

    fn selected_season(&self) -> Option<String> {
        let document = self.html();
        let heading_selector = Selector::parse("h1, h2, h3, h4, h5, h6").unwrap();

        document.select(&heading_selector).find_map(|heading| {
            let text = heading.text().collect::<String>();
            let (_, season) = text.split_once(SEASON_MARKER)?;
            Some(season.trim().to_string())
        })
    }
}

fn cell_texts(row: ElementRef<'_>, cell_selector: &Selector) -> Vec<String> {
    row.select(cell_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(document: &str) -> HttpPage {
        HttpPage {
            client: reqwest::Client::new(),
            base: Url::parse("http://elofootball.com/").unwrap(),
            document: document.to_string(),
        }
    }

    const PAGE: &str = r#"
        <html><body>
        <h2>Selected season: 2023-2024</h2>
        <ul class="dropdown-menu">
            <li><a href="country/england/2023-2024">England</a></li>
            <li><a href="country/spain/2023-2024">Spain</a></li>
        </ul>
        <ul class="dropdown-menu">
            <li><a href="country/england/2022-2023">2022-2023</a></li>
        </ul>
        <table class="sortable fixed primary">
            <thead><tr><th>Team</th><th>Points</th></tr></thead>
            <tbody>
                <tr><td>Arsenal</td><td>89</td></tr>
                <tr><td> Chelsea </td><td>63</td></tr>
            </tbody>
        </table>
        <table class="sortable fixed primary">
            <thead><tr><th>Rank</th><th>Team</th><th>Form (last 6)</th></tr></thead>
            <tbody><tr><td>1</td><td>Arsenal</td><td>WWWWWW</td></tr></tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_tables_in_render_order_with_trimmed_cells() {
        let page = page_with(PAGE);
        let tables = page.tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers, vec!["Team", "Points"]);
        assert_eq!(tables[0].rows[1], vec!["Chelsea", "63"]);
        assert_eq!(tables[1].headers, vec!["Rank", "Team", "Form (last 6)"]);
    }

    #[test]
    fn test_menu_entries_by_index() {
        let page = page_with(PAGE);
        let countries = page.menu_entries(0).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].label, "England");
        assert_eq!(countries[0].path, "country/england/2023-2024");

        let seasons = page.menu_entries(1).unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].label, "2022-2023");
    }

    #[test]
    fn test_missing_menu_is_fatal() {
        let page = page_with("<html><body></body></html>");
        let err = page.menu_entries(0).unwrap_err();
        assert!(matches!(err, HarvestError::MenuMissing { index: 0 }));
    }

    #[test]
    fn test_selected_season_heading() {
        let page = page_with(PAGE);
        assert_eq!(page.selected_season().as_deref(), Some("2023-2024"));
    }

    #[test]
    fn test_selected_season_absent() {
        let page = page_with("<html><body><h1>Elo ratings</h1></body></html>");
        assert_eq!(page.selected_season(), None);
    }

    #[test]
    fn test_table_without_thead_yields_empty_headers() {
        let page = page_with(
            r#"<table class="sortable fixed primary">
               <tbody><tr><td>1</td></tr></tbody></table>"#,
        );
        let tables = page.tables();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].headers.is_empty());
        assert_eq!(tables[0].rows, vec![vec!["1".to_string()]]);
    }
}
