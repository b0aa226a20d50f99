//! Heuristic classification of page tables into dataset kinds.
//!
//! A country/season page renders several tables whose positions and counts
//! vary. Each dataset kind is found by one declarative rule: scan a fixed
//! window of table indexes in order and take the first table whose header
//! set satisfies the rule's predicate.
//!
//! An exhausted window is not an error — the page simply carries no data for
//! that kind. Callers skip persistence and bump a diagnostic counter, since
//! this policy also silently tolerates site layout drift.

use crate::models::{DatasetKind, RawTable};

/// Header predicate of a classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPredicate {
    /// Any table matches; the first index in the window wins.
    Any,
    /// The header set must contain this exact label. Exact containment,
    /// never prefix or substring matching.
    ContainsLabel(&'static str),
}

impl HeaderPredicate {
    fn matches(self, table: &RawTable) -> bool {
        match self {
            HeaderPredicate::Any => true,
            HeaderPredicate::ContainsLabel(label) => table.headers.iter().any(|h| h == label),
        }
    }
}

/// One classification rule: scan table indexes `[0, scan_window)` in order,
/// first predicate match wins.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub kind: DatasetKind,
    pub scan_window: usize,
    pub predicate: HeaderPredicate,
}

/// The site's table layout, as one rule per dataset kind:
/// - competition standings are always the first table, no inspection;
/// - the ranking table carries a `"Form (last 6)"` column within the first 4;
/// - the matches table carries an `"Away"` column within the first 5.
pub const RULES: [ClassificationRule; 3] = [
    ClassificationRule {
        kind: DatasetKind::Competition,
        scan_window: 1,
        predicate: HeaderPredicate::Any,
    },
    ClassificationRule {
        kind: DatasetKind::Ranking,
        scan_window: 4,
        predicate: HeaderPredicate::ContainsLabel("Form (last 6)"),
    },
    ClassificationRule {
        kind: DatasetKind::Matches,
        scan_window: 5,
        predicate: HeaderPredicate::ContainsLabel("Away"),
    },
];

/// Rule for a dataset kind. The rule table covers every kind.
pub fn rule_for(kind: DatasetKind) -> &'static ClassificationRule {
    RULES
        .iter()
        .find(|rule| rule.kind == kind)
        .unwrap_or(&RULES[0])
}

/// Apply a rule to the page's tables (in render order). Returns the first
/// matching table in the scan window, or `None` when the window is exhausted
/// — meaning "no data of this kind on this page", not an error.
pub fn classify<'t>(rule: &ClassificationRule, tables: &'t [RawTable]) -> Option<&'t RawTable> {
    tables
        .iter()
        .take(rule.scan_window)
        .find(|table| rule.predicate.matches(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: vec![],
        }
    }

    #[test]
    fn test_competition_is_first_table_without_inspection() {
        let tables = vec![table(&["Anything"]), table(&["Form (last 6)"])];
        let found = classify(rule_for(DatasetKind::Competition), &tables).unwrap();
        assert_eq!(found.headers, vec!["Anything"]);
    }

    #[test]
    fn test_competition_not_found_on_empty_page() {
        assert!(classify(rule_for(DatasetKind::Competition), &[]).is_none());
    }

    #[test]
    fn test_ranking_first_match_within_window() {
        let tables = vec![
            table(&["Team", "Points"]),
            table(&["Pos", "Team"]),
            table(&["Rank", "Team", "Form (last 6)"]),
            table(&["Rank", "Form (last 6)"]),
        ];
        let found = classify(rule_for(DatasetKind::Ranking), &tables).unwrap();
        assert_eq!(found.headers.len(), 3);
        // No earlier index in the window satisfies the predicate.
        for earlier in &tables[..2] {
            assert!(!earlier.headers.iter().any(|h| h == "Form (last 6)"));
        }
    }

    #[test]
    fn test_ranking_outside_window_is_not_found() {
        let tables = vec![
            table(&["A"]),
            table(&["B"]),
            table(&["C"]),
            table(&["D"]),
            table(&["Form (last 6)"]), // index 4, outside [0, 4)
        ];
        assert!(classify(rule_for(DatasetKind::Ranking), &tables).is_none());
    }

    #[test]
    fn test_exact_label_containment_not_substring() {
        let tables = vec![
            table(&["Form (last 6) extended"]),
            table(&["Away team"]),
            table(&["Away"]),
        ];
        assert!(classify(rule_for(DatasetKind::Ranking), &tables).is_none());
        let matches = classify(rule_for(DatasetKind::Matches), &tables).unwrap();
        assert_eq!(matches.headers, vec!["Away"]);
    }

    #[test]
    fn test_matches_window_is_five() {
        let mut tables: Vec<RawTable> = (0..5).map(|_| table(&["X"])).collect();
        tables.push(table(&["Home", "Away"])); // index 5, outside [0, 5)
        assert!(classify(rule_for(DatasetKind::Matches), &tables).is_none());

        tables[4] = table(&["Home", "Away"]);
        assert!(classify(rule_for(DatasetKind::Matches), &tables).is_some());
    }
}
