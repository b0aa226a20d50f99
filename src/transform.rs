//! Normalization of raw table cells into tagged records.
//!
//! The transform is a pure function of `(table, country, season)`: no I/O,
//! no clock, deterministic output. Each body row becomes exactly one record
//! unless its cell count differs from the header count, in which case that
//! row alone is rejected and counted. Row order is preserved — standings
//! order and fixture order carry meaning.

use crate::models::{DatasetKind, DatasetRecord, RawTable};
use serde_json::{Map, Number, Value};
use tracing::debug;

/// Cells the site renders for "no value". Stored as JSON null rather than
/// failing the row.
const PLACEHOLDER_CELLS: [&str; 4] = ["", "-", "—", "N/A"];

/// Result of one table transform: the records plus the count of rows
/// rejected for a header/cell count mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub records: Vec<DatasetRecord>,
    pub malformed_rows: usize,
}

/// Map a classified table to tagged records.
///
/// Column names are the header labels normalized to snake_case, deduplicated
/// and kept in header order. Numeric-looking cells are parsed to JSON
/// numbers; placeholder cells become null; everything else stays text.
pub fn transform(
    kind: DatasetKind,
    table: &RawTable,
    country: &str,
    season: &str,
) -> TransformOutput {
    let columns = column_names(&table.headers);
    let mut records = Vec::with_capacity(table.rows.len());
    let mut malformed_rows = 0;

    for (index, row) in table.rows.iter().enumerate() {
        if row.len() != table.headers.len() {
            malformed_rows += 1;
            debug!(
                kind = kind.name(),
                row = index,
                cells = row.len(),
                headers = table.headers.len(),
                "Rejecting malformed row"
            );
            continue;
        }

        let mut fields = Map::new();
        for (column, cell) in columns.iter().zip(row) {
            fields.insert(column.clone(), parse_cell(cell));
        }
        records.push(DatasetRecord {
            country: country.to_string(),
            season: season.to_string(),
            fields,
        });
    }

    TransformOutput {
        records,
        malformed_rows,
    }
}

/// Normalized, deduplicated column names in header order. `"country"` and
/// `"season"` are reserved for the record tags, so site columns can never
/// shadow them.
fn column_names(headers: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());
    let mut used: Vec<String> = vec!["country".to_string(), "season".to_string()];

    for (index, header) in headers.iter().enumerate() {
        let mut base = normalize_column(header);
        if base.is_empty() {
            base = format!("column_{index}");
        }
        let mut candidate = base.clone();
        let mut suffix = 2;
        while used.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        used.push(candidate.clone());
        names.push(candidate);
    }
    names
}

/// `"Form (last 6)"` → `"form_last_6"`.
fn normalize_column(header: &str) -> String {
    let mut name = String::with_capacity(header.len());
    let mut last_was_separator = true;
    for ch in header.chars() {
        if ch.is_alphanumeric() {
            name.extend(ch.to_lowercase());
            last_was_separator = false;
        } else if !last_was_separator {
            name.push('_');
            last_was_separator = true;
        }
    }
    name.trim_end_matches('_').to_string()
}

fn parse_cell(cell: &str) -> Value {
    let text = cell.trim();
    if PLACEHOLDER_CELLS.contains(&text) {
        return Value::Null;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(float) = text.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    Value::String(text.to_string())
}
