//! Delimited record parser
//!
//! Converts the raw text of a regulations file into an ordered sequence of
//! [`Record`]s. Parsing is total: malformed rows are dropped, never reported
//! as errors.

use crate::record::{Field, Record};

/// Rows at the top of the file holding titles and metadata
pub const PREAMBLE_ROWS: usize = 4;

/// Every record id starts with this prefix
pub const ID_PREFIX: &str = "reg/";

/// Rows with fewer columns than this are not records
pub const MIN_COLUMNS: usize = 3;

/// Counters collected while mapping rows to records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Non-blank rows produced by the tokenizer
    pub rows: usize,
    /// Preamble rows skipped
    pub preamble: usize,
    /// Rows dropped for having too few columns
    pub short_rows: usize,
    /// Rows dropped because the id column is missing or lacks the prefix
    pub invalid_ids: usize,
    /// Records produced
    pub records: usize,
}

impl ParseStats {
    /// Total rows excluded after the preamble
    pub fn dropped(&self) -> usize {
        self.short_rows + self.invalid_ids
    }
}

/// Parse raw text into records
pub fn parse(text: &str) -> Vec<Record> {
    parse_with_stats(text).0
}

/// Parse raw text into records, also returning row counters
pub fn parse_with_stats(text: &str) -> (Vec<Record>, ParseStats) {
    let rows = parse_rows(text);
    let mut stats = ParseStats {
        rows: rows.len(),
        preamble: rows.len().min(PREAMBLE_ROWS),
        ..Default::default()
    };

    let id_column = Field::MetaId.column();
    let mut records = Vec::with_capacity(rows.len().saturating_sub(PREAMBLE_ROWS));

    for (index, row) in rows.iter().enumerate().skip(PREAMBLE_ROWS) {
        if row.len() < MIN_COLUMNS {
            log::debug!("Row {}: {} column(s), skipped", index + 1, row.len());
            stats.short_rows += 1;
            continue;
        }

        match row.get(id_column) {
            Some(id) if id.starts_with(ID_PREFIX) => {
                records.push(Record::from_row(row));
            }
            other => {
                log::debug!(
                    "Row {}: id {:?} does not start with {:?}, skipped",
                    index + 1,
                    other.map(String::as_str).unwrap_or(""),
                    ID_PREFIX
                );
                stats.invalid_ids += 1;
            }
        }
    }

    stats.records = records.len();
    (records, stats)
}

/// Split raw text into rows of trimmed fields.
///
/// Double quotes toggle quoted mode; inside quotes `""` is a literal quote
/// and commas and newlines are field content. Carriage returns outside quotes
/// are ignored. Rows whose fields are all empty are dropped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(field.trim().to_string());
                field.clear();
            }
            '\n' if !in_quotes => {
                row.push(field.trim().to_string());
                field.clear();
                push_row(&mut rows, std::mem::take(&mut row));
            }
            '\r' if !in_quotes => {}
            _ => field.push(ch),
        }
    }

    // Flush a final row that has no trailing newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field.trim().to_string());
        push_row(&mut rows, row);
    }

    rows
}

#[inline]
fn push_row(rows: &mut Vec<Vec<String>>, row: Vec<String>) {
    if row.iter().any(|f| !f.is_empty()) {
        rows.push(row);
    }
}
