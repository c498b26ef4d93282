//! CSV row parser for manifest exports.
//!
//! The exports come from different systems: the raw dumps use `;`, the
//! re-published files `,`. The delimiter is sniffed from the header line,
//! then every data row is paired with its header into a raw key -> value
//! mapping for the normalizer.

use anyhow::Result;
use tracing::debug;

use crate::normalize::RawRecord;

// Sniffing candidates, in preference order on ties.
static DELIMITERS: &[u8] = b";,|\t";

fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for &candidate in DELIMITERS {
        let count = header_line.matches(candidate as char).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parses CSV bytes into one key -> value mapping per data row.
///
/// Bytes are decoded as UTF-8 with lossy replacement, the delimiter is
/// sniffed from the header line, and rows shorter than the header are
/// padded with empty strings. Fully empty rows are skipped.
///
/// # Errors
///
/// Returns an error only when the CSV structure itself is unreadable.
/// Cell-level oddities are not errors here; they surface downstream as
/// empty canonical fields.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let text = String::from_utf8_lossy(bytes);
    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = sniff_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut raw = RawRecord::new();
        for (i, header) in headers.iter().enumerate() {
            raw.insert(header.clone(), record.get(i).unwrap_or("").to_string());
        }
        rows.push(raw);
    }

    debug!(
        rows = rows.len(),
        delimiter = %(delimiter as char),
        "CSV source parsed"
    );

    Ok(rows)
}
