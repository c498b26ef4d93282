//! Conjunctive faceted filtering over canonical records.

use std::collections::BTreeSet;

use crate::normalize::CanonicalRecord;

/// The five facet selectors. `None` means no constraint; set selectors
/// combine by logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Matched against the last four characters of `date`.
    pub year: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub agency: Option<String>,
    /// Case-insensitive substring match against `status`.
    pub status: Option<String>,
}

/// A record field that can populate a facet selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Year,
    Origin,
    Destination,
    Agency,
    Status,
}

impl std::str::FromStr for FilterField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "origin" => Ok(Self::Origin),
            "destination" => Ok(Self::Destination),
            "agency" => Ok(Self::Agency),
            "status" => Ok(Self::Status),
            other => Err(anyhow::anyhow!(
                "unknown filter field '{other}' (expected year, origin, destination, agency or status)"
            )),
        }
    }
}

/// The year facet of a date string: its last four characters. Shorter
/// values are returned whole. Char-boundary safe, never panics.
pub fn year_of(date: &str) -> &str {
    match date.char_indices().rev().nth(3) {
        Some((start, _)) => &date[start..],
        None => date,
    }
}

/// Applies the conjunction of all set selectors, preserving input order.
/// Total: a selector a record cannot satisfy excludes it, nothing more.
pub fn filter(records: &[CanonicalRecord], criteria: &FilterCriteria) -> Vec<CanonicalRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

// Predicates are checked in a fixed order (year, origin, destination,
// agency, status). The result is order-independent; determinism is for
// testability.
fn matches(record: &CanonicalRecord, criteria: &FilterCriteria) -> bool {
    if let Some(year) = &criteria.year {
        if year_of(&record.date) != year {
            return false;
        }
    }
    if let Some(origin) = &criteria.origin {
        if &record.origin != origin {
            return false;
        }
    }
    if let Some(destination) = &criteria.destination {
        if &record.destination != destination {
            return false;
        }
    }
    if let Some(agency) = &criteria.agency {
        if &record.agency != agency {
            return false;
        }
    }
    if let Some(status) = &criteria.status {
        if !record
            .status
            .to_uppercase()
            .contains(&status.to_uppercase())
        {
            return false;
        }
    }
    true
}

/// Sorted distinct non-empty values observed for `field`.
///
/// Callers must pass the FULL canonical collection, not a filtered subset,
/// so selector choices stay stable while a filter is active.
pub fn options(records: &[CanonicalRecord], field: FilterField) -> Vec<String> {
    let mut values: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        let value = match field {
            FilterField::Year => year_of(&record.date),
            FilterField::Origin => record.origin.as_str(),
            FilterField::Destination => record.destination.as_str(),
            FilterField::Agency => record.agency.as_str(),
            FilterField::Status => record.status.as_str(),
        };
        if !value.is_empty() {
            values.insert(value);
        }
    }
    values.into_iter().map(str::to_string).collect()
}
