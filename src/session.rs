//! Immutable dataset session and the views derived from it.
//!
//! A [`Session`] owns the canonical record sequence for one loaded dataset.
//! Nothing mutates it afterwards: every filter change derives a complete
//! fresh [`DatasetView`] that replaces the previous one wholesale, so a
//! partially updated view is never observable.

use crate::filter::{self, FilterCriteria, FilterField};
use crate::flights::{self, FlightRecord};
use crate::normalize::{self, CanonicalRecord, RawRecord};
use crate::summary::{self, SummaryStats};

/// The loaded dataset: canonical records in source row order, concatenated
/// across files in load order.
#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<CanonicalRecord>,
}

/// One fully derived view: the filtered rows, their flights, and the
/// summary, all computed from the same filter pass.
#[derive(Debug, Clone)]
pub struct DatasetView {
    pub records: Vec<CanonicalRecord>,
    pub flights: Vec<FlightRecord>,
    pub summary: SummaryStats,
}

impl Session {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    /// Normalizes per-file raw-record batches into one session. Batch order
    /// and row order within each batch are preserved as given.
    pub fn from_batches(batches: Vec<Vec<RawRecord>>) -> Self {
        let records = batches
            .iter()
            .flatten()
            .map(normalize::normalize)
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derives the filtered, aggregated, summarized view in one shot.
    pub fn view(&self, criteria: &FilterCriteria) -> DatasetView {
        let records = filter::filter(&self.records, criteria);
        let flights = flights::aggregate(&records);
        let summary = summary::summarize(&records, &flights);
        DatasetView {
            records,
            flights,
            summary,
        }
    }

    /// Distinct selectable values for `field`, always computed over the
    /// full dataset regardless of any active filter.
    pub fn options(&self, field: FilterField) -> Vec<String> {
        filter::options(&self.records, field)
    }
}
