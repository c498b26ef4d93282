//! Scalar statistics and chart series derived from a filtered view.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::filter::year_of;
use crate::flights::FlightRecord;
use crate::normalize::CanonicalRecord;

/// Headline figures for one dataset view.
///
/// `total_hours` carries full floating-point precision; rounding to one
/// decimal happens only where the value is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub flight_count: usize,
    pub total_hours: f64,
    pub passenger_count: usize,
    pub distinct_destinations: usize,
}

impl SummaryStats {
    /// The display form of `total_hours`, rounded to one decimal.
    pub fn rounded_total_hours(&self) -> f64 {
        (self.total_hours * 10.0).round() / 10.0
    }
}

/// Parses an hours value, treating empty or malformed input as zero hours.
pub fn parse_hours(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Derives the headline figures from a record set and its aggregated
/// flights. Degenerate empty inputs yield all-zero stats.
pub fn summarize(records: &[CanonicalRecord], flights: &[FlightRecord]) -> SummaryStats {
    let total_hours = flights
        .iter()
        .map(|flight| parse_hours(&flight.hours_flown))
        .sum();

    let distinct_destinations = flights
        .iter()
        .map(|flight| flight.destination.as_str())
        .filter(|destination| !destination.is_empty())
        .collect::<HashSet<_>>()
        .len();

    SummaryStats {
        flight_count: flights.len(),
        total_hours,
        passenger_count: records.len(),
        distinct_destinations,
    }
}

/// Flight counts per destination, busiest first, truncated to `limit`.
/// Ties order by destination name so charts are stable across runs.
pub fn top_destinations(flights: &[FlightRecord], limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for flight in flights {
        if flight.destination.is_empty() {
            continue;
        }
        *counts.entry(flight.destination.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(destination, count)| (destination.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Total flown hours per year, in ascending year order. Flights whose date
/// yields no year land under the empty key.
pub fn hours_by_year(flights: &[FlightRecord]) -> Vec<(String, f64)> {
    let mut by_year: BTreeMap<String, f64> = BTreeMap::new();
    for flight in flights {
        let year = year_of(&flight.date).to_string();
        *by_year.entry(year).or_default() += parse_hours(&flight.hours_flown);
    }
    by_year.into_iter().collect()
}
