//! Grouping of canonical passenger rows into flight-level records.

use std::collections::HashMap;

use serde::Serialize;

use crate::normalize::CanonicalRecord;

/// Separator for the flight-identity key. Does not occur in source fields.
const KEY_DELIMITER: &str = "||";

/// One aggregated flight leg: the shared fields of its passenger rows plus
/// the passenger count and name list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlightRecord {
    pub date: String,
    pub flight_log_id: String,
    pub origin: String,
    pub destination: String,
    pub hours_flown: String,
    pub aircraft: String,
    pub agency: String,
    pub status: String,
    /// Count of contributing passenger rows, including rows with no name.
    pub total_passengers: usize,
    /// Non-empty trimmed passenger names in contributing-row order.
    /// Duplicates are kept.
    pub passenger_list: Vec<String>,
}

/// Identity key of the flight leg a passenger row belongs to.
pub fn flight_key(record: &CanonicalRecord) -> String {
    [
        record.date.as_str(),
        record.flight_log_id.as_str(),
        record.origin.as_str(),
        record.destination.as_str(),
        record.hours_flown.as_str(),
        record.aircraft.as_str(),
        record.agency.as_str(),
    ]
    .join(KEY_DELIMITER)
}

/// Groups passenger rows into one record per flight leg.
///
/// Output order is the order each flight is first seen in `records`, so
/// repeated runs over the same filtered set render identically. The
/// accumulator is seeded from the first row sharing a key; later rows only
/// contribute their count and passenger name.
pub fn aggregate(records: &[CanonicalRecord]) -> Vec<FlightRecord> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut flights: Vec<FlightRecord> = Vec::new();

    for record in records {
        let key = flight_key(record);
        let slot = *index.entry(key).or_insert_with(|| {
            flights.push(FlightRecord {
                date: record.date.clone(),
                flight_log_id: record.flight_log_id.clone(),
                origin: record.origin.clone(),
                destination: record.destination.clone(),
                hours_flown: record.hours_flown.clone(),
                aircraft: record.aircraft.clone(),
                agency: record.agency.clone(),
                status: record.status.clone(),
                total_passengers: 0,
                passenger_list: Vec::new(),
            });
            flights.len() - 1
        });

        flights[slot].total_passengers += 1;
        let name = record.passenger_name.trim();
        if !name.is_empty() {
            flights[slot].passenger_list.push(name.to_string());
        }
    }

    flights
}
