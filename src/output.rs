//! Output formatting for summaries and CSV exports.
//!
//! This is the presentation boundary: hour totals are rounded here and
//! nowhere upstream.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::flights::FlightRecord;
use crate::normalize::CanonicalRecord;
use crate::session::DatasetView;
use crate::summary;
use csv::{QuoteStyle, WriterBuilder};

/// Summary payload rendered for dashboards and the CLI.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub generated_at: DateTime<Utc>,
    pub flight_count: usize,
    /// Rounded to one decimal for display.
    pub total_hours: f64,
    pub passenger_count: usize,
    pub distinct_destinations: usize,
    /// Flight counts per destination, busiest first.
    pub top_destinations: Vec<(String, usize)>,
    /// Summed flown hours per year, ascending.
    pub hours_by_year: Vec<(String, f64)>,
}

impl SummaryReport {
    pub fn new(view: &DatasetView, top: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            flight_count: view.summary.flight_count,
            total_hours: view.summary.rounded_total_hours(),
            passenger_count: view.summary.passenger_count,
            distinct_destinations: view.summary.distinct_destinations,
            top_destinations: summary::top_destinations(&view.flights, top),
            hours_by_year: summary::hours_by_year(&view.flights),
        }
    }
}

/// Logs a summary report using Rust's debug pretty-print format.
pub fn print_pretty(report: &SummaryReport) {
    debug!("{:#?}", report);
}

/// Logs a summary report as pretty-printed JSON.
pub fn print_json(report: &SummaryReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes filtered passenger rows as CSV, one row per record. Every value
/// is quoted; embedded quotes are doubled.
pub fn write_records_csv(path: &str, records: &[CanonicalRecord]) -> Result<()> {
    debug!(path, rows = records.len(), "Writing passenger rows CSV");

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

// Flat CSV shape for a flight leg; the passenger list renders as one
// "; "-joined cell.
#[derive(Serialize)]
struct FlightRow<'a> {
    date: &'a str,
    flight_log_id: &'a str,
    origin: &'a str,
    destination: &'a str,
    hours_flown: &'a str,
    aircraft: &'a str,
    agency: &'a str,
    status: &'a str,
    total_passengers: usize,
    passenger_list: String,
}

impl<'a> From<&'a FlightRecord> for FlightRow<'a> {
    fn from(flight: &'a FlightRecord) -> Self {
        Self {
            date: &flight.date,
            flight_log_id: &flight.flight_log_id,
            origin: &flight.origin,
            destination: &flight.destination,
            hours_flown: &flight.hours_flown,
            aircraft: &flight.aircraft,
            agency: &flight.agency,
            status: &flight.status,
            total_passengers: flight.total_passengers,
            passenger_list: flight.passenger_list.join("; "),
        }
    }
}

/// Writes aggregated flight legs as CSV, one row per flight.
pub fn write_flights_csv(path: &str, flights: &[FlightRecord]) -> Result<()> {
    debug!(path, rows = flights.len(), "Writing flights CSV");

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    for flight in flights {
        writer.serialize(FlightRow::from(flight))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterCriteria;
    use crate::session::Session;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn view() -> DatasetView {
        let records = vec![
            CanonicalRecord {
                date: "01/03/2021".to_string(),
                flight_log_id: "DB1".to_string(),
                origin: "GRU".to_string(),
                destination: "BSB".to_string(),
                hours_flown: "1.5".to_string(),
                passenger_name: "Ana \"Bia\" Silva".to_string(),
                ..Default::default()
            },
            CanonicalRecord {
                date: "01/03/2021".to_string(),
                flight_log_id: "DB1".to_string(),
                origin: "GRU".to_string(),
                destination: "BSB".to_string(),
                hours_flown: "1.5".to_string(),
                passenger_name: "Caio".to_string(),
                ..Default::default()
            },
        ];
        Session::new(records).view(&FilterCriteria::default())
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&SummaryReport::new(&view(), 12));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&SummaryReport::new(&view(), 12)).unwrap();
    }

    #[test]
    fn test_report_rounds_hours() {
        let report = SummaryReport::new(&view(), 12);
        assert_eq!(report.flight_count, 1);
        assert_eq!(report.total_hours, 1.5);
        assert_eq!(report.top_destinations, vec![("BSB".to_string(), 1)]);
    }

    #[test]
    fn test_records_csv_quotes_everything() {
        let path = temp_path("flight_manifest_records_quoting.csv");
        let _ = fs::remove_file(&path);

        write_records_csv(&path, &view().records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("\"date\","));

        let first = lines.next().unwrap();
        assert!(first.contains("\"01/03/2021\""));
        // Embedded quotes are doubled inside a quoted cell.
        assert!(first.contains("\"Ana \"\"Bia\"\" Silva\""));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_flights_csv_joins_passenger_list() {
        let path = temp_path("flight_manifest_flights_join.csv");
        let _ = fs::remove_file(&path);

        write_flights_csv(&path, &view().flights).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"total_passengers\""));
        assert!(lines[1].contains("\"2\""));
        assert!(lines[1].contains("Ana \"\"Bia\"\" Silva; Caio"));

        fs::remove_file(&path).unwrap();
    }
}
