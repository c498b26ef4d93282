use flight_manifest_analyzer::filter::{FilterCriteria, FilterField};
use flight_manifest_analyzer::parser::parse_rows;
use flight_manifest_analyzer::session::Session;

fn load_fixture_session() -> Session {
    // Two real-world export shapes: the raw `;` dump with accented headers
    // and the re-published `,` file with normalized ones.
    let batch_2021 =
        parse_rows(include_bytes!("fixtures/voos_2021.csv")).expect("2021 fixture parses");
    let batch_2022 =
        parse_rows(include_bytes!("fixtures/voos_2022.csv")).expect("2022 fixture parses");

    Session::from_batches(vec![batch_2021, batch_2022])
}

#[test]
fn test_full_pipeline() {
    let session = load_fixture_session();
    assert_eq!(session.len(), 7);

    let view = session.view(&FilterCriteria::default());

    assert_eq!(view.records.len(), 7);
    assert_eq!(view.flights.len(), 5);
    assert_eq!(view.summary.passenger_count, 7);
    assert_eq!(view.summary.flight_count, 5);
    assert_eq!(view.summary.distinct_destinations, 4);
    assert!((view.summary.total_hours - 6.7).abs() < 1e-9);
}

#[test]
fn test_heterogeneous_headers_reconcile() {
    let session = load_fixture_session();
    let records = session.records();

    // Accented, spaced headers from the 2021 file land in the same fields
    // as the normalized 2022 ones.
    assert_eq!(records[0].flight_log_id, "DB1");
    assert_eq!(records[0].hours_flown, "1.5");
    assert_eq!(records[0].agency, "SEGOV");
    assert_eq!(records[0].status, "REALIZADO");

    assert_eq!(records[4].flight_log_id, "DB10");
    assert_eq!(records[4].hours_flown, "1.6");
}

#[test]
fn test_year_filter_and_grouping() {
    let session = load_fixture_session();

    let criteria = FilterCriteria {
        year: Some("2021".to_string()),
        ..Default::default()
    };
    let view = session.view(&criteria);

    assert_eq!(view.records.len(), 4);
    assert_eq!(view.flights.len(), 3);

    let db1 = &view.flights[0];
    assert_eq!(db1.flight_log_id, "DB1");
    assert_eq!(db1.hours_flown, "1.5");
    assert_eq!(db1.total_passengers, 2);
    assert_eq!(db1.passenger_list, vec!["Ana Souza", "Bia Lima"]);

    // The nameless DB3 row still counts as a passenger.
    let db3 = &view.flights[2];
    assert_eq!(db3.total_passengers, 1);
    assert!(db3.passenger_list.is_empty());

    assert!((view.summary.total_hours - 3.4).abs() < 1e-9);
}

#[test]
fn test_status_substring_filter() {
    let session = load_fixture_session();

    let criteria = FilterCriteria {
        status: Some("realizado".to_string()),
        ..Default::default()
    };
    let view = session.view(&criteria);

    assert_eq!(view.records.len(), 6);
    assert!(view.records.iter().all(|r| r.status == "REALIZADO"));
}

#[test]
fn test_filter_options_from_full_dataset() {
    let session = load_fixture_session();

    assert_eq!(session.options(FilterField::Year), vec!["2021", "2022"]);
    assert_eq!(
        session.options(FilterField::Destination),
        vec!["BSB", "CNF", "GRU", "SDU"]
    );
    assert_eq!(session.options(FilterField::Agency), vec!["PMMG", "SEGOV"]);
}
