//! Schema reconciliation for heterogeneous manifest exports.
//!
//! The source CSVs disagree on column naming: accents (`Número DB`), stray
//! spacing (`Horas Voadas`), and outright synonyms (`Diario_de_Bordo`).
//! Every raw row passes through here exactly once and comes out with the
//! full canonical field set, before any other component sees it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// One row as parsed from a source file: raw header -> raw cell value.
pub type RawRecord = HashMap<String, String>;

/// One passenger-on-flight-leg row after schema reconciliation.
///
/// Every field is always present; columns the source does not carry
/// degrade to the empty string, never to a missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub date: String,
    pub flight_log_id: String,
    pub origin: String,
    pub destination: String,
    /// Numeric string with the decimal separator normalized to `.`.
    /// Parsing is deferred to consumers.
    pub hours_flown: String,
    pub aircraft: String,
    pub agency: String,
    pub status: String,
    pub passenger_name: String,
}

// Accepted reconciled-key spellings per canonical field, highest priority
// first. Spaced and accented source headers collapse onto these through
// `reconcile_key`, so "Número DB" probes as "Numero_DB".
static DATE_KEYS: &[&str] = &["Data", "data", "DATA"];
static FLIGHT_LOG_ID_KEYS: &[&str] = &["Numero_DB", "NumeroDB", "Diario_de_Bordo"];
static ORIGIN_KEYS: &[&str] = &["Origem"];
static DESTINATION_KEYS: &[&str] = &["Destino"];
static HOURS_FLOWN_KEYS: &[&str] = &["Horas_Voadas", "HorasVoadas"];
static AIRCRAFT_KEYS: &[&str] = &["Aeronave"];
static AGENCY_KEYS: &[&str] = &["Orgao", "Orgao1"];
// History takes priority over situation, matching the source exports.
static STATUS_KEYS: &[&str] = &["Historico", "Situacao"];
static PASSENGER_NAME_KEYS: &[&str] = &["Nome"];

/// Reduces a raw column header to its reconciled form: trimmed, internal
/// whitespace runs collapsed to `_`, diacritics stripped via canonical
/// decomposition. Applied to keys only, never to stored values.
pub fn reconcile_key(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join("_");
    collapsed.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn pick(lookup: &HashMap<String, String>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| lookup.get(*key))
        .cloned()
        .unwrap_or_default()
}

/// Maps an arbitrary raw row onto the canonical field set.
///
/// Total over any mapping input: unmatched synonyms yield empty strings
/// and nothing here can fail.
pub fn normalize(raw: &RawRecord) -> CanonicalRecord {
    let lookup: HashMap<String, String> = raw
        .iter()
        .map(|(key, value)| (reconcile_key(key), value.clone()))
        .collect();

    CanonicalRecord {
        date: pick(&lookup, DATE_KEYS),
        flight_log_id: pick(&lookup, FLIGHT_LOG_ID_KEYS),
        origin: pick(&lookup, ORIGIN_KEYS),
        destination: pick(&lookup, DESTINATION_KEYS),
        hours_flown: pick(&lookup, HOURS_FLOWN_KEYS).replace(',', "."),
        aircraft: pick(&lookup, AIRCRAFT_KEYS),
        agency: pick(&lookup, AGENCY_KEYS),
        status: pick(&lookup, STATUS_KEYS),
        passenger_name: pick(&lookup, PASSENGER_NAME_KEYS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reconcile_key_strips_accents_and_spacing() {
        assert_eq!(reconcile_key("Número DB"), "Numero_DB");
        assert_eq!(reconcile_key("  Horas   Voadas  "), "Horas_Voadas");
        assert_eq!(reconcile_key("Órgão"), "Orgao");
        assert_eq!(reconcile_key("Histórico"), "Historico");
    }

    #[test]
    fn test_normalize_accented_headers() {
        let record = normalize(&raw(&[
            ("Data", "01/03/2021"),
            ("Número DB", "DB1"),
            ("Horas Voadas", "1,5"),
            ("Órgão", "PMMG"),
        ]));

        assert_eq!(record.date, "01/03/2021");
        assert_eq!(record.flight_log_id, "DB1");
        assert_eq!(record.hours_flown, "1.5");
        assert_eq!(record.agency, "PMMG");
    }

    #[test]
    fn test_normalize_total_over_unknown_columns() {
        let record = normalize(&raw(&[("Coluna Desconhecida", "x"), ("", "y")]));

        assert_eq!(record.date, "");
        assert_eq!(record.flight_log_id, "");
        assert_eq!(record.origin, "");
        assert_eq!(record.destination, "");
        assert_eq!(record.hours_flown, "");
        assert_eq!(record.aircraft, "");
        assert_eq!(record.agency, "");
        assert_eq!(record.status, "");
        assert_eq!(record.passenger_name, "");
    }

    #[test]
    fn test_flight_log_id_synonym_priority() {
        let record = normalize(&raw(&[
            ("Numero_DB", "DB42"),
            ("Diario_de_Bordo", "OLD-9"),
        ]));

        assert_eq!(record.flight_log_id, "DB42");
    }

    #[test]
    fn test_flight_log_id_fallback_synonym() {
        let record = normalize(&raw(&[("Diario_de_Bordo", "OLD-9")]));
        assert_eq!(record.flight_log_id, "OLD-9");
    }

    #[test]
    fn test_status_history_before_situation() {
        let record = normalize(&raw(&[
            ("Situação", "CANCELADO"),
            ("Histórico", "REALIZADO"),
        ]));

        assert_eq!(record.status, "REALIZADO");
    }

    #[test]
    fn test_hours_comma_becomes_dot_without_parsing() {
        let record = normalize(&raw(&[("Horas_Voadas", "2,75")]));
        assert_eq!(record.hours_flown, "2.75");

        // Malformed values are stored as-is; parsing happens downstream.
        let record = normalize(&raw(&[("Horas_Voadas", "n/d")]));
        assert_eq!(record.hours_flown, "n/d");
    }

    #[test]
    fn test_values_keep_their_accents() {
        let record = normalize(&raw(&[("Destino", "São Paulo")]));
        assert_eq!(record.destination, "São Paulo");
    }
}
