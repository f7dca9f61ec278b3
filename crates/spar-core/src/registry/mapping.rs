//! Field mapping from a resolved registry record to a [`PersonRecord`].

use chrono::NaiveDate;

use super::status;
use super::tree::RegistryNode;
use crate::person::{Address, PersonRecord, NAME_NOT_AVAILABLE, UNKNOWN};

/// Build the flat record. Every absent field gets its placeholder.
pub fn person_record(record: &RegistryNode) -> PersonRecord {
    PersonRecord {
        name: full_name(record),
        birth_date: record
            .text_at(&["Persondetaljer", "Fodelsedatum"])
            .or_else(|| record.find("Fodelsedatum").and_then(RegistryNode::text))
            .and_then(iso_date)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        address: address(record),
        protected_identity: status::is_protected(record),
        last_updated: record
            .find("SenastAndrad")
            .and_then(RegistryNode::text)
            .unwrap_or(UNKNOWN)
            .to_string(),
    }
}

/// Registry dates come as `YYYY-MM-DD` or `YYYYMMDD`; both render as ISO.
fn iso_date(raw: &str) -> Option<String> {
    ["%Y-%m-%d", "%Y%m%d"]
        .into_iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Given, middle, and family names in that order, single-space joined.
///
/// Each part may repeat and may itself hold several whitespace-separated
/// names. Name parts may sit under `Namn` or directly on the record.
fn full_name(record: &RegistryNode) -> String {
    let container = record.child("Namn").unwrap_or(record);
    let words: Vec<&str> = ["Fornamn", "Mellannamn", "Efternamn"]
        .into_iter()
        .flat_map(|part| container.children_named(part))
        .filter_map(RegistryNode::text)
        .flat_map(str::split_whitespace)
        .collect();

    if words.is_empty() {
        NAME_NOT_AVAILABLE.to_string()
    } else {
        words.join(" ")
    }
}

/// Registered address. `Folkbokforingsadress/SvenskAdress` is preferred;
/// address lines directly under `Folkbokforingsadress` are accepted too.
fn address(record: &RegistryNode) -> Address {
    let Some(source) = record
        .at(&["Folkbokforingsadress", "SvenskAdress"])
        .or_else(|| record.child("Folkbokforingsadress"))
    else {
        return Address::default();
    };

    let text = |name: &str| source.text_at(&[name]).map(str::to_string);
    Address {
        street: text("Utdelningsadress2")
            .or_else(|| text("Utdelningsadress1"))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        postal_code: text("PostNr").unwrap_or_else(|| UNKNOWN.to_string()),
        city: text("Postort").unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
