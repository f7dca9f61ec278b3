//! # Status Resolution
//!
//! Registry responses signal the outcome in one of two vocabularies:
//!
//! - a numeric `Status` element (`1` found, `2` protected, `3` deceased,
//!   `4` not found), or
//! - explicit flags: protection markers (`SkyddadIdentitet`,
//!   `Sekretessmarkering`, `SkyddadFolkbokforing`) and a deregistration
//!   cause (`AvregistreringsorsakKod`, where `AV` means deceased).
//!
//! Resolution walks [`RULES`] in order and stops at the first signal that
//! decides. A record is only `Found` on a positive signal: either the
//! numeric code, or every flag present being explicitly negative while the
//! record carries person data. Anything else is unresolved.

use super::tree::RegistryNode;

/// Outcome signalled by a registry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryStatus {
    /// Releasable record.
    Found,
    /// Protected identity.
    Protected,
    /// Registered as deceased.
    Deceased,
    /// No record.
    NotFound,
}

/// Numeric status vocabulary.
const STATUS_CODES: &[(&str, RegistryStatus)] = &[
    ("1", RegistryStatus::Found),
    ("2", RegistryStatus::Protected),
    ("3", RegistryStatus::Deceased),
    ("4", RegistryStatus::NotFound),
];

/// Elements whose truthy value marks a protected identity.
const PROTECTION_FLAGS: &[&str] = &[
    "SkyddadIdentitet",
    "Sekretessmarkering",
    "SkyddadFolkbokforing",
];

/// Deregistration cause meaning the person is deceased.
const DECEASED_CAUSE: &str = "AV";

/// Elements whose presence shows the record carries person data.
const PERSON_DATA: &[&str] = &["Namn", "Persondetaljer", "Folkbokforingsadress"];

enum Signal {
    /// Element text looked up in [`STATUS_CODES`].
    Code,
    /// Boolean-like element; truthy yields the verdict.
    Flag(RegistryStatus),
    /// Element text equal to the code yields the verdict.
    Equals(&'static str, RegistryStatus),
}

struct Rule {
    element: &'static str,
    signal: Signal,
}

/// Ordered resolution table. The first rule that decides wins.
const RULES: &[Rule] = &[
    Rule {
        element: "Status",
        signal: Signal::Code,
    },
    Rule {
        element: "SkyddadIdentitet",
        signal: Signal::Flag(RegistryStatus::Protected),
    },
    Rule {
        element: "Sekretessmarkering",
        signal: Signal::Flag(RegistryStatus::Protected),
    },
    Rule {
        element: "SkyddadFolkbokforing",
        signal: Signal::Flag(RegistryStatus::Protected),
    },
    Rule {
        element: "AvregistreringsorsakKod",
        signal: Signal::Equals(DECEASED_CAUSE, RegistryStatus::Deceased),
    },
];

/// Resolve the status of a record, or `None` when no signal decides.
pub fn resolve(record: &RegistryNode) -> Option<RegistryStatus> {
    let decided = RULES.iter().find_map(|rule| {
        let value = record.find(rule.element)?.text()?;
        match rule.signal {
            Signal::Code => STATUS_CODES
                .iter()
                .find(|(code, _)| *code == value)
                .map(|(_, status)| *status),
            Signal::Flag(verdict) => (flag(value) == Some(true)).then_some(verdict),
            Signal::Equals(expected, verdict) => {
                value.eq_ignore_ascii_case(expected).then_some(verdict)
            }
        }
    });
    decided.or_else(|| explicitly_clear(record).then_some(RegistryStatus::Found))
}

/// True when any protection flag on the record is truthy.
pub fn is_protected(record: &RegistryNode) -> bool {
    PROTECTION_FLAGS.iter().any(|name| {
        record
            .find(name)
            .and_then(RegistryNode::text)
            .and_then(flag)
            .unwrap_or(false)
    })
}

/// Interpret a boolean-like registry value. `None` when unrecognized.
pub fn flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["true", "1", "j", "ja"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
    {
        Some(true)
    } else if ["false", "0", "n", "nej"]
        .iter()
        .any(|f| value.eq_ignore_ascii_case(f))
    {
        Some(false)
    } else {
        None
    }
}

/// Every protection flag present is explicitly negative, at least one is
/// present, and the record carries person data.
fn explicitly_clear(record: &RegistryNode) -> bool {
    let flags: Vec<Option<bool>> = PROTECTION_FLAGS
        .iter()
        .filter_map(|name| record.find(name))
        .map(|node| node.text().and_then(flag))
        .collect();
    !flags.is_empty()
        && flags.iter().all(|value| *value == Some(false))
        && PERSON_DATA.iter().any(|name| record.find(name).is_some())
}
