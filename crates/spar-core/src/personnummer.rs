//! # Swedish Personal Identity Number
//!
//! Parsing and validation of personnummer and samordningsnummer
//! (coordination numbers). Accepted spellings:
//!
//! - `YYMMDD-NNNN`, `YYMMDD+NNNN`, `YYMMDDNNNN` (10 digits, century inferred)
//! - `YYYYMMDD-NNNN`, `YYYYMMDDNNNN` (12 digits)
//!
//! Every non-digit character is a separator and is stripped before
//! validation. Checks run in a fixed order (format, date, checksum) and the
//! first failure determines the [`ValidationError`] kind.
//!
//! ## Century Inference
//!
//! For 10-digit input, a two-digit year greater than the current two-digit
//! year belongs to the previous century; otherwise to the current one. The
//! `+` separator (conventionally marking a centenarian) is not interpreted.
//!
//! ## Coordination Numbers
//!
//! A day field of 61–91 is a coordination number: the calendar day is the
//! field minus 60. The offset is kept in the canonical string.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Well-formed identity numbers shown to callers after a format error.
pub const VALID_EXAMPLES: [&str; 3] = ["900116-6959", "9001166959", "199001166959"];

const COORDINATION_OFFSET: u32 = 60;

/// A validated Swedish personal identity number in canonical 12-digit form.
///
/// Construct with [`Personnummer::parse`] or [`Personnummer::parse_at`].
/// Serializes as the canonical 12-digit string; deserialization re-runs
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Personnummer {
    canonical: String,
    birth_date: NaiveDate,
    coordination: bool,
}

impl Personnummer {
    /// Parse against today's local date for century inference.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_at(raw, Local::now().date_naive())
    }

    /// Parse with an explicit reference date for century inference.
    ///
    /// Pure: the same `(raw, today)` always yields the same result.
    pub fn parse_at(raw: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        let (year, rest) = match digits.len() {
            12 => (number(&digits[..4]) as i32, &digits[4..]),
            10 => (resolve_century(number(&digits[..2]), today), &digits[2..]),
            _ => return Err(ValidationError::Format),
        };

        let month = number(&rest[..2]);
        let day_field = number(&rest[2..4]);
        let coordination = day_field > COORDINATION_OFFSET;
        let day = if coordination {
            day_field - COORDINATION_OFFSET
        } else {
            day_field
        };

        let birth_date = NaiveDate::from_ymd_opt(year, month, day)
            .filter(|date| date.year() == year && date.month() == month && date.day() == day)
            .ok_or(ValidationError::Date)?;

        let canonical = format!("{year:04}{rest}");
        if !luhn_valid(&canonical[2..]) {
            return Err(ValidationError::Checksum);
        }

        Ok(Self {
            canonical,
            birth_date,
            coordination,
        })
    }

    /// The canonical 12-digit string (`YYYYMMDDNNNN`).
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Dashed 12-digit form (`YYYYMMDD-NNNN`).
    pub fn formatted(&self) -> String {
        format!("{}-{}", &self.canonical[..8], &self.canonical[8..])
    }

    /// Four-digit year.
    pub fn year(&self) -> i32 {
        self.birth_date.year()
    }

    /// Month, 1–12.
    pub fn month(&self) -> u32 {
        self.birth_date.month()
    }

    /// Day field as written, including the coordination offset if present.
    pub fn day_field(&self) -> u32 {
        number(&self.canonical[6..8])
    }

    /// The three-digit birth serial.
    pub fn serial(&self) -> &str {
        &self.canonical[8..11]
    }

    /// The Luhn check digit.
    pub fn check_digit(&self) -> u8 {
        self.canonical.as_bytes()[11] - b'0'
    }

    /// Calendar birth date, with any coordination offset removed.
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Whether the day field carries the coordination offset.
    pub fn is_coordination_number(&self) -> bool {
        self.coordination
    }
}

impl fmt::Display for Personnummer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl AsRef<str> for Personnummer {
    fn as_ref(&self) -> &str {
        &self.canonical
    }
}

impl FromStr for Personnummer {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Personnummer {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Personnummer> for String {
    fn from(value: Personnummer) -> Self {
        value.canonical
    }
}

// -- Luhn ---------------------------------------------------------------------

/// Luhn check over a string of ASCII digits.
///
/// Digits at even positions (0-based from the left) are doubled, with 9
/// subtracted when the product exceeds 9. Valid when the sum is divisible by
/// ten. Returns `false` for empty input or any non-digit character.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    luhn_sum(digits) % 10 == 0
}

/// The check digit that completes nine leading digits (`YYMMDDNNN`).
///
/// Returns `None` unless the input is exactly nine ASCII digits.
pub fn check_digit_for(first_nine: &str) -> Option<u8> {
    if first_nine.len() != 9 || !first_nine.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(((10 - luhn_sum(first_nine) % 10) % 10) as u8)
}

fn luhn_sum(digits: &str) -> u32 {
    digits
        .bytes()
        .enumerate()
        .map(|(position, b)| {
            let digit = u32::from(b - b'0');
            if position % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum()
}

// -- Helpers ------------------------------------------------------------------

/// Decimal value of a slice already known to be ASCII digits.
fn number(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn resolve_century(two_digit_year: u32, today: NaiveDate) -> i32 {
    let current = today.year();
    let current_two_digit = current.rem_euclid(100);
    let century = current - current_two_digit;
    let yy = two_digit_year as i32;
    if yy > current_two_digit {
        century - 100 + yy
    } else {
        century + yy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    fn parse(raw: &str) -> Result<Personnummer, ValidationError> {
        Personnummer::parse_at(raw, today())
    }

    #[test]
    fn accepts_all_spellings_of_the_same_number() {
        for raw in [
            "900116-6959",
            "9001166959",
            "199001166959",
            "19900116-6959",
            "900116+6959",
            " 900116 6959 ",
        ] {
            let pnr = parse(raw).expect("should parse");
            assert_eq!(pnr.as_str(), "199001166959", "input: {raw}");
        }
    }

    #[test]
    fn components_of_a_parsed_number() {
        let pnr = parse("900116-6959").expect("valid");
        assert_eq!(pnr.year(), 1990);
        assert_eq!(pnr.month(), 1);
        assert_eq!(pnr.day_field(), 16);
        assert_eq!(pnr.serial(), "695");
        assert_eq!(pnr.check_digit(), 9);
        assert_eq!(pnr.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 16).expect("date"));
        assert!(!pnr.is_coordination_number());
        assert_eq!(pnr.formatted(), "19900116-6959");
        assert_eq!(pnr.to_string(), "19900116-6959");
    }

    #[test]
    fn coordination_number_keeps_offset_in_canonical_form() {
        let pnr = parse("900176-6956").expect("coordination number");
        assert_eq!(pnr.as_str(), "199001766956");
        assert!(pnr.is_coordination_number());
        assert_eq!(pnr.day_field(), 76);
        assert_eq!(pnr.birth_date(), NaiveDate::from_ymd_opt(1990, 1, 16).expect("date"));
    }

    #[test]
    fn coordination_day_beyond_month_length_is_a_date_error() {
        // 61 + 31 = 92 -> day 32
        let nine = "900192695";
        let check = check_digit_for(nine).expect("nine digits");
        let raw = format!("{nine}{check}");
        assert_eq!(parse(&raw), Err(ValidationError::Date));
    }

    #[test]
    fn century_rule_prefers_previous_century_for_future_years() {
        let check = check_digit_for("300101123").expect("nine digits");
        let pnr = parse(&format!("300101123{check}")).expect("valid");
        assert_eq!(pnr.year(), 1930);

        let check = check_digit_for("000116123").expect("nine digits");
        let pnr = parse(&format!("000116-123{check}")).expect("valid");
        assert_eq!(pnr.year(), 2000);
        assert_eq!(pnr.as_str(), format!("20000116123{check}"));
    }

    #[test]
    fn current_two_digit_year_stays_in_current_century() {
        let check = check_digit_for("250101123").expect("nine digits");
        let pnr = parse(&format!("250101123{check}")).expect("valid");
        assert_eq!(pnr.year(), 2025);
    }

    #[test]
    fn twelve_digit_input_is_taken_literally() {
        let pnr = parse("200001161231").expect("valid");
        assert_eq!(pnr.year(), 2000);
        assert_eq!(pnr.as_str(), "200001161231");
    }

    #[test]
    fn wrong_length_is_a_format_error() {
        for raw in ["", "123", "90011669", "90011669590", "1990011669591", "abcdef-ghij"] {
            assert_eq!(parse(raw), Err(ValidationError::Format), "input: {raw}");
        }
    }

    #[test]
    fn impossible_dates_are_date_errors() {
        for nine in ["901316695", "900230695", "900100695", "900000695"] {
            let check = check_digit_for(nine).expect("nine digits");
            let raw = format!("{nine}{check}");
            assert_eq!(parse(&raw), Err(ValidationError::Date), "input: {raw}");
        }
    }

    #[test]
    fn all_zero_number_fails_on_date_before_checksum() {
        assert_eq!(parse("000000-0000"), Err(ValidationError::Date));
    }

    #[test]
    fn leap_day_depends_on_the_year() {
        let check = check_digit_for("000229123").expect("nine digits");
        assert!(parse(&format!("20000229123{check}")).is_ok());

        let check = check_digit_for("000229123").expect("nine digits");
        assert_eq!(
            parse(&format!("19000229123{check}")),
            Err(ValidationError::Date)
        );
    }

    #[test]
    fn bad_check_digit_is_a_checksum_error() {
        assert_eq!(parse("900116-6958"), Err(ValidationError::Checksum));
        assert_eq!(parse("199001166950"), Err(ValidationError::Checksum));
    }

    #[test]
    fn luhn_reference_values() {
        assert!(luhn_valid("9001166959"));
        assert!(luhn_valid("9001612390"));
        assert!(!luhn_valid("9001612391"));
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("90011a6959"));
    }

    #[test]
    fn check_digit_for_known_number() {
        assert_eq!(check_digit_for("900116695"), Some(9));
        assert_eq!(check_digit_for("000116123"), Some(1));
        assert_eq!(check_digit_for("12345678"), None);
        assert_eq!(check_digit_for("12345678x"), None);
    }

    #[test]
    fn serde_uses_canonical_string_and_revalidates() {
        let pnr = parse("900116-6959").expect("valid");
        let json = serde_json::to_string(&pnr).expect("serialize");
        assert_eq!(json, "\"199001166959\"");

        let back: Personnummer = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, pnr);

        let bad: Result<Personnummer, _> = serde_json::from_str("\"199001166950\"");
        assert!(bad.is_err());
    }

    #[test]
    fn valid_examples_all_parse() {
        for raw in VALID_EXAMPLES {
            assert!(Personnummer::parse(raw).is_ok(), "example {raw} must parse");
        }
    }
}
