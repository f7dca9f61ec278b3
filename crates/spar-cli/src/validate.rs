//! # Validate Subcommand
//!
//! Runs each argument through the identity number validator and reports the
//! canonical form, or the rejection reason. Checksum failures also show the
//! check digit that would have been valid.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use spar_core::{check_digit_for, Personnummer, ValidationError};

/// Arguments for the `spar validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Identity numbers in any accepted spelling.
    #[arg(value_name = "PNR", required = true)]
    pub inputs: Vec<String>,

    /// Resolve two-digit years against this date instead of today (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub reference_date: Option<NaiveDate>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every input is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let mut failures = 0usize;

    for raw in &args.inputs {
        let parsed = match args.reference_date {
            Some(today) => Personnummer::parse_at(raw, today),
            None => Personnummer::parse(raw),
        };

        match parsed {
            Ok(pnr) => writeln!(
                out,
                "OK   {raw}: {} (canonical {}, born {}, coordination number: {})",
                pnr.formatted(),
                pnr.as_str(),
                pnr.birth_date(),
                if pnr.is_coordination_number() { "yes" } else { "no" },
            )?,
            Err(err) => {
                failures += 1;
                tracing::debug!(code = err.code(), "input rejected");
                match expected_check_digit(raw, err) {
                    Some(digit) => writeln!(
                        out,
                        "FAIL {raw}: {err} (expected check digit {digit})"
                    )?,
                    None => writeln!(out, "FAIL {raw}: {err}")?,
                }
            }
        }
    }

    writeln!(
        out,
        "{}/{} valid",
        args.inputs.len() - failures,
        args.inputs.len()
    )?;

    Ok(if failures == 0 { 0 } else { 1 })
}

/// The check digit that would satisfy Luhn for a checksum rejection.
fn expected_check_digit(raw: &str, err: ValidationError) -> Option<u8> {
    if err != ValidationError::Checksum {
        return None;
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let last_ten = digits.get(digits.len().checked_sub(10)?..)?;
    check_digit_for(&last_ten[..9])
}
