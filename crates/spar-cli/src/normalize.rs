//! # Normalize Subcommand
//!
//! Resolves a saved registry response to its lookup outcome and prints it as
//! JSON. Useful for checking how a captured SPAR answer would be reported
//! by the service.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use spar_core::{normalize, RawRegistryPayload};

/// Arguments for the `spar normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Saved registry response (SOAP XML unless `--json` is given).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat the file as the JSON rendition of the response.
    #[arg(long)]
    pub json: bool,
}

/// Execute the normalize subcommand.
///
/// Returns exit code: 0 when an outcome was resolved, 1 when the payload
/// cannot be parsed.
pub fn run_normalize(args: &NormalizeArgs, out: &mut impl Write) -> Result<u8> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let payload = if args.json {
        match serde_json::from_str(&content) {
            Ok(value) => RawRegistryPayload::Json(value),
            Err(e) => {
                writeln!(out, "FAIL {}: invalid JSON: {e}", args.file.display())?;
                return Ok(1);
            }
        }
    } else {
        RawRegistryPayload::Xml(content)
    };

    match normalize(&payload) {
        Ok(outcome) => {
            tracing::info!(outcome = outcome.kind(), "payload normalized");
            writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "FAIL {}: {e}", args.file.display())?;
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(content: &str, json: bool) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("response");
        std::fs::write(&file, content).unwrap();

        let mut out = Vec::new();
        let code = run_normalize(&NormalizeArgs { file, json }, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn xml_found_record_is_printed_as_json() {
        let (code, out) = run(
            "<Envelope><Body><PersonsokningSvarspost><Status>1</Status>\
             <Namn><Fornamn>Anna</Fornamn><Efternamn>Svensson</Efternamn></Namn>\
             </PersonsokningSvarspost></Body></Envelope>",
            false,
        );
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["outcome"], "FOUND");
        assert_eq!(value["record"]["name"], "Anna Svensson");
    }

    #[test]
    fn json_rendition_is_accepted() {
        let (code, out) = run(r#"{"PersonsokningSvarspost": {"Status": "4"}}"#, true);
        assert_eq!(code, 0);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["outcome"], "NOT_FOUND");
    }

    #[test]
    fn missing_status_resolves_to_malformed() {
        let (code, out) = run("<PersonsokningSvarspost><Namn/></PersonsokningSvarspost>", false);
        assert_eq!(code, 0);
        assert!(out.contains("\"MALFORMED\""), "{out}");
    }

    #[test]
    fn unparseable_payload_exits_with_one() {
        let (code, out) = run("<Envelope><Body>", false);
        assert_eq!(code, 1);
        assert!(out.starts_with("FAIL "), "{out}");

        let (code, out) = run("not json", true);
        assert_eq!(code, 1);
        assert!(out.contains("invalid JSON"), "{out}");
    }

    #[test]
    fn soap_fault_exits_with_one() {
        let (code, _) = run(
            "<Envelope><Body><Fault><faultcode>Client</faultcode><faultstring>bad</faultstring></Fault></Body></Envelope>",
            false,
        );
        assert_eq!(code, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = NormalizeArgs {
            file: PathBuf::from("/nonexistent/response.xml"),
            json: false,
        };
        let err = run_normalize(&args, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("failed to read"), "{err}");
    }
}
