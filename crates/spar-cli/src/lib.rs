//! # spar-cli: Offline Tooling for SPAR Lookups
//!
//! Provides the `spar` command-line interface. Nothing here talks to the
//! registry; both subcommands run the same core logic the HTTP service uses.
//!
//! ## Subcommands
//!
//! - `spar validate`: Validate and canonicalize identity numbers.
//! - `spar normalize`: Resolve a saved registry response to an outcome.
//!
//! ```bash
//! spar validate 900116-6959 19900116-6959
//! spar normalize response.xml
//! spar normalize response.json --json
//! ```

pub mod normalize;
pub mod validate;
