#![deny(missing_docs)]

//! # spar-core: Foundational Types for SPAR Person Lookups
//!
//! This crate holds the pure part of the lookup pipeline. It performs no I/O
//! and depends only on `serde`, `serde_json`, `thiserror`,
//! `chrono`, and `quick-xml` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validated newtype for the identity number.** A [`Personnummer`] can
//!    only be obtained through parsing, so every value in circulation is the
//!    canonical 12-digit form with a valid date and check digit.
//!
//! 2. **One tolerant tree for every payload shape.** Registry responses are
//!    parsed once into a [`RegistryNode`] tree (namespace prefixes stripped,
//!    scalar-or-sequence fields flattened into repeated children). Mapping
//!    code only ever queries that tree.
//!
//! 3. **Outcomes are never inferred by omission.** The normalizer yields
//!    exactly one [`LookupOutcome`]; a payload without a recognizable status
//!    signal is `Malformed`, never `Found`.
//!
//! 4. **Structured errors.** [`ValidationError`], [`PayloadError`], and
//!    [`LookupError`] are `thiserror` enums with stable machine-readable codes.

pub mod error;
pub mod person;
pub mod personnummer;
pub mod registry;

pub use error::{LookupError, PayloadError, ValidationError};
pub use person::{Address, LookupOutcome, PersonRecord, NAME_NOT_AVAILABLE, UNKNOWN};
pub use personnummer::{check_digit_for, luhn_valid, Personnummer, VALID_EXAMPLES};
pub use registry::{normalize, RawRegistryPayload, RegistryNode, RegistryStatus};
