//! # spar-client: SPAR Registry Gateway
//!
//! The only crate in the workspace that talks to the registry. It turns a
//! validated [`spar_core::Personnummer`] into a SOAP person-search request,
//! sends it over mutual TLS, and hands back the raw response as a
//! [`spar_core::RawRegistryPayload`]. Interpreting that payload is
//! `spar-core`'s job.
//!
//! ## Modules
//!
//! - [`config`]: environment-driven [`SparConfig`] with a redacting `Debug`.
//! - [`envelope`]: SOAP 1.1 request envelope with WS-Security credentials.
//! - [`gateway`]: the [`RegistryGateway`] trait the orchestrator depends on.
//! - [`http`]: [`SparHttpGateway`], the `reqwest` implementation.
//! - [`mock`]: [`MockRegistryGateway`], canned payloads with call counting.
//!
//! ## Contract
//!
//! One call per lookup, no retries. Gateways emit no log events about
//! individual lookups; the orchestrator owns lookup observability.

pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mock;

pub use config::{ClientTls, ConfigError, SparConfig};
pub use error::GatewayError;
pub use gateway::RegistryGateway;
pub use http::SparHttpGateway;
pub use mock::MockRegistryGateway;
