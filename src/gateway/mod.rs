//! CRUD Gateway
//!
//! Thin wrappers translating a domain CRUD intent into a REST request and a
//! typed result.
//!
//! ## Architecture
//!
//! - **Gateway**: reqwest client bound to the configured base URL and
//!   collection paths
//! - **RecordSource**: read-side trait the record store loads from
//!
//! ## Failure classes
//!
//! 1. Transport failure (no response at all)
//! 2. Non-2xx status
//! 3. Malformed response body

mod client;
mod error;
mod source;

pub use client::Gateway;
pub use error::{GatewayError, GatewayResult};
pub use source::RecordSource;
