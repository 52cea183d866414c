//! Record Store
//!
//! In-memory mirror of the hospital API collections, shared by reference
//! between every view that needs it.
//!
//! ## Architecture
//!
//! - **RecordStore**: owns the collections behind a `tokio::sync::RwLock`
//! - **StoreEvent**: broadcast after every local change
//! - **LoadReport**: which collections loaded and which failed
//!
//! Local collections only change after the remote call succeeded.

mod collections;
mod error;
mod events;
mod record_store;

pub use collections::{Collections, Stored};
pub use error::{StoreError, StoreResult};
pub use events::{LoadReport, StoreEvent};
pub use record_store::RecordStore;
