//! # Infirmary
//!
//! Data layer of a hospital administration dashboard: a typed REST gateway
//! for the hospital API, an in-memory record store, and the aggregation and
//! filter functions the dashboard charts are built from.
//!
//! ## Modules
//!
//! - [`records`]: entity types, status enums and form validation
//! - [`gateway`]: CRUD over REST with a three-way failure taxonomy
//! - [`store`]: shared in-memory collections with change notifications
//! - [`analytics`]: grouped counts, monthly series, filters, dashboard panels
//! - [`notify`]: user-facing notices
//! - [`attendance_log`]: local attendance scratch pad
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infirmary::config::Config;
//! use infirmary::gateway::Gateway;
//! use infirmary::store::RecordStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let gateway = Gateway::new(config.api)?;
//!
//!     // Patients, staff and bills load concurrently
//!     let store = RecordStore::new();
//!     let report = store.load_initial(&gateway).await;
//!     for (kind, error) in &report.failed {
//!         eprintln!("{} unavailable: {}", kind, error);
//!     }
//!
//!     let today = chrono::Local::now().date_naive();
//!     let summary = store.dashboard(today, None).await;
//!     println!("{} patients, {:.1}% active", summary.patients.total, summary.patients.active_percentage);
//!
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod attendance_log;
pub mod config;
pub mod gateway;
pub mod notify;
pub mod records;
pub mod store;

pub use analytics::{DashboardSummary, Selection, Tally};
pub use config::Config;
pub use gateway::{Gateway, GatewayError, GatewayResult, RecordSource};
pub use notify::{Notice, Notifier, Severity};
pub use records::{
    AttendanceRecord, AttendanceStatus, ClaimStatus, EntityKind, FinancialRecord, Patient,
    PatientStatus, PaymentStatus, Record, RecordId, Staff, Transaction,
};
pub use store::{LoadReport, RecordStore, StoreError, StoreEvent};
