//! Derived Statistics
//!
//! Turns record collections into the data the dashboard charts.
//!
//! ## Architecture
//!
//! - **aggregate**: grouped counts and sums, monthly series, percentages
//! - **filter**: order-preserving subset selection
//! - **dashboard**: per-panel overviews built from the two above
//!
//! Everything here is synchronous and pure: it works on collections that are
//! already in memory and never fails.

pub mod aggregate;
pub mod dashboard;
pub mod filter;

pub use aggregate::{
    group_count, group_sum, month_bucket, monthly_series, monthly_series_with, percentage,
    BucketKey, MonthlySeries, SeriesPoint, Tally, UNKNOWN_BUCKET,
};
pub use dashboard::{
    AttendanceOverview, DashboardSummary, FinanceOverview, PatientOverview, StaffOverview,
};
pub use filter::{by_boolean_field, by_enum_field, by_exact_date, Selection};
