//! Hospital Records
//!
//! Record types mirrored from the hospital REST API, plus the pieces every
//! layer above needs to talk about them:
//!
//! - **types**: `Patient`, `Staff`, `FinancialRecord`, `AttendanceRecord`,
//!   `Transaction` and their status enums
//! - **validation**: form checks run before a record is sent upstream
//! - [`Record`] / [`EntityKind`]: which endpoint a record type lives behind

mod de;
mod types;
mod validation;

pub use types::{
    AttendanceRecord, AttendanceStatus, ClaimStatus, FinancialRecord, Patient, PatientStatus,
    PaymentStatus, RecordId, Staff, Transaction, UnknownStatus,
};
pub use validation::{Validate, ValidationError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The resource collections exposed by the REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Patients,
    Staff,
    Financial,
    Attendance,
    Transactions,
}

impl EntityKind {
    /// Get all entity kinds for iteration
    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Patients,
            EntityKind::Staff,
            EntityKind::Financial,
            EntityKind::Attendance,
            EntityKind::Transactions,
        ]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Patients => write!(f, "patients"),
            EntityKind::Staff => write!(f, "staff"),
            EntityKind::Financial => write!(f, "financial"),
            EntityKind::Attendance => write!(f, "attendance"),
            EntityKind::Transactions => write!(f, "transactions"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" | "patients" => Ok(EntityKind::Patients),
            "staff" => Ok(EntityKind::Staff),
            "financial" | "finance" | "bills" => Ok(EntityKind::Financial),
            "attendance" => Ok(EntityKind::Attendance),
            "transaction" | "transactions" => Ok(EntityKind::Transactions),
            other => Err(format!(
                "unknown entity '{}' (expected patients, staff, financial, attendance or transactions)",
                other
            )),
        }
    }
}

/// A record type served by one REST collection
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection this record type is served from
    const KIND: EntityKind;

    /// Server-assigned identifier (absent before creation)
    fn id(&self) -> Option<&RecordId>;
}

impl Record for Patient {
    const KIND: EntityKind = EntityKind::Patients;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Record for Staff {
    const KIND: EntityKind = EntityKind::Staff;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Record for FinancialRecord {
    const KIND: EntityKind = EntityKind::Financial;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Record for AttendanceRecord {
    const KIND: EntityKind = EntityKind::Attendance;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

impl Record for Transaction {
    const KIND: EntityKind = EntityKind::Transactions;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }
}

/// Date portion of an ISO date or timestamp string ("2024-01-10T08:00:00Z" -> "2024-01-10")
pub fn date_portion(value: &str) -> &str {
    let value = value.trim();
    value
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!("patients".parse::<EntityKind>(), Ok(EntityKind::Patients));
        assert_eq!("Patient".parse::<EntityKind>(), Ok(EntityKind::Patients));
        assert_eq!("finance".parse::<EntityKind>(), Ok(EntityKind::Financial));
        assert!("wards".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_kind_display_roundtrip() {
        for kind in EntityKind::all() {
            assert_eq!(kind.to_string().parse::<EntityKind>(), Ok(*kind));
        }
    }

    #[test]
    fn test_date_portion() {
        assert_eq!(date_portion("2024-01-10T08:30:00Z"), "2024-01-10");
        assert_eq!(date_portion("2024-01-10 08:30"), "2024-01-10");
        assert_eq!(date_portion("2024-01-10"), "2024-01-10");
        assert_eq!(date_portion(""), "");
    }
}
