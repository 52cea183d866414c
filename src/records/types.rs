//! Core record types for the hospital records client
//!
//! This module defines the entities mirrored from the REST API:
//! - `Patient`, `Staff`, `FinancialRecord`, `AttendanceRecord`, `Transaction`
//! - One status enum per status dimension (`PatientStatus`, `PaymentStatus`,
//!   `ClaimStatus`, `AttendanceStatus`)
//! - `RecordId`: the server-assigned identifier
//!
//! Field names are camelCase on the wire. Every field except the name is
//! optional because records written by older screens omit them freely.

use super::de;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Server-assigned record identifier
///
/// The API hands out numeric ids for some collections and string ids for
/// others. Lookups compare the textual form, so `7` and `"7"` name the same
/// record, but an id is written back in the JSON form it arrived in.
#[derive(Debug, Clone)]
pub struct RecordId {
    text: String,
    numeric: bool,
}

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            text: id.into(),
            numeric: false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the server sent this id as a JSON number
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(n) = self.text.parse::<i64>() {
                return serializer.serialize_i64(n);
            }
            if let Ok(n) = self.text.parse::<f64>() {
                return serializer.serialize_f64(n);
            }
        }
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Text(String),
        }

        let (text, numeric) = match Raw::deserialize(deserializer)? {
            Raw::Int(n) => (n.to_string(), true),
            Raw::Float(n) => (n.to_string(), true),
            Raw::Text(s) if s.trim().is_empty() => return Err(D::Error::custom("empty record id")),
            Raw::Text(s) => (s, false),
        };
        Ok(Self { text, numeric })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self {
            text: id.to_string(),
            numeric: true,
        }
    }
}

/// Error returned when a status label is not one of the known values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

// ============================================
// Status enums
// ============================================

/// Whether a patient is under active care
///
/// Serialised as the boolean the API stores (`true` = active). Decoding also
/// accepts the `"Active"` / `"Inactive"` labels some screens write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientStatus {
    Active,
    Inactive,
}

impl PatientStatus {
    pub fn all() -> &'static [PatientStatus] {
        &[PatientStatus::Active, PatientStatus::Inactive]
    }

    pub fn from_flag(active: bool) -> Self {
        if active {
            PatientStatus::Active
        } else {
            PatientStatus::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PatientStatus::Active)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
        }
    }
}

impl Serialize for PatientStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_active())
    }
}

impl<'de> Deserialize<'de> for PatientStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(active) => Ok(PatientStatus::from_flag(active)),
            Raw::Label(label) => label.parse().map_err(D::Error::custom),
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PatientStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "true" => Ok(PatientStatus::Active),
            "inactive" | "false" => Ok(PatientStatus::Inactive),
            _ => Err(UnknownStatus {
                kind: "patient status",
                value: s.to_string(),
                expected: "Active, Inactive",
            }),
        }
    }
}

/// Payment state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Overdue,
}

impl PaymentStatus {
    pub fn all() -> &'static [PaymentStatus] {
        &[PaymentStatus::Paid, PaymentStatus::Unpaid, PaymentStatus::Overdue]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "overdue" => Ok(PaymentStatus::Overdue),
            _ => Err(UnknownStatus {
                kind: "payment status",
                value: s.to_string(),
                expected: "Paid, Unpaid, Overdue",
            }),
        }
    }
}

/// Insurance claim state of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Approved,
    Rejected,
    Pending,
}

impl ClaimStatus {
    pub fn all() -> &'static [ClaimStatus] {
        &[ClaimStatus::Approved, ClaimStatus::Rejected, ClaimStatus::Pending]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Pending => "Pending",
        }
    }

    /// Status after the dashboard's claim toggle
    ///
    /// The toggle only knows Approved and Rejected: Rejected flips to
    /// Approved and everything else, Pending and missing included, becomes
    /// Rejected.
    pub fn toggled(current: Option<ClaimStatus>) -> ClaimStatus {
        match current {
            Some(ClaimStatus::Rejected) => ClaimStatus::Approved,
            _ => ClaimStatus::Rejected,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ClaimStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            "pending" => Ok(ClaimStatus::Pending),
            _ => Err(UnknownStatus {
                kind: "claim status",
                value: s.to_string(),
                expected: "Approved, Rejected, Pending",
            }),
        }
    }
}

/// Daily attendance mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn all() -> &'static [AttendanceStatus] {
        &[AttendanceStatus::Present, AttendanceStatus::Absent]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            _ => Err(UnknownStatus {
                kind: "attendance status",
                value: s.to_string(),
                expected: "Present, Absent",
            }),
        }
    }
}

// ============================================
// Records
// ============================================

/// A patient registered with the hospital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::optional_u32", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chronic_conditions: Option<String>,
    /// ISO date of the most recent visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
    /// ISO date of the next booked appointment, if any
    #[serde(default)]
    pub next_appointment: Option<String>,
    #[serde(default, deserialize_with = "de::optional_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<PatientStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Fields this crate does not model, kept so updates write them back
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Patient {
    /// Create a new (not yet persisted) patient
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            age: None,
            gender: None,
            blood_group: None,
            allergies: None,
            chronic_conditions: None,
            last_visit: None,
            next_appointment: None,
            status: None,
            email: None,
            phone: None,
            extra: Map::new(),
        }
    }

    /// Builder: set id
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set status
    pub fn status(mut self, status: PatientStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder: set last visit date
    pub fn last_visit(mut self, date: impl Into<String>) -> Self {
        self.last_visit = Some(date.into());
        self
    }

    /// Builder: set next appointment date
    pub fn next_appointment(mut self, date: impl Into<String>) -> Self {
        self.next_appointment = Some(date.into());
        self
    }

    /// Builder: set age
    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Builder: set gender
    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Builder: set blood group
    pub fn blood_group(mut self, group: impl Into<String>) -> Self {
        self.blood_group = Some(group.into());
        self
    }

    /// Builder: set contact details
    pub fn contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.phone = Some(phone.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.map(|s| s.is_active()).unwrap_or(false)
    }
}

/// A member of hospital staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    #[serde(default)]
    pub on_duty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "de::optional_f64", skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    /// Fields this crate does not model, kept so updates write them back
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Staff {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            department: None,
            shift: None,
            on_duty: false,
            position: None,
            email: None,
            phone: None,
            salary: None,
            extra: Map::new(),
        }
    }

    /// Builder: set id
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set department
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Builder: set shift
    pub fn shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = Some(shift.into());
        self
    }

    /// Builder: set duty flag
    pub fn on_duty(mut self, on_duty: bool) -> Self {
        self.on_duty = on_duty;
        self
    }

    /// Builder: set salary
    pub fn salary(mut self, salary: f64) -> Self {
        self.salary = Some(salary);
        self
    }
}

/// A patient bill with its payment and insurance-claim state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_date: Option<String>,
    #[serde(default, deserialize_with = "de::optional_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "de::optional_status", skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "de::optional_status", skip_serializing_if = "Option::is_none")]
    pub claim_status: Option<ClaimStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Fields this crate does not model, kept so updates write them back
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FinancialRecord {
    pub fn new(bill_date: impl Into<String>, amount: f64) -> Self {
        Self {
            id: None,
            bill_date: Some(bill_date.into()),
            amount: Some(amount),
            payment_status: None,
            claim_status: None,
            email: None,
            phone: None,
            extra: Map::new(),
        }
    }

    /// Builder: set id
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: set payment status
    pub fn payment(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    /// Builder: set claim status
    pub fn claim(mut self, status: ClaimStatus) -> Self {
        self.claim_status = Some(status);
        self
    }
}

/// One employee's attendance mark for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<RecordId>,
    #[serde(default)]
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::optional_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttendanceRecord {
    pub fn new(
        employee_id: impl Into<RecordId>,
        employee_name: impl Into<String>,
        date: impl Into<String>,
        status: AttendanceStatus,
    ) -> Self {
        Self {
            id: None,
            employee_id: Some(employee_id.into()),
            employee_name: employee_name.into(),
            date: Some(date.into()),
            status: Some(status),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            extra: Map::new(),
        }
    }

    /// Builder: set id
    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A payment movement recorded against the hospital accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::optional_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let id: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");

        let id: RecordId = serde_json::from_str(r#""a1b2""#).unwrap();
        assert_eq!(id, RecordId::from("a1b2"));

        assert!(serde_json::from_str::<RecordId>(r#""  ""#).is_err());
    }

    #[test]
    fn test_patient_status_wire_forms() {
        let patient: Patient =
            serde_json::from_str(r#"{"id": 1, "name": "Ada", "status": true}"#).unwrap();
        assert_eq!(patient.status, Some(PatientStatus::Active));

        let patient: Patient =
            serde_json::from_str(r#"{"id": 2, "name": "Bo", "status": "Inactive"}"#).unwrap();
        assert_eq!(patient.status, Some(PatientStatus::Inactive));

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["status"], serde_json::json!(false));
    }

    #[test]
    fn test_patient_foreign_status_is_unknown() {
        let patient: Patient =
            serde_json::from_str(r#"{"name": "Cy", "status": "Admitted"}"#).unwrap();
        assert_eq!(patient.name, "Cy");
        assert_eq!(patient.status, None);
    }

    #[test]
    fn test_patient_camel_case_fields() {
        let json = r#"{
            "id": "7",
            "name": "Dee",
            "age": "61",
            "bloodGroup": "O+",
            "chronicConditions": "Asthma",
            "lastVisit": "2024-03-02",
            "nextAppointment": null
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.age, Some(61));
        assert_eq!(patient.blood_group.as_deref(), Some("O+"));
        assert_eq!(patient.last_visit.as_deref(), Some("2024-03-02"));
        assert_eq!(patient.next_appointment, None);
        assert_eq!(patient.status, None);
    }

    #[test]
    fn test_financial_record_decoding() {
        let json = r#"{
            "id": 3,
            "billDate": "2024-02-11",
            "amount": "1500",
            "paymentStatus": "Overdue",
            "claimStatus": "Pending"
        }"#;
        let record: FinancialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.amount, Some(1500.0));
        assert_eq!(record.payment_status, Some(PaymentStatus::Overdue));
        assert_eq!(record.claim_status, Some(ClaimStatus::Pending));

        let odd = r#"{"paymentStatus": "Refunded", "claimStatus": ""}"#;
        let record: FinancialRecord = serde_json::from_str(odd).unwrap();
        assert_eq!(record.payment_status, None);
        assert_eq!(record.claim_status, None);
    }

    #[test]
    fn test_record_id_keeps_its_json_form() {
        let numeric: RecordId = serde_json::from_str("7").unwrap();
        assert!(numeric.is_numeric());
        assert_eq!(numeric, RecordId::from("7"));
        assert_eq!(serde_json::to_value(&numeric).unwrap(), serde_json::json!(7));

        let text: RecordId = serde_json::from_str(r#""7""#).unwrap();
        assert!(!text.is_numeric());
        assert_eq!(serde_json::to_value(&text).unwrap(), serde_json::json!("7"));

        assert_eq!(serde_json::to_value(RecordId::from(12u64)).unwrap(), serde_json::json!(12));
    }

    #[test]
    fn test_unmodelled_fields_survive_a_round_trip() {
        let json = serde_json::json!({
            "id": 7,
            "billDate": "2024-01-05",
            "amount": 100,
            "claimStatus": "Approved",
            "patientName": "Ada",
            "service": "X-Ray"
        });
        let mut record: FinancialRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.extra.get("patientName"), Some(&serde_json::json!("Ada")));

        record.claim_status = Some(ClaimStatus::Rejected);
        let written = serde_json::to_value(&record).unwrap();
        assert_eq!(written["id"], 7);
        assert_eq!(written["patientName"], "Ada");
        assert_eq!(written["service"], "X-Ray");
        assert_eq!(written["claimStatus"], "Rejected");
        assert!(Patient::new("Bo").extra.is_empty());
    }

    #[test]
    fn test_claim_toggle_narrows_pending() {
        assert_eq!(ClaimStatus::toggled(Some(ClaimStatus::Approved)), ClaimStatus::Rejected);
        assert_eq!(ClaimStatus::toggled(Some(ClaimStatus::Rejected)), ClaimStatus::Approved);
        assert_eq!(ClaimStatus::toggled(Some(ClaimStatus::Pending)), ClaimStatus::Rejected);
        assert_eq!(ClaimStatus::toggled(None), ClaimStatus::Rejected);
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("paid".parse::<PaymentStatus>(), Ok(PaymentStatus::Paid));
        assert_eq!("ABSENT".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        let err = "maybe".parse::<ClaimStatus>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown claim status 'maybe' (expected one of: Approved, Rejected, Pending)"
        );
    }

    #[test]
    fn test_staff_defaults_off_duty() {
        let staff: Staff = serde_json::from_str(r#"{"name": "Eve", "salary": 52000}"#).unwrap();
        assert!(!staff.on_duty);
        assert_eq!(staff.salary, Some(52000.0));
    }
}
