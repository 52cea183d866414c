//! Form validation
//!
//! Checks run on a record before it is sent upstream. Records coming back
//! from the API are never validated: the server is the source of truth.

use super::{date_portion, AttendanceRecord, FinancialRecord, Patient, Staff, Transaction};
use chrono::NaiveDate;
use thiserror::Error;

/// A field failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Records that can be checked before create/update
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Patient {
    fn validate(&self) -> Result<(), ValidationError> {
        check_name("name", &self.name)?;
        if let Some(age) = self.age {
            if age > 150 {
                return Err(ValidationError::new("age", format!("{} is out of range", age)));
            }
        }
        check_email(self.email.as_deref())?;
        check_phone(self.phone.as_deref())?;
        check_date("lastVisit", self.last_visit.as_deref())?;
        check_date("nextAppointment", self.next_appointment.as_deref())?;
        Ok(())
    }
}

impl Validate for Staff {
    fn validate(&self) -> Result<(), ValidationError> {
        check_name("name", &self.name)?;
        check_email(self.email.as_deref())?;
        check_phone(self.phone.as_deref())?;
        check_non_negative("salary", self.salary)
    }
}

impl Validate for FinancialRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("amount", self.amount)?;
        check_date("billDate", self.bill_date.as_deref())?;
        check_email(self.email.as_deref())?;
        check_phone(self.phone.as_deref())
    }
}

impl Validate for AttendanceRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        check_name("employeeName", &self.employee_name)?;
        check_date("date", self.date.as_deref())
    }
}

impl Validate for Transaction {
    fn validate(&self) -> Result<(), ValidationError> {
        check_date("date", self.date.as_deref())
    }
}

fn check_name(field: &'static str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

fn check_email(email: Option<&str>) -> Result<(), ValidationError> {
    let email = match email.map(str::trim) {
        Some(e) if !e.is_empty() => e,
        _ => return Ok(()),
    };

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("email", format!("'{}' is not an email address", email)))
    }
}

fn check_phone(phone: Option<&str>) -> Result<(), ValidationError> {
    let phone = match phone.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(()),
    };

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();

    if allowed && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(ValidationError::new("phone", format!("'{}' is not a phone number", phone)))
    }
}

fn check_date(field: &'static str, date: Option<&str>) -> Result<(), ValidationError> {
    let date = match date.map(str::trim) {
        Some(d) if !d.is_empty() => d,
        _ => return Ok(()),
    };

    NaiveDate::parse_from_str(date_portion(date), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a YYYY-MM-DD date", date)))
}

fn check_non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < 0.0 => Err(ValidationError::new(field, "must not be negative")),
        _ => Ok(()),
    }
}
