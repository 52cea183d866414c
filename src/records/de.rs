//! Lenient field decoders
//!
//! Form-backed fields arrive as numbers, numeric strings, empty strings or
//! null depending on which screen wrote them. These decoders accept all of
//! them and map anything unusable to `None`.
//!
//! Status fields get the same treatment: an empty or unrecognised label is
//! logged and decoded as `None`, so one odd row never fails a whole
//! collection.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawNumber {
    fn into_f64(self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
            RawNumber::Other(_) => None,
        }
        .filter(|n| n.is_finite())
    }
}

/// Decode an optional amount: number, numeric string, or anything else as `None`
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(RawNumber::into_f64))
}

/// Decode an optional whole number (ages)
pub fn optional_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = optional_f64(deserializer)?;
    Ok(value
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n.round() as u32))
}

/// Decode an optional status label
///
/// Labels go through `FromStr`, so matching is case-insensitive. Other JSON
/// shapes (the boolean patient flag) go through the type's own `Deserialize`.
/// Null, blank and unrecognised values become `None`.
pub fn optional_status<'de, D, S>(deserializer: D) -> Result<Option<S>, D::Error>
where
    D: Deserializer<'de>,
    S: FromStr + DeserializeOwned,
    S::Err: Display,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    let parsed = match &value {
        Value::String(label) if label.trim().is_empty() => return Ok(None),
        Value::String(label) => label.parse::<S>().map_err(|e| e.to_string()),
        other => S::deserialize(other.clone()).map_err(|e| e.to_string()),
    };

    match parsed {
        Ok(status) => Ok(Some(status)),
        Err(error) => {
            tracing::warn!(value = %value, error = %error, "Unrecognised status, counting it as unknown");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ClaimStatus, PatientStatus};

    #[derive(Deserialize)]
    struct Bill {
        #[serde(default, deserialize_with = "optional_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "optional_u32")]
        age: Option<u32>,
    }

    fn parse(json: &str) -> Bill {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_and_strings() {
        let bill = parse(r#"{"amount": 120.5, "age": "42"}"#);
        assert_eq!(bill.amount, Some(120.5));
        assert_eq!(bill.age, Some(42));

        let bill = parse(r#"{"amount": " 99 "}"#);
        assert_eq!(bill.amount, Some(99.0));
    }

    #[test]
    fn test_unusable_values_become_none() {
        let bill = parse(r#"{"amount": "n/a", "age": -3}"#);
        assert_eq!(bill.amount, None);
        assert_eq!(bill.age, None);

        let bill = parse(r#"{"amount": null, "age": true}"#);
        assert_eq!(bill.amount, None);
        assert_eq!(bill.age, None);

        let bill = parse("{}");
        assert_eq!(bill.amount, None);
    }

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "optional_status")]
        claim: Option<ClaimStatus>,
        #[serde(default, deserialize_with = "optional_status")]
        patient: Option<PatientStatus>,
    }

    fn flags(json: &str) -> Flags {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_labels_and_flags() {
        let f = flags(r#"{"claim": "approved", "patient": true}"#);
        assert_eq!(f.claim, Some(ClaimStatus::Approved));
        assert_eq!(f.patient, Some(PatientStatus::Active));

        let f = flags(r#"{"claim": "Pending", "patient": "Inactive"}"#);
        assert_eq!(f.claim, Some(ClaimStatus::Pending));
        assert_eq!(f.patient, Some(PatientStatus::Inactive));
    }

    #[test]
    fn test_blank_and_foreign_statuses_become_none() {
        let f = flags(r#"{"claim": "", "patient": "Admitted"}"#);
        assert_eq!(f.claim, None);
        assert_eq!(f.patient, None);

        let f = flags(r#"{"claim": "  ", "patient": 3}"#);
        assert_eq!(f.claim, None);
        assert_eq!(f.patient, None);

        let f = flags(r#"{"claim": null}"#);
        assert_eq!(f.claim, None);
        assert_eq!(f.patient, None);
    }
}
