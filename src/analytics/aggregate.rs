//! Aggregation
//!
//! Pure reducers turning a record collection into chart-ready summaries:
//! grouped counts, grouped sums, month-bucketed series and percentages.
//!
//! None of these functions fail. Missing grouping keys land in the
//! [`UNKNOWN_BUCKET`], non-numeric amounts count as zero, and an empty input
//! yields an empty result.

use crate::records::{AttendanceStatus, ClaimStatus, PatientStatus, PaymentStatus};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Bucket label used for records whose grouping key is missing
pub const UNKNOWN_BUCKET: &str = "Unknown";

/// A value that can name an aggregation bucket
///
/// `None` means "missing" and sends the record to [`UNKNOWN_BUCKET`]. Only
/// absent values and empty strings are missing: `false` and `0` are real keys
/// with buckets of their own.
pub trait BucketKey {
    fn bucket_label(&self) -> Option<String>;
}

impl BucketKey for str {
    fn bucket_label(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl BucketKey for String {
    fn bucket_label(&self) -> Option<String> {
        self.as_str().bucket_label()
    }
}

impl BucketKey for bool {
    fn bucket_label(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: BucketKey + ?Sized> BucketKey for &T {
    fn bucket_label(&self) -> Option<String> {
        (**self).bucket_label()
    }
}

impl<T: BucketKey> BucketKey for Option<T> {
    fn bucket_label(&self) -> Option<String> {
        self.as_ref().and_then(BucketKey::bucket_label)
    }
}

macro_rules! numeric_bucket_key {
    ($($t:ty),*) => {
        $(
            impl BucketKey for $t {
                fn bucket_label(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

numeric_bucket_key!(i32, i64, u32, u64, usize);

macro_rules! status_bucket_key {
    ($($t:ty),*) => {
        $(
            impl BucketKey for $t {
                fn bucket_label(&self) -> Option<String> {
                    Some(self.label().to_string())
                }
            }
        )*
    };
}

status_bucket_key!(PatientStatus, PaymentStatus, ClaimStatus, AttendanceStatus);

/// Grouped values keyed by bucket label, in first-seen key order
///
/// Serialises as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for Tally<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> Tally<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a bucket, inserting `init` the first time it is seen
    pub fn entry(&mut self, key: String, init: V) -> &mut V {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(key.clone(), position);
                self.entries.push((key, init));
                position
            }
        };
        &mut self.entries[position].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<(String, V)> {
        self.entries
    }
}

impl<V: Serialize> Serialize for Tally<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn bucket_for<K: BucketKey>(key: K) -> String {
    key.bucket_label()
        .unwrap_or_else(|| UNKNOWN_BUCKET.to_string())
}

/// Count records per bucket
///
/// The counts always add up to `records.len()`.
pub fn group_count<'a, T, K, F>(records: &'a [T], key_fn: F) -> Tally<usize>
where
    K: BucketKey,
    F: Fn(&'a T) -> K,
{
    let mut tally = Tally::new();
    for record in records {
        *tally.entry(bucket_for(key_fn(record)), 0) += 1;
    }
    tally
}

/// Sum a numeric field per bucket
///
/// Missing or non-finite values contribute `0`.
pub fn group_sum<'a, T, K, F, G>(records: &'a [T], key_fn: F, value_fn: G) -> Tally<f64>
where
    K: BucketKey,
    F: Fn(&'a T) -> K,
    G: Fn(&'a T) -> Option<f64>,
{
    let mut tally = Tally::new();
    for record in records {
        let value = value_fn(record).filter(|v| v.is_finite()).unwrap_or(0.0);
        *tally.entry(bucket_for(key_fn(record)), 0.0) += value;
    }
    tally
}

/// One point of a month-bucketed series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// Year-month bucket (`YYYY-MM`)
    pub bucket: String,
    pub count: usize,
}

impl SeriesPoint {
    pub fn new(bucket: impl Into<String>, count: usize) -> Self {
        Self {
            bucket: bucket.into(),
            count,
        }
    }
}

/// Two aligned monthly series: every record, and the records matching a predicate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MonthlySeries {
    pub all: Vec<SeriesPoint>,
    /// Same buckets as `all`; a month with records but no matches counts 0
    pub matching: Vec<SeriesPoint>,
}

/// Year-month bucket of an ISO date string: its first 7 characters
pub fn month_bucket(date: &str) -> Option<&str> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    Some(date.get(..7).unwrap_or(date))
}

/// Count records per month, ascending by month
///
/// Records without a date are left out; months without records are not
/// zero-filled.
pub fn monthly_series<'a, T, D>(records: &'a [T], date_fn: D) -> Vec<SeriesPoint>
where
    D: Fn(&'a T) -> Option<&'a str>,
{
    monthly_series_with(records, date_fn, |_| true).all
}

/// Count records per month, plus a second aligned series counting only the
/// records that satisfy `predicate`
pub fn monthly_series_with<'a, T, D, P>(
    records: &'a [T],
    date_fn: D,
    predicate: P,
) -> MonthlySeries
where
    D: Fn(&'a T) -> Option<&'a str>,
    P: Fn(&'a T) -> bool,
{
    // BTreeMap keeps "YYYY-MM" keys in calendar order
    let mut buckets: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut undated = 0usize;

    for record in records {
        let Some(bucket) = date_fn(record).and_then(month_bucket) else {
            undated += 1;
            continue;
        };

        let counts = buckets.entry(bucket.to_string()).or_insert((0, 0));
        counts.0 += 1;
        if predicate(record) {
            counts.1 += 1;
        }
    }

    if undated > 0 {
        tracing::debug!(undated, "Skipped records without a date in monthly series");
    }

    let mut series = MonthlySeries::default();
    for (bucket, (all, matching)) in buckets {
        series.matching.push(SeriesPoint::new(bucket.clone(), matching));
        series.all.push(SeriesPoint::new(bucket, all));
    }
    series
}

/// `part / whole` as a percentage rounded to one decimal place
///
/// Returns `0.0` instead of NaN or infinity when `whole` is zero.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let ratio = (part / whole) * 100.0;
    if !ratio.is_finite() {
        return 0.0;
    }
    (ratio * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Patient;

    fn scenario_patients() -> Vec<Patient> {
        vec![
            Patient::new("A")
                .with_id(1)
                .status(PatientStatus::Active)
                .last_visit("2024-01-10"),
            Patient::new("B")
                .with_id(2)
                .status(PatientStatus::Inactive)
                .last_visit("2024-01-20"),
            Patient::new("C")
                .with_id(3)
                .status(PatientStatus::Active)
                .last_visit("2024-02-05"),
        ]
    }

    #[test]
    fn test_group_count_by_status() {
        let patients = scenario_patients();
        let counts = group_count(&patients, |p| p.status);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get("Active"), Some(&2));
        assert_eq!(counts.get("Inactive"), Some(&1));
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["Active", "Inactive"]);
    }

    #[test]
    fn test_group_count_totals_match_input() {
        let mut patients = scenario_patients();
        patients.push(Patient::new("D"));
        patients.push(Patient::new("E").gender(""));

        let counts = group_count(&patients, |p| p.gender.clone());
        assert_eq!(counts.values().sum::<usize>(), patients.len());
        assert_eq!(counts.get(UNKNOWN_BUCKET), Some(&5));
    }

    #[test]
    fn test_group_count_empty() {
        let patients: Vec<Patient> = Vec::new();
        let counts = group_count(&patients, |p| p.status);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_falsy_keys_keep_their_own_bucket() {
        let values = vec![(0u32, false), (0, true), (2, false)];

        let by_number = group_count(&values, |v| v.0);
        assert_eq!(by_number.get("0"), Some(&2));
        assert_eq!(by_number.get(UNKNOWN_BUCKET), None);

        let by_flag = group_count(&values, |v| v.1);
        assert_eq!(by_flag.get("false"), Some(&2));
        assert_eq!(by_flag.get("true"), Some(&1));
    }

    #[test]
    fn test_group_sum_coerces_missing_to_zero() {
        let bills = vec![
            ("Paid", Some(100.0)),
            ("Unpaid", None),
            ("Paid", Some(f64::NAN)),
            ("Paid", Some(50.5)),
        ];

        let totals = group_sum(&bills, |b| b.0, |b| b.1);
        assert_eq!(totals.get("Paid"), Some(&150.5));
        assert_eq!(totals.get("Unpaid"), Some(&0.0));
        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["Paid", "Unpaid"]);
    }

    #[test]
    fn test_monthly_series_scenario() {
        let patients = scenario_patients();
        let series = monthly_series_with(
            &patients,
            |p| p.last_visit.as_deref(),
            |p| p.is_active(),
        );

        assert_eq!(
            series.all,
            vec![SeriesPoint::new("2024-01", 2), SeriesPoint::new("2024-02", 1)]
        );
        assert_eq!(
            series.matching,
            vec![SeriesPoint::new("2024-01", 1), SeriesPoint::new("2024-02", 1)]
        );
    }

    #[test]
    fn test_monthly_series_sorted_and_gapped() {
        let dates = vec![
            Some("2024-03-01"),
            Some("2023-12-31T23:00:00Z"),
            None,
            Some(""),
            Some("2024-01-15"),
            Some("2024-03-20"),
        ];

        let series = monthly_series(&dates, |d| *d);
        let buckets: Vec<&str> = series.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2023-12", "2024-01", "2024-03"]);
        assert!(buckets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(series.iter().map(|p| p.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_monthly_series_matching_is_aligned() {
        let patients = scenario_patients();
        let series = monthly_series_with(&patients, |p| p.last_visit.as_deref(), |_| false);
        assert_eq!(series.all.len(), series.matching.len());
        assert!(series.matching.iter().all(|p| p.count == 0));
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(25.0, 100.0), 25.0);
        assert_eq!(percentage(1.0, 3.0), 33.3);
        assert_eq!(percentage(2.0, 3.0), 66.7);
    }

    #[test]
    fn test_tally_serializes_in_first_seen_order() {
        let mut tally = Tally::new();
        *tally.entry("Zeta".to_string(), 0) += 1;
        *tally.entry("Alpha".to_string(), 0) += 2;

        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"Zeta":1,"Alpha":2}"#);
    }
}
