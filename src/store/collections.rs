//! In-memory record collections
//!
//! `Collections` holds one ordered vector per entity. `Stored` maps a record
//! type to its vector so the store can be written once for all of them.

use crate::records::{
    AttendanceRecord, FinancialRecord, Patient, Record, RecordId, Staff, Transaction, Validate,
};

/// Every collection mirrored from the API
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub patients: Vec<Patient>,
    pub staff: Vec<Staff>,
    pub financial: Vec<FinancialRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub transactions: Vec<Transaction>,
}

/// A record type with a slot in [`Collections`]
pub trait Stored: Record + Validate {
    fn slot(collections: &Collections) -> &Vec<Self>;

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self>;
}

impl Stored for Patient {
    fn slot(collections: &Collections) -> &Vec<Self> {
        &collections.patients
    }

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.patients
    }
}

impl Stored for Staff {
    fn slot(collections: &Collections) -> &Vec<Self> {
        &collections.staff
    }

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.staff
    }
}

impl Stored for FinancialRecord {
    fn slot(collections: &Collections) -> &Vec<Self> {
        &collections.financial
    }

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.financial
    }
}

impl Stored for AttendanceRecord {
    fn slot(collections: &Collections) -> &Vec<Self> {
        &collections.attendance
    }

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.attendance
    }
}

impl Stored for Transaction {
    fn slot(collections: &Collections) -> &Vec<Self> {
        &collections.transactions
    }

    fn slot_mut(collections: &mut Collections) -> &mut Vec<Self> {
        &mut collections.transactions
    }
}

/// Replace the record with the same id in place; returns false if none matched
pub(crate) fn replace_by_id<R: Record>(records: &mut [R], id: &RecordId, record: R) -> bool {
    match records.iter_mut().find(|r| r.id() == Some(id)) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Drop every record with the given id; returns how many were removed
pub(crate) fn remove_by_id<R: Record>(records: &mut Vec<R>, id: &RecordId) -> usize {
    let before = records.len();
    records.retain(|r| r.id() != Some(id));
    before - records.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> Vec<Staff> {
        vec![
            Staff::new("A").with_id(1),
            Staff::new("B").with_id(2),
            Staff::new("C").with_id(3),
        ]
    }

    #[test]
    fn test_replace_by_id_keeps_position() {
        let mut records = staff();
        let replaced =
            replace_by_id(&mut records, &RecordId::from("2"), Staff::new("B2").with_id(2));

        assert!(replaced);
        let names: Vec<&str> = records.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
    }

    #[test]
    fn test_replace_missing_id() {
        let mut records = staff();
        assert!(!replace_by_id(&mut records, &RecordId::from("9"), Staff::new("Z")));
        assert_eq!(records, staff());
    }

    #[test]
    fn test_remove_by_id() {
        let mut records = staff();
        assert_eq!(remove_by_id(&mut records, &RecordId::from("1")), 1);
        assert_eq!(remove_by_id(&mut records, &RecordId::from("1")), 0);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_slots() {
        let mut collections = Collections::default();
        Staff::slot_mut(&mut collections).push(Staff::new("A"));
        assert_eq!(Staff::slot(&collections).len(), 1);
        assert!(Patient::slot(&collections).is_empty());
    }
}
