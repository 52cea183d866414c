//! Store change notifications and load reports

use crate::records::{EntityKind, RecordId};
use serde::Serialize;

/// A local change to one of the store's collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum StoreEvent {
    /// A collection was replaced wholesale from the API
    Loaded { kind: EntityKind, count: usize },
    Created { kind: EntityKind, id: Option<RecordId> },
    Updated { kind: EntityKind, id: RecordId },
    Removed { kind: EntityKind, id: RecordId },
}

impl StoreEvent {
    pub fn kind(&self) -> EntityKind {
        match self {
            StoreEvent::Loaded { kind, .. }
            | StoreEvent::Created { kind, .. }
            | StoreEvent::Updated { kind, .. }
            | StoreEvent::Removed { kind, .. } => *kind,
        }
    }
}

/// Outcome of a multi-collection load
///
/// A failed collection keeps whatever the store held before (empty on first
/// load); the others are still applied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub loaded: Vec<(EntityKind, usize)>,
    pub failed: Vec<(EntityKind, String)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        self.failed.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn count(&self, kind: EntityKind) -> Option<usize> {
        self.loaded
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_report() {
        let report = LoadReport {
            loaded: vec![(EntityKind::Patients, 3), (EntityKind::Financial, 0)],
            failed: vec![(EntityKind::Staff, "boom".to_string())],
        };

        assert!(!report.is_complete());
        assert_eq!(report.failed_kinds(), vec![EntityKind::Staff]);
        assert_eq!(report.count(EntityKind::Patients), Some(3));
        assert_eq!(report.count(EntityKind::Staff), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = StoreEvent::Removed {
            kind: EntityKind::Staff,
            id: RecordId::from("4"),
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "removed");
        assert_eq!(json["kind"], "staff");
        assert_eq!(json["id"], "4");
        assert_eq!(event.kind(), EntityKind::Staff);
    }
}
