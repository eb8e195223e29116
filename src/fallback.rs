//! Static fallback datasets, one per entity class.
//!
//! Served when the live tier cannot answer: transport failure, an
//! unauthenticated or temporary principal, or an empty live result. All
//! rows are fictional sample data, wire-shaped so they flow through the
//! same deserialization path as live rows. Every class is non-empty.

use serde_json::{json, Value};

use crate::models::enums::EntityKind;

/// Fallback rows for one entity class.
pub fn rows(kind: EntityKind) -> Vec<Value> {
    match kind {
        EntityKind::Patients => vec![
            json!({
                "id": "smp-001",
                "name": "Sample Patient A",
                "date_of_birth": "1950-01-15",
                "ward": "Sample Ward",
                "admitted_at": "2026-01-10"
            }),
            json!({
                "id": "smp-002",
                "name": "Sample Patient B",
                "date_of_birth": "1946-09-02",
                "ward": "Sample Ward",
                "admitted_at": "2026-02-22"
            }),
        ],
        EntityKind::HistoryEntries => vec![
            json!({
                "id": "smp-his-001",
                "patient_id": "smp-001",
                "date": "2026-02-01",
                "title": "Sample admission assessment",
                "notes": "Sample record shown while live data is unavailable.",
                "author_id": null
            }),
            json!({
                "id": "smp-his-002",
                "patient_id": "smp-001",
                "date": "2026-03-15",
                "title": "Sample medication review",
                "notes": null,
                "author_id": null
            }),
        ],
        EntityKind::NurseNotes => vec![json!({
            "id": "smp-nn-001",
            "patient_id": "smp-001",
            "note": "Sample shift note.",
            "author_id": null,
            "created_at": "2026-03-15T08:00:00"
        })],
        EntityKind::EmergencyContacts => vec![json!({
            "id": "smp-ec-001",
            "patient_id": "smp-001",
            "name": "Sample Contact",
            "relationship": "relative",
            "phone": "+00 000 000 000"
        })],
        EntityKind::Payments => vec![json!({
            "id": "smp-pay-001",
            "patient_id": "smp-001",
            "amount_cents": 100_000,
            "description": "Sample monthly care fee",
            "date": "2026-02-28"
        })],
        EntityKind::Requisitions => vec![json!({
            "id": "smp-req-001",
            "patient_id": "smp-001",
            "item": "Sample supply item",
            "quantity": 1,
            "requested_by": null,
            "requested_at": "2026-03-01T09:30:00"
        })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EmergencyContact, HistoryEntry, NurseNote, Patient, Payment, Requisition,
    };

    #[test]
    fn every_entity_class_has_nonempty_fallback() {
        for kind in [
            EntityKind::Patients,
            EntityKind::HistoryEntries,
            EntityKind::NurseNotes,
            EntityKind::EmergencyContacts,
            EntityKind::Payments,
            EntityKind::Requisitions,
        ] {
            assert!(!rows(kind).is_empty(), "{kind:?} fallback is empty");
        }
    }

    #[test]
    fn fallback_rows_deserialize_into_their_records() {
        for row in rows(EntityKind::Patients) {
            serde_json::from_value::<Patient>(row).unwrap();
        }
        for row in rows(EntityKind::HistoryEntries) {
            serde_json::from_value::<HistoryEntry>(row).unwrap();
        }
        for row in rows(EntityKind::NurseNotes) {
            serde_json::from_value::<NurseNote>(row).unwrap();
        }
        for row in rows(EntityKind::EmergencyContacts) {
            serde_json::from_value::<EmergencyContact>(row).unwrap();
        }
        for row in rows(EntityKind::Payments) {
            serde_json::from_value::<Payment>(row).unwrap();
        }
        for row in rows(EntityKind::Requisitions) {
            serde_json::from_value::<Requisition>(row).unwrap();
        }
    }
}
