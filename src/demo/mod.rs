//! In-memory demonstration dataset with full CRUD over six related
//! collections.
//!
//! Key properties:
//! - Mutations are synchronous and immediately visible to every consumer
//!   sharing the store (single source of truth behind one lock).
//! - Deleting a patient cascades per `CASCADE_POLICY`, applied as a single
//!   atomic state replacement under one write lock.
//! - `reset` restores all six collections to the original seed.
//! - A snapshot can be persisted to and rehydrated from any durable
//!   key-value slot; a missing or corrupt snapshot falls back to the seed.
//!
//! Whether demo mode is active lives in `AppContext`, not here; toggling it
//! only redirects subsequent reads.

pub mod seed;

use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config;
use crate::models::enums::EntityKind;
use crate::models::{
    EmergencyContact, EntityQuery, HistoryEntry, NurseNote, Patient, Payment, Record, Requisition,
};
use crate::store::{DurableStore, StorageError};

/// Per-collection cascade policy for patient deletion.
///
/// Requisitions and nurse notes deliberately survive their patient: open
/// supply orders are settled by the ward, and nurse notes are retained for
/// the care record. Review here before changing either side.
pub const CASCADE_POLICY: &[(EntityKind, bool)] = &[
    (EntityKind::HistoryEntries, true),
    (EntityKind::EmergencyContacts, true),
    (EntityKind::Payments, true),
    (EntityKind::Requisitions, false),
    (EntityKind::NurseNotes, false),
];

/// Errors from demo store operations.
#[derive(Debug, Error)]
pub enum DemoStoreError {
    #[error("Demo store lock poisoned")]
    LockPoisoned,
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The six demo collections as one serializable state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoCollections {
    pub patients: Vec<Patient>,
    pub history_entries: Vec<HistoryEntry>,
    pub nurse_notes: Vec<NurseNote>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub payments: Vec<Payment>,
    pub requisitions: Vec<Requisition>,
}

/// In-memory authoritative demo dataset.
pub struct DemoDataStore {
    inner: RwLock<DemoCollections>,
}

impl DemoDataStore {
    /// Create a store populated from the fixed seed.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(seed::seed_collections()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, DemoCollections>, DemoStoreError> {
        self.inner.read().map_err(|_| DemoStoreError::LockPoisoned)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, DemoCollections>, DemoStoreError> {
        self.inner.write().map_err(|_| DemoStoreError::LockPoisoned)
    }

    // ── Generic row access (resolution ladder) ───────────────

    /// Fetch rows of one collection as wire-shaped JSON values, applying the
    /// query's id/patient filters. For `Patients` the patient filter selects
    /// by the patient's own id.
    pub fn fetch_rows(
        &self,
        kind: EntityKind,
        query: &EntityQuery,
    ) -> Result<Vec<Value>, DemoStoreError> {
        let state = self.read()?;
        let rows = match kind {
            EntityKind::Patients => collect_rows(&state.patients, query, |p| Some(p.id.as_str())),
            EntityKind::HistoryEntries => {
                collect_rows(&state.history_entries, query, |e| Some(e.patient_id.as_str()))
            }
            EntityKind::NurseNotes => {
                collect_rows(&state.nurse_notes, query, |n| Some(n.patient_id.as_str()))
            }
            EntityKind::EmergencyContacts => {
                collect_rows(&state.emergency_contacts, query, |c| Some(c.patient_id.as_str()))
            }
            EntityKind::Payments => {
                collect_rows(&state.payments, query, |p| Some(p.patient_id.as_str()))
            }
            EntityKind::Requisitions => {
                collect_rows(&state.requisitions, query, |r| Some(r.patient_id.as_str()))
            }
        }?;
        Ok(rows)
    }

    // ── Patients ─────────────────────────────────────────────

    pub fn patients(&self) -> Result<Vec<Patient>, DemoStoreError> {
        Ok(self.read()?.patients.clone())
    }

    pub fn patient(&self, id: &str) -> Result<Option<Patient>, DemoStoreError> {
        Ok(self.read()?.patients.iter().find(|p| p.id == id).cloned())
    }

    pub fn add_patient(&self, patient: Patient) -> Result<(), DemoStoreError> {
        self.write()?.patients.push(patient);
        Ok(())
    }

    pub fn update_patient(&self, patient: Patient) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        match state.patients.iter_mut().find(|p| p.id == patient.id) {
            Some(slot) => {
                *slot = patient;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a patient and cascade per `CASCADE_POLICY`. The new state
    /// becomes visible to readers as one replacement, never partially.
    pub fn delete_patient(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.patients.len();
        state.patients.retain(|p| p.id != id);
        if state.patients.len() == before {
            return Ok(false);
        }

        for (kind, cascades) in CASCADE_POLICY {
            if !cascades {
                continue;
            }
            match kind {
                EntityKind::HistoryEntries => state.history_entries.retain(|e| e.patient_id != id),
                EntityKind::EmergencyContacts => {
                    state.emergency_contacts.retain(|c| c.patient_id != id)
                }
                EntityKind::Payments => state.payments.retain(|p| p.patient_id != id),
                EntityKind::Requisitions => state.requisitions.retain(|r| r.patient_id != id),
                EntityKind::NurseNotes => state.nurse_notes.retain(|n| n.patient_id != id),
                EntityKind::Patients => {}
            }
        }

        tracing::debug!(patient_id = id, "Demo patient deleted with cascade");
        Ok(true)
    }

    // ── History entries ──────────────────────────────────────

    pub fn history_for(&self, patient_id: &str) -> Result<Vec<HistoryEntry>, DemoStoreError> {
        Ok(self
            .read()?
            .history_entries
            .iter()
            .filter(|e| e.patient_id == patient_id)
            .cloned()
            .collect())
    }

    pub fn add_history_entry(&self, entry: HistoryEntry) -> Result<(), DemoStoreError> {
        self.write()?.history_entries.push(entry);
        Ok(())
    }

    pub fn update_history_entry(&self, entry: HistoryEntry) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        match state.history_entries.iter_mut().find(|e| e.id == entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_history_entry(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.history_entries.len();
        state.history_entries.retain(|e| e.id != id);
        Ok(state.history_entries.len() != before)
    }

    // ── Nurse notes ──────────────────────────────────────────

    pub fn nurse_notes(&self) -> Result<Vec<NurseNote>, DemoStoreError> {
        Ok(self.read()?.nurse_notes.clone())
    }

    pub fn add_nurse_note(&self, note: NurseNote) -> Result<(), DemoStoreError> {
        self.write()?.nurse_notes.push(note);
        Ok(())
    }

    pub fn delete_nurse_note(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.nurse_notes.len();
        state.nurse_notes.retain(|n| n.id != id);
        Ok(state.nurse_notes.len() != before)
    }

    // ── Emergency contacts ───────────────────────────────────

    pub fn emergency_contacts(&self) -> Result<Vec<EmergencyContact>, DemoStoreError> {
        Ok(self.read()?.emergency_contacts.clone())
    }

    pub fn add_emergency_contact(&self, contact: EmergencyContact) -> Result<(), DemoStoreError> {
        self.write()?.emergency_contacts.push(contact);
        Ok(())
    }

    pub fn delete_emergency_contact(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.emergency_contacts.len();
        state.emergency_contacts.retain(|c| c.id != id);
        Ok(state.emergency_contacts.len() != before)
    }

    // ── Payments ─────────────────────────────────────────────

    pub fn payments(&self) -> Result<Vec<Payment>, DemoStoreError> {
        Ok(self.read()?.payments.clone())
    }

    pub fn add_payment(&self, payment: Payment) -> Result<(), DemoStoreError> {
        self.write()?.payments.push(payment);
        Ok(())
    }

    pub fn delete_payment(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.payments.len();
        state.payments.retain(|p| p.id != id);
        Ok(state.payments.len() != before)
    }

    // ── Requisitions ─────────────────────────────────────────

    pub fn requisitions(&self) -> Result<Vec<Requisition>, DemoStoreError> {
        Ok(self.read()?.requisitions.clone())
    }

    pub fn add_requisition(&self, requisition: Requisition) -> Result<(), DemoStoreError> {
        self.write()?.requisitions.push(requisition);
        Ok(())
    }

    pub fn delete_requisition(&self, id: &str) -> Result<bool, DemoStoreError> {
        let mut state = self.write()?;
        let before = state.requisitions.len();
        state.requisitions.retain(|r| r.id != id);
        Ok(state.requisitions.len() != before)
    }

    // ── Reset & snapshot ─────────────────────────────────────

    /// Restore all six collections to the original seed atomically.
    pub fn reset(&self) -> Result<(), DemoStoreError> {
        let mut state = self.write()?;
        *state = seed::seed_collections();
        tracing::info!("Demo data reset to seed");
        Ok(())
    }

    /// Deep copy of the current state (snapshots, tests).
    pub fn snapshot(&self) -> Result<DemoCollections, DemoStoreError> {
        Ok(self.read()?.clone())
    }

    /// Persist the current state to the durable snapshot slot.
    pub fn save_snapshot(&self, store: &dyn DurableStore) -> Result<(), DemoStoreError> {
        let state = self.read()?;
        let blob = serde_json::to_string(&*state)?;
        store.set(config::DEMO_SNAPSHOT_SLOT, &blob)?;
        Ok(())
    }

    /// Rehydrate from the durable snapshot slot. Returns `true` if a
    /// snapshot was loaded; a missing or corrupt slot leaves the seed in
    /// place and is never fatal.
    pub fn load_snapshot(&self, store: &dyn DurableStore) -> Result<bool, DemoStoreError> {
        let blob = match store.get(config::DEMO_SNAPSHOT_SLOT)? {
            Some(blob) => blob,
            None => return Ok(false),
        };
        match serde_json::from_str::<DemoCollections>(&blob) {
            Ok(loaded) => {
                *self.write()? = loaded;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Corrupt demo snapshot ignored: {e}");
                Ok(false)
            }
        }
    }
}

impl Default for DemoDataStore {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_rows<T: Record>(
    rows: &[T],
    query: &EntityQuery,
    patient_fk: impl Fn(&T) -> Option<&str>,
) -> Result<Vec<Value>, serde_json::Error> {
    rows.iter()
        .filter(|r| query.id.as_deref().map_or(true, |id| r.ident() == id))
        .filter(|r| {
            query
                .patient_id
                .as_deref()
                .map_or(true, |pid| patient_fk(r) == Some(pid))
        })
        .map(serde_json::to_value)
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn count_for(store: &DemoDataStore, patient_id: &str) -> (usize, usize, usize, usize, usize) {
        let state = store.snapshot().unwrap();
        (
            state
                .history_entries
                .iter()
                .filter(|e| e.patient_id == patient_id)
                .count(),
            state
                .emergency_contacts
                .iter()
                .filter(|c| c.patient_id == patient_id)
                .count(),
            state
                .payments
                .iter()
                .filter(|p| p.patient_id == patient_id)
                .count(),
            state
                .requisitions
                .iter()
                .filter(|r| r.patient_id == patient_id)
                .count(),
            state
                .nurse_notes
                .iter()
                .filter(|n| n.patient_id == patient_id)
                .count(),
        )
    }

    // ── Cascade delete ───────────────────────────────────────

    #[test]
    fn delete_patient_cascades_asymmetrically() {
        let store = DemoDataStore::new();
        let (h, c, p, r, n) = count_for(&store, "pac-001");
        assert!(h > 0 && c > 0 && p > 0, "seed has pac-001 children");
        assert!(r > 0 && n > 0, "seed has non-cascading pac-001 children");

        assert!(store.delete_patient("pac-001").unwrap());

        let (h, c, p, r2, n2) = count_for(&store, "pac-001");
        assert_eq!((h, c, p), (0, 0, 0), "cascading collections emptied");
        assert_eq!((r2, n2), (r, n), "requisitions and nurse notes survive");
        assert!(store.patient("pac-001").unwrap().is_none());
    }

    #[test]
    fn delete_patient_leaves_other_patients_untouched() {
        let store = DemoDataStore::new();
        let before = count_for(&store, "pac-003");

        store.delete_patient("pac-001").unwrap();

        assert_eq!(count_for(&store, "pac-003"), before);
        assert!(store.patient("pac-003").unwrap().is_some());
    }

    #[test]
    fn delete_unknown_patient_is_noop() {
        let store = DemoDataStore::new();
        let before = store.snapshot().unwrap();
        assert!(!store.delete_patient("pac-999").unwrap());
        assert_eq!(store.snapshot().unwrap(), before);
    }

    // ── Reset ────────────────────────────────────────────────

    #[test]
    fn reset_restores_seed_after_arbitrary_mutations() {
        let store = DemoDataStore::new();
        let seed = store.snapshot().unwrap();

        store
            .add_patient(Patient {
                id: "pac-100".into(),
                name: "New Patient".into(),
                date_of_birth: None,
                ward: None,
                admitted_at: None,
            })
            .unwrap();
        store
            .update_patient(Patient {
                id: "pac-002".into(),
                name: "Renamed".into(),
                date_of_birth: None,
                ward: None,
                admitted_at: None,
            })
            .unwrap();
        store.delete_patient("pac-001").unwrap();
        store.delete_requisition("req-002").unwrap();
        store
            .add_payment(Payment {
                id: "pay-100".into(),
                patient_id: "pac-003".into(),
                amount_cents: 1,
                description: "extra".into(),
                date: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            })
            .unwrap();

        store.reset().unwrap();
        assert_eq!(store.snapshot().unwrap(), seed);
    }

    // ── Visibility ───────────────────────────────────────────

    #[test]
    fn mutations_visible_to_all_consumers_of_shared_store() {
        use std::sync::Arc;
        let store = Arc::new(DemoDataStore::new());
        let other = Arc::clone(&store);

        store.delete_patient("pac-002").unwrap();
        assert!(other.patient("pac-002").unwrap().is_none());
    }

    // ── fetch_rows ───────────────────────────────────────────

    #[test]
    fn fetch_rows_filters_by_patient() {
        let store = DemoDataStore::new();
        let rows = store
            .fetch_rows(
                EntityKind::HistoryEntries,
                &EntityQuery::for_patient("pac-001"),
            )
            .unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row["patient_id"], "pac-001");
        }
    }

    #[test]
    fn fetch_rows_patient_filter_selects_patient_by_own_id() {
        let store = DemoDataStore::new();
        let rows = store
            .fetch_rows(EntityKind::Patients, &EntityQuery::for_patient("pac-002"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "pac-002");
    }

    #[test]
    fn fetch_rows_by_id_selects_single_row() {
        let store = DemoDataStore::new();
        let rows = store
            .fetch_rows(EntityKind::Payments, &EntityQuery::by_id("pay-003"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "pay-003");
    }

    // ── Snapshot persistence ─────────────────────────────────

    #[test]
    fn snapshot_round_trips_through_durable_store() {
        let durable = MemoryStore::new();
        let store = DemoDataStore::new();
        store.delete_patient("pac-001").unwrap();
        store.save_snapshot(&durable).unwrap();

        let restored = DemoDataStore::new();
        assert!(restored.load_snapshot(&durable).unwrap());
        assert_eq!(restored.snapshot().unwrap(), store.snapshot().unwrap());
    }

    #[test]
    fn missing_or_corrupt_snapshot_keeps_seed() {
        let durable = MemoryStore::new();
        let store = DemoDataStore::new();
        let seed = store.snapshot().unwrap();

        assert!(!store.load_snapshot(&durable).unwrap());
        assert_eq!(store.snapshot().unwrap(), seed);

        durable
            .set(crate::config::DEMO_SNAPSHOT_SLOT, "{not json")
            .unwrap();
        assert!(!store.load_snapshot(&durable).unwrap());
        assert_eq!(store.snapshot().unwrap(), seed);
    }
}
