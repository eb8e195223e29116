//! Alert store: same shape as the notification store, with status
//! transitions instead of a read flag.
//!
//! Retrieval order is priority descending with creation time descending as
//! the tie-break. Persistence mirrors the notification slot: write-through
//! on every mutation, tolerant one-time rehydration, separate slot key so
//! corruption in one store never affects the other.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config;
use crate::models::enums::AlertStatus;
use crate::models::{Alert, AlertDraft};
use crate::store::DurableStore;

pub struct AlertStore {
    alerts: Vec<Alert>,
    store: Arc<dyn DurableStore>,
}

impl AlertStore {
    /// Rehydrate from the durable slot.
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        let alerts = load_alerts(store.as_ref());
        Self { alerts, store }
    }

    /// Raise a new alert: fresh id, current timestamp, active status.
    pub fn add(&mut self, draft: AlertDraft) -> Uuid {
        let alert = Alert {
            id: Uuid::new_v4(),
            kind: draft.kind,
            priority: draft.priority,
            status: AlertStatus::Active,
            title: draft.title,
            body: draft.body,
            patient_id: draft.patient_id,
            created_at: Utc::now(),
        };
        let id = alert.id;
        self.alerts.push(alert);
        self.persist();
        id
    }

    /// All alerts in retrieval order.
    pub fn all(&self) -> Vec<Alert> {
        let mut sorted = self.alerts.clone();
        sort_for_retrieval(&mut sorted);
        sorted
    }

    /// Active alerts in retrieval order.
    pub fn active(&self) -> Vec<Alert> {
        let mut active: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .cloned()
            .collect();
        sort_for_retrieval(&mut active);
        active
    }

    pub fn resolve(&mut self, id: Uuid) -> bool {
        self.transition(id, AlertStatus::Resolved)
    }

    pub fn archive(&mut self, id: Uuid) -> bool {
        self.transition(id, AlertStatus::Archived)
    }

    fn transition(&mut self, id: Uuid, status: AlertStatus) -> bool {
        let changed = match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) if alert.status != status => {
                alert.status = status;
                true
            }
            _ => false,
        };
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.alerts) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Alert serialization failed: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(config::ALERTS_SLOT, &blob) {
            tracing::warn!("Alert write-through failed: {e}");
        }
    }
}

/// Priority descending, creation time descending as tie-break.
fn sort_for_retrieval(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

fn load_alerts(store: &dyn DurableStore) -> Vec<Alert> {
    let blob = match store.get(config::ALERTS_SLOT) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Alert slot unreadable, starting empty: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&blob) {
        Ok(alerts) => alerts,
        Err(e) => {
            tracing::warn!("Corrupt alert slot ignored: {e}");
            Vec::new()
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{AlertKind, AlertPriority};
    use crate::store::MemoryStore;

    fn draft(kind: AlertKind, priority: AlertPriority, title: &str) -> AlertDraft {
        AlertDraft {
            kind,
            priority,
            title: title.to_string(),
            body: None,
            patient_id: None,
        }
    }

    fn fresh() -> AlertStore {
        AlertStore::open(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn retrieval_orders_by_priority_then_recency() {
        let mut store = fresh();
        store.add(draft(AlertKind::Informative, AlertPriority::Low, "low"));
        store.add(draft(AlertKind::Critical, AlertPriority::Urgent, "urgent-old"));
        store.add(draft(AlertKind::Medication, AlertPriority::High, "high"));
        store.add(draft(AlertKind::Critical, AlertPriority::Urgent, "urgent-new"));

        let titles: Vec<String> = store.all().iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, vec!["urgent-new", "urgent-old", "high", "low"]);
    }

    #[test]
    fn new_alerts_start_active() {
        let mut store = fresh();
        let id = store.add(draft(AlertKind::Important, AlertPriority::Medium, "a"));
        let alert = store.all().into_iter().find(|a| a.id == id).unwrap();
        assert_eq!(alert.status, AlertStatus::Active);
    }

    #[test]
    fn resolve_and_archive_transition_status() {
        let mut store = fresh();
        let id = store.add(draft(AlertKind::Medication, AlertPriority::High, "dose"));

        assert!(store.resolve(id));
        assert!(store.active().is_empty());
        assert!(!store.resolve(id), "same-status transition is a no-op");

        assert!(store.archive(id));
        let alert = store.all().into_iter().find(|a| a.id == id).unwrap();
        assert_eq!(alert.status, AlertStatus::Archived);
    }

    #[test]
    fn transition_of_unknown_id_is_noop() {
        let mut store = fresh();
        assert!(!store.resolve(Uuid::new_v4()));
        assert!(!store.archive(Uuid::new_v4()));
    }

    #[test]
    fn active_excludes_resolved_and_archived() {
        let mut store = fresh();
        let keep = store.add(draft(AlertKind::Critical, AlertPriority::Urgent, "keep"));
        let gone = store.add(draft(AlertKind::Informative, AlertPriority::Low, "gone"));
        store.resolve(gone);

        let active = store.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keep);
    }

    #[test]
    fn alerts_survive_reopen() {
        let durable = Arc::new(MemoryStore::new());
        let id;
        {
            let mut store = AlertStore::open(durable.clone());
            id = store.add(draft(AlertKind::Critical, AlertPriority::Urgent, "kept"));
            store.resolve(id);
        }

        let store = AlertStore::open(durable);
        let alert = store.all().into_iter().find(|a| a.id == id).unwrap();
        assert_eq!(alert.status, AlertStatus::Resolved);
    }

    #[test]
    fn corrupt_slot_rehydrates_empty() {
        let durable = Arc::new(MemoryStore::new());
        durable.set(config::ALERTS_SLOT, "[{broken").unwrap();
        let store = AlertStore::open(durable);
        assert!(store.all().is_empty());
    }
}
