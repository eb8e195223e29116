//! Read/unread notification store.
//!
//! Mutable local collection with a derived unread count. The counter is
//! recomputed by a full scan after every mutation, never nudged in place.
//! Every mutation is written through to a durable slot; the collection is
//! rehydrated once at construction, and a missing or corrupt slot is an
//! empty collection, never a fatal condition.
//!
//! All operations are synchronous and run to completion from the caller's
//! perspective.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config;
use crate::models::enums::NotificationKind;
use crate::models::{Notification, NotificationDraft};
use crate::store::DurableStore;

pub struct NotificationStore {
    entries: Vec<Notification>,
    unread: usize,
    store: Arc<dyn DurableStore>,
}

impl NotificationStore {
    /// Rehydrate from the durable slot.
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        let entries = load_entries(store.as_ref());
        let unread = count_unread(&entries);
        Self {
            entries,
            unread,
            store,
        }
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Add a notification: fresh id, current timestamp, unread, prepended.
    pub fn add(&mut self, draft: NotificationDraft) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind: draft.kind,
            title: draft.title,
            body: draft.body,
            read: false,
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.entries.insert(0, notification);
        self.recount();
        self.persist();
        id
    }

    /// Mark one notification read. Idempotent: an absent id or an
    /// already-read entry is a no-op. Returns whether anything changed.
    pub fn mark_as_read(&mut self, id: Uuid) -> bool {
        let changed = match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.read => {
                entry.read = true;
                true
            }
            _ => false,
        };
        self.recount();
        if changed {
            self.persist();
        }
        changed
    }

    /// Mark all notifications read, optionally only those of one kind.
    pub fn mark_all_as_read(&mut self, filter: Option<NotificationKind>) {
        for entry in &mut self.entries {
            if filter.map_or(true, |kind| entry.kind == kind) {
                entry.read = true;
            }
        }
        self.recount();
        self.persist();
    }

    /// Empty the collection and reset the counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recount();
        self.persist();
    }

    fn recount(&mut self) {
        self.unread = count_unread(&self.entries);
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.entries) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Notification serialization failed: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(config::NOTIFICATIONS_SLOT, &blob) {
            // The in-memory collection stays authoritative for the session.
            tracing::warn!("Notification write-through failed: {e}");
        }
    }
}

fn count_unread(entries: &[Notification]) -> usize {
    entries.iter().filter(|n| !n.read).count()
}

fn load_entries(store: &dyn DurableStore) -> Vec<Notification> {
    let blob = match store.get(config::NOTIFICATIONS_SLOT) {
        Ok(Some(blob)) => blob,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Notification slot unreadable, starting empty: {e}");
            return Vec::new();
        }
    };
    match serde_json::from_str(&blob) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Corrupt notification slot ignored: {e}");
            Vec::new()
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
