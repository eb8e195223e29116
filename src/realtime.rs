//! Realtime merge buffer: integrates pushed insert/update events into a
//! cached collection.
//!
//! Lifecycle: one subscription per entity class per consumer, attached only
//! while the ladder is in live mode and a principal exists, and torn down
//! synchronously the instant either condition becomes false. After
//! `detach` returns, no event reaches the collection.
//!
//! Merge rules:
//! - Insert: prepend, unless a row with the same identity already exists
//!   (an optimistic local insert plus its echo must not double-enter).
//! - Update: replace the matching row in place without moving it; an
//!   absent identity is a no-op, never a crash.
//! - No delete event exists; drift from deletions is only repaired by the
//!   next full resolution cycle. Events lost across a transport gap are
//!   not backfilled here.
//!
//! Merges apply only to live-provenance collections: a live write is never
//! applied against demo or fallback data.

use std::sync::Arc;

use crate::models::enums::{DataMode, Provenance};
use crate::models::{Principal, Record};
use crate::remote::{PushEvent, RemoteDataService, Subscription};
use crate::resolver::SharedCollection;

/// An attached realtime subscription feeding one shared collection.
pub struct LiveFeed<T: Record> {
    collection: SharedCollection<T>,
    subscription: Option<Subscription>,
}

impl<T: Record> LiveFeed<T> {
    /// Attach a subscription for `T`'s entity class, if the preconditions
    /// hold: live mode and a non-temporary principal. Returns `None`
    /// otherwise.
    pub fn attach(
        mode: DataMode,
        principal: Option<&Principal>,
        remote: &Arc<dyn RemoteDataService>,
        collection: SharedCollection<T>,
    ) -> Option<Self> {
        if mode != DataMode::Live || !principal.map_or(false, |p| !p.is_temporary()) {
            return None;
        }

        let sink_collection = Arc::clone(&collection);
        let subscription = remote.subscribe(
            T::KIND,
            Box::new(move |event| merge_event::<T>(&sink_collection, event)),
        );
        tracing::debug!(kind = T::KIND.as_str(), "Realtime feed attached");

        Some(Self {
            collection,
            subscription: Some(subscription),
        })
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn collection(&self) -> &SharedCollection<T> {
        &self.collection
    }

    /// Tear down the subscription synchronously. Safe to call twice.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!(kind = T::KIND.as_str(), "Realtime feed detached");
        }
    }

    /// Detach if the live preconditions no longer hold (mode switch or
    /// sign-out).
    pub fn reconcile(&mut self, mode: DataMode, principal: Option<&Principal>) {
        let valid = mode == DataMode::Live && principal.map_or(false, |p| !p.is_temporary());
        if !valid {
            self.detach();
        }
    }
}

impl<T: Record> Drop for LiveFeed<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Apply one pushed event to a shared collection.
fn merge_event<T: Record>(collection: &SharedCollection<T>, event: PushEvent) {
    let mut guard = match collection.write() {
        Ok(guard) => guard,
        Err(_) => {
            tracing::warn!(kind = T::KIND.as_str(), "Collection lock poisoned; event dropped");
            return;
        }
    };

    if guard.provenance() != Provenance::Live {
        // Mutations are routed through the tier that produced the read.
        tracing::warn!(
            kind = T::KIND.as_str(),
            provenance = guard.provenance().as_str(),
            "Dropping live event for non-live collection"
        );
        return;
    }

    match event {
        PushEvent::Insert(row) => match serde_json::from_value::<T>(row) {
            Ok(record) => {
                if guard.contains_ident(record.ident()) {
                    tracing::debug!(
                        kind = T::KIND.as_str(),
                        ident = record.ident(),
                        "Duplicate insert event ignored"
                    );
                } else {
                    guard.prepend(record);
                }
            }
            Err(e) => tracing::warn!(kind = T::KIND.as_str(), "Malformed insert event: {e}"),
        },
        PushEvent::Update(row) => match serde_json::from_value::<T>(row) {
            Ok(record) => {
                let ident = record.ident().to_string();
                if !guard.replace_in_place(record) {
                    tracing::debug!(
                        kind = T::KIND.as_str(),
                        ident = ident.as_str(),
                        "Update event for absent row ignored"
                    );
                }
            }
            Err(e) => tracing::warn!(kind = T::KIND.as_str(), "Malformed update event: {e}"),
        },
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
