//! Remote data service contract.
//!
//! The live tier of the resolution ladder and the session manager speak to
//! the backing store through this trait. Rows cross the boundary as JSON
//! values (the wire shape); typed deserialization happens on the consumer
//! side. Entity shapes are internal contracts, not a published API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::enums::{EntityKind, Role};
use crate::models::EntityQuery;

/// Errors from remote service calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The call never completed. Absorbed by the resolution ladder; callers
    /// of `authenticate` see it.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Credentials or session rejected. Always propagated.
    #[error("authentication rejected: {0}")]
    Auth(String),
}

/// Established session returned by `authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub session_id: String,
    pub profile: RemoteProfile,
}

/// Profile shape the remote service holds for a principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub principal_id: String,
    pub display_name: String,
    pub role: Role,
    pub bound_patient_id: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
}

/// A pushed change notification for one row of an entity class.
#[derive(Debug, Clone)]
pub enum PushEvent {
    Insert(Value),
    Update(Value),
    // No delete event exists on the wire; drift from deletions is repaired
    // by the next full resolution cycle.
}

/// Callback receiving pushed events for one subscription.
pub type EventSink = Box<dyn Fn(PushEvent) + Send + Sync>;

/// Handle for an active subscription. Unsubscribing is synchronous: after
/// `unsubscribe` (or drop) returns, no further event reaches the sink.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Requested ordering for a remote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOrder {
    pub field: &'static str,
    pub descending: bool,
}

/// Contract the live backing store must satisfy.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    /// Fetch rows of one entity class.
    async fn request(
        &self,
        entity: EntityKind,
        query: &EntityQuery,
        order: &[RowOrder],
    ) -> Result<Vec<Value>, ServiceError>;

    /// Open a realtime subscription for one entity class. Events are
    /// delivered synchronously to the sink until the handle is dropped.
    fn subscribe(&self, entity: EntityKind, sink: EventSink) -> Subscription;

    /// Exchange credentials for a session.
    async fn authenticate(&self, identity: &str, secret: &str)
        -> Result<AuthSession, ServiceError>;

    /// Patch the authenticated principal's profile.
    async fn update_profile(
        &self,
        session_id: &str,
        patch: &ProfilePatch,
    ) -> Result<(), ServiceError>;
}
