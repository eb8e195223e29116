use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::NotificationKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for a new notification. Id, read flag and timestamp are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub body: Option<String>,
}
