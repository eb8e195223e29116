use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AlertKind, AlertPriority, AlertStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub status: AlertStatus,
    pub title: String,
    pub body: Option<String>,
    pub patient_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for raising a new alert. Id, status and timestamp are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertDraft {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub title: String,
    pub body: Option<String>,
    pub patient_id: Option<String>,
}
