use serde::{Deserialize, Serialize};

/// Filter for a collection or single-row resolution. An empty query selects
/// the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityQuery {
    /// Restrict rows to one patient's records.
    pub patient_id: Option<String>,
    /// Select a single row by identity (single-entity lookups).
    pub id: Option<String>,
}

impl EntityQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            id: None,
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            patient_id: None,
            id: Some(id.into()),
        }
    }
}
