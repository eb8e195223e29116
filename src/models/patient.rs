use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::EntityKind;
use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub ward: Option<String>,
    pub admitted_at: Option<NaiveDate>,
}

impl Record for Patient {
    const KIND: EntityKind = EntityKind::Patients;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(rows: &mut [Self]) {
        // Name ascending, id as a stable tie-break.
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }
}

/// Append-only clinical history entry, keyed by patient id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub patient_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub notes: Option<String>,
    pub author_id: Option<String>,
}

impl Record for HistoryEntry {
    const KIND: EntityKind = EntityKind::HistoryEntries;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(rows: &mut [Self]) {
        // Date descending, newest first.
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

impl Record for EmergencyContact {
    const KIND: EntityKind = EntityKind::EmergencyContacts;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(_rows: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub patient_id: String,
    pub amount_cents: i64,
    pub description: String,
    pub date: NaiveDate,
}

impl Record for Payment {
    const KIND: EntityKind = EntityKind::Payments;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(_rows: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requisition {
    pub id: String,
    pub patient_id: String,
    pub item: String,
    pub quantity: u32,
    pub requested_by: Option<String>,
    pub requested_at: NaiveDateTime,
}

impl Record for Requisition {
    const KIND: EntityKind = EntityKind::Requisitions;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(_rows: &mut [Self]) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseNote {
    pub id: String,
    pub patient_id: String,
    pub note: String,
    pub author_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Record for NurseNote {
    const KIND: EntityKind = EntityKind::NurseNotes;

    fn ident(&self) -> &str {
        &self.id
    }

    fn sort_rows(_rows: &mut [Self]) {}
}
