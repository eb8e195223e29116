//! Fixed demonstration dataset.
//!
//! All data here is hardcoded and fictional. No real patient identifiers
//! are present. The seed is the authoritative baseline `reset_demo_data`
//! restores.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{
    EmergencyContact, HistoryEntry, NurseNote, Patient, Payment, Requisition,
};

use super::DemoCollections;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid seed date")
}

fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid seed timestamp")
}

/// Build the full seed dataset. Every call returns the same data.
pub fn seed_collections() -> DemoCollections {
    DemoCollections {
        patients: vec![
            Patient {
                id: "pac-001".into(),
                name: "Alba Reyes".into(),
                date_of_birth: Some(date("1948-03-21")),
                ward: Some("West 2".into()),
                admitted_at: Some(date("2026-04-02")),
            },
            Patient {
                id: "pac-002".into(),
                name: "Bruno Salas".into(),
                date_of_birth: Some(date("1953-11-07")),
                ward: Some("West 2".into()),
                admitted_at: Some(date("2026-05-18")),
            },
            Patient {
                id: "pac-003".into(),
                name: "Carmen Ortiz".into(),
                date_of_birth: Some(date("1941-06-30")),
                ward: Some("East 1".into()),
                admitted_at: Some(date("2026-01-25")),
            },
        ],
        history_entries: vec![
            HistoryEntry {
                id: "his-001".into(),
                patient_id: "pac-001".into(),
                date: date("2026-04-03"),
                title: "Admission assessment".into(),
                notes: Some("Stable on arrival. Baseline vitals recorded.".into()),
                author_id: Some("clin-01".into()),
            },
            HistoryEntry {
                id: "his-002".into(),
                patient_id: "pac-001".into(),
                date: date("2026-05-10"),
                title: "Medication review".into(),
                notes: Some("Adjusted evening dose after dizziness report.".into()),
                author_id: Some("clin-01".into()),
            },
            HistoryEntry {
                id: "his-003".into(),
                patient_id: "pac-002".into(),
                date: date("2026-05-19"),
                title: "Admission assessment".into(),
                notes: None,
                author_id: Some("clin-02".into()),
            },
            HistoryEntry {
                id: "his-004".into(),
                patient_id: "pac-003".into(),
                date: date("2026-02-11"),
                title: "Physiotherapy follow-up".into(),
                notes: Some("Mobility improving with daily sessions.".into()),
                author_id: None,
            },
        ],
        nurse_notes: vec![
            NurseNote {
                id: "nn-001".into(),
                patient_id: "pac-001".into(),
                note: "Slept well. Ate full breakfast.".into(),
                author_id: Some("nur-07".into()),
                created_at: datetime("2026-05-11 07:45:00"),
            },
            NurseNote {
                id: "nn-002".into(),
                patient_id: "pac-003".into(),
                note: "Requested extra blanket. No pain reported.".into(),
                author_id: Some("nur-03".into()),
                created_at: datetime("2026-05-11 21:10:00"),
            },
        ],
        emergency_contacts: vec![
            EmergencyContact {
                id: "ec-001".into(),
                patient_id: "pac-001".into(),
                name: "Marta Reyes".into(),
                relationship: "daughter".into(),
                phone: "+34 600 111 222".into(),
            },
            EmergencyContact {
                id: "ec-002".into(),
                patient_id: "pac-002".into(),
                name: "Lucía Salas".into(),
                relationship: "spouse".into(),
                phone: "+34 600 333 444".into(),
            },
        ],
        payments: vec![
            Payment {
                id: "pay-001".into(),
                patient_id: "pac-001".into(),
                amount_cents: 125_000,
                description: "Monthly care fee — April".into(),
                date: date("2026-04-30"),
            },
            Payment {
                id: "pay-002".into(),
                patient_id: "pac-001".into(),
                amount_cents: 125_000,
                description: "Monthly care fee — May".into(),
                date: date("2026-05-31"),
            },
            Payment {
                id: "pay-003".into(),
                patient_id: "pac-003".into(),
                amount_cents: 89_000,
                description: "Physiotherapy block".into(),
                date: date("2026-02-28"),
            },
        ],
        requisitions: vec![
            Requisition {
                id: "req-001".into(),
                patient_id: "pac-001".into(),
                item: "Compression stockings".into(),
                quantity: 2,
                requested_by: Some("nur-07".into()),
                requested_at: datetime("2026-05-02 10:15:00"),
            },
            Requisition {
                id: "req-002".into(),
                patient_id: "pac-002".into(),
                item: "Walking frame".into(),
                quantity: 1,
                requested_by: Some("clin-02".into()),
                requested_at: datetime("2026-05-20 16:40:00"),
            },
        ],
    }
}
