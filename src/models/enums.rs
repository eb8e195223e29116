use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Role {
    Admin => "admin",
    Clinician => "clinician",
    Nurse => "nurse",
    Family => "family",
});

str_enum!(EntityKind {
    Patients => "patients",
    HistoryEntries => "history_entries",
    NurseNotes => "nurse_notes",
    EmergencyContacts => "emergency_contacts",
    Payments => "payments",
    Requisitions => "requisitions",
});

str_enum!(AlertKind {
    Critical => "critical",
    Important => "important",
    Informative => "informative",
    Medication => "medication",
});

str_enum!(AlertStatus {
    Active => "active",
    Resolved => "resolved",
    Archived => "archived",
});

str_enum!(NotificationKind {
    Message => "message",
    Calendar => "calendar",
    Announcement => "announcement",
});

str_enum!(DataMode {
    Demo => "demo",
    Live => "live",
});

str_enum!(Provenance {
    Live => "live",
    Demo => "demo",
    Fallback => "fallback",
});

/// Alert priority on the 1–4 scale used across the portal. Ordering follows
/// the numeric scale, so `Urgent > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl AlertPriority {
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    pub fn from_i32(value: i32) -> Result<Self, ModelError> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            4 => Ok(Self::Urgent),
            _ => Err(ModelError::InvalidEnum {
                field: "AlertPriority".into(),
                value: value.to_string(),
            }),
        }
    }
}
