use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::enums::Role;

/// Errors from principal mutation.
#[derive(Debug, Error)]
pub enum PrincipalError {
    #[error("principal {principal_id} is already bound to patient {bound}")]
    AlreadyBound { principal_id: String, bound: String },
}

/// The authenticated entity issuing requests: a role plus, for family
/// principals, the single patient they are bound to.
///
/// `bound_patient_id` is write-once for a family principal. Temporary
/// principals are guest sessions the resolution ladder never sends to the
/// remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: String,
    role: Role,
    bound_patient_id: Option<String>,
    temporary: bool,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            bound_patient_id: None,
            temporary: false,
        }
    }

    /// Principal restored from a remote profile, binding included.
    pub fn with_bound(
        id: impl Into<String>,
        role: Role,
        bound_patient_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            bound_patient_id,
            temporary: false,
        }
    }

    /// Guest principal: no remote identity, served from fallback data only.
    pub fn temporary(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            bound_patient_id: None,
            temporary: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    pub fn bound_patient_id(&self) -> Option<&str> {
        self.bound_patient_id.as_deref()
    }

    /// Bind this principal to a patient. A family principal can be bound
    /// exactly once; rebinding is rejected.
    pub fn bind_patient(&mut self, patient_id: impl Into<String>) -> Result<(), PrincipalError> {
        if self.role == Role::Family {
            if let Some(bound) = &self.bound_patient_id {
                return Err(PrincipalError::AlreadyBound {
                    principal_id: self.id.clone(),
                    bound: bound.clone(),
                });
            }
        }
        self.bound_patient_id = Some(patient_id.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_bound_patient_is_write_once() {
        let mut principal = Principal::new("u1", Role::Family);
        principal.bind_patient("pac-001").unwrap();
        assert_eq!(principal.bound_patient_id(), Some("pac-001"));

        let err = principal.bind_patient("pac-002").unwrap_err();
        match err {
            PrincipalError::AlreadyBound { bound, .. } => assert_eq!(bound, "pac-001"),
        }
        assert_eq!(principal.bound_patient_id(), Some("pac-001"));
    }

    #[test]
    fn staff_binding_can_change() {
        let mut principal = Principal::new("u2", Role::Nurse);
        principal.bind_patient("pac-001").unwrap();
        principal.bind_patient("pac-002").unwrap();
        assert_eq!(principal.bound_patient_id(), Some("pac-002"));
    }

    #[test]
    fn temporary_principal_is_flagged() {
        let guest = Principal::temporary("guest", Role::Family);
        assert!(guest.is_temporary());
        assert!(!Principal::new("u1", Role::Admin).is_temporary());
    }
}
