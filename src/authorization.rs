//! Role- and patient-scoped access control.
//!
//! Two pure checks plus the route-guard state machine:
//! 1. Role check — rank comparison under the fixed order
//!    admin(4) > clinician(3) > nurse(2) > family(1); a set requirement
//!    passes if any element passes (logical OR).
//! 2. Patient scope — admin/clinician/nurse see every patient; a family
//!    principal sees only the patient it is bound to.
//!
//! The guard evaluates session → role → scope in that fixed order, so a
//! denial always reports the earliest failing reason.

use std::sync::Arc;

use crate::models::enums::Role;
use crate::models::Principal;
use crate::presenter::{Presenter, Severity};

// ═══════════════════════════════════════════════════════════
// Pure checks
// ═══════════════════════════════════════════════════════════

/// Fixed role rank table.
pub fn rank(role: Role) -> u8 {
    match role {
        Role::Admin => 4,
        Role::Clinician => 3,
        Role::Nurse => 2,
        Role::Family => 1,
    }
}

/// True iff `actual` ranks at or above `required`.
pub fn has_permission(actual: Role, required: Role) -> bool {
    rank(actual) >= rank(required)
}

/// OR over a set of required roles. Empty set never passes.
pub fn has_any_permission(actual: Role, required: &[Role]) -> bool {
    required.iter().any(|&r| has_permission(actual, r))
}

/// True iff the principal's role may see the target patient. The principal
/// id is part of the check's identity for audit purposes; the decision
/// itself depends on role and binding only.
pub fn can_access_patient(
    role: Role,
    _principal_id: &str,
    target_patient_id: &str,
    bound_patient_id: Option<&str>,
) -> bool {
    match role {
        Role::Admin | Role::Clinician | Role::Nurse => true,
        Role::Family => bound_patient_id == Some(target_patient_id),
    }
}

// ═══════════════════════════════════════════════════════════
// Route guard state machine
// ═══════════════════════════════════════════════════════════

/// What the guard knows about the session at evaluation time.
#[derive(Debug, Clone, Copy)]
pub enum SessionSnapshot<'a> {
    /// Session status not yet resolved.
    Unknown,
    /// Resolved: nobody is signed in.
    Absent,
    /// Resolved: this principal is signed in.
    Present(&'a Principal),
}

/// Why a route was denied. Ordered: session before role before scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    SessionAbsent,
    RoleInsufficient,
    PatientScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unresolved,
    Checking,
    Denied(DenialReason),
    Granted,
}

/// Redirect enqueued on denial. The navigation sink belongs to the
/// embedding shell; the guard only queues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: &'static str,
}

/// What a route demands: any of these roles, optionally scoped to one
/// patient. An empty role set means any authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub roles: Vec<Role>,
    pub patient_scope: Option<String>,
}

impl RouteRequirement {
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    pub fn role(role: Role) -> Self {
        Self {
            roles: vec![role],
            patient_scope: None,
        }
    }

    pub fn scoped(role: Role, patient_id: impl Into<String>) -> Self {
        Self {
            roles: vec![role],
            patient_scope: Some(patient_id.into()),
        }
    }
}

/// Route-guard state machine.
///
/// `evaluate` is synchronous and runs before any protected child mounts.
/// Transitions:
/// - `Unresolved/any → Checking` while the session status is unknown;
/// - `Checking → Granted` iff a principal is present, the role check holds,
///   and (no patient scope required or the scope check holds);
/// - `Checking → Denied(reason)` with a single enqueued redirect and one
///   presenter advisory, reasons evaluated session → role → scope;
/// - changing the requirement or the target restarts from Checking.
///
/// No state is sticky beyond its triggering inputs.
pub struct RouteGuard {
    requirement: RouteRequirement,
    state: GuardState,
    pending_redirect: Option<Redirect>,
    presenter: Arc<dyn Presenter>,
}

impl RouteGuard {
    pub fn new(requirement: RouteRequirement, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            requirement,
            state: GuardState::Unresolved,
            pending_redirect: None,
            presenter,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Replace the requirement and restart evaluation.
    pub fn set_requirement(&mut self, requirement: RouteRequirement) {
        self.requirement = requirement;
        self.state = GuardState::Checking;
    }

    /// Re-target the patient scope and restart evaluation.
    pub fn set_patient_scope(&mut self, patient_id: Option<String>) {
        self.requirement.patient_scope = patient_id;
        self.state = GuardState::Checking;
    }

    /// Pop the enqueued redirect, if any.
    pub fn take_redirect(&mut self) -> Option<Redirect> {
        self.pending_redirect.take()
    }

    /// Run the checks against the current session snapshot.
    pub fn evaluate(&mut self, session: SessionSnapshot<'_>) -> GuardState {
        let next = match session {
            SessionSnapshot::Unknown => GuardState::Checking,
            SessionSnapshot::Absent => GuardState::Denied(DenialReason::SessionAbsent),
            SessionSnapshot::Present(principal) => self.check_principal(principal),
        };

        if let GuardState::Denied(reason) = next {
            // Entering Denied from any other state queues one redirect;
            // re-evaluating an unchanged denial does not.
            if self.state != next {
                self.deny(reason);
            }
        }
        self.state = next;
        self.state
    }

    fn check_principal(&self, principal: &Principal) -> GuardState {
        let role_ok = self.requirement.roles.is_empty()
            || has_any_permission(principal.role(), &self.requirement.roles);
        if !role_ok {
            return GuardState::Denied(DenialReason::RoleInsufficient);
        }

        if let Some(target) = &self.requirement.patient_scope {
            let scope_ok = can_access_patient(
                principal.role(),
                principal.id(),
                target,
                principal.bound_patient_id(),
            );
            if !scope_ok {
                return GuardState::Denied(DenialReason::PatientScope);
            }
        }

        GuardState::Granted
    }

    fn deny(&mut self, reason: DenialReason) {
        let (to, advisory) = match reason {
            DenialReason::SessionAbsent => ("/login", "Sign in to continue."),
            DenialReason::RoleInsufficient => {
                ("/", "You do not have permission to view this page.")
            }
            DenialReason::PatientScope => ("/", "You can only view your own patient's records."),
        };
        tracing::debug!(?reason, "Route denied");
        self.presenter.notify(advisory, Severity::Warning);
        self.pending_redirect = Some(Redirect { to });
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
