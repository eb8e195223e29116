//! Principal lifecycle over the remote authentication contract.
//!
//! A principal is created at sign-in and fully torn down at sign-out.
//! Authentication errors propagate to the caller (the caller redirects);
//! this is the one place transport failures are not absorbed into fallback
//! data, since there is no degraded rendition of "signed in".

use std::sync::Arc;

use thiserror::Error;

use crate::authorization::SessionSnapshot;
use crate::models::Principal;
use crate::remote::{ProfilePatch, RemoteDataService, ServiceError};

/// Session status as the route guard consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unknown,
    Absent,
    Present,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("authentication transport failure: {0}")]
    Transport(String),
    #[error("no active session")]
    NoSession,
}

impl From<ServiceError> for SessionError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Auth(reason) => SessionError::Auth(reason),
            ServiceError::Transport(reason) => SessionError::Transport(reason),
        }
    }
}

pub struct SessionManager {
    remote: Arc<dyn RemoteDataService>,
    status: SessionStatus,
    session_id: Option<String>,
    principal: Option<Principal>,
}

impl SessionManager {
    pub fn new(remote: Arc<dyn RemoteDataService>) -> Self {
        Self {
            remote,
            status: SessionStatus::Unknown,
            session_id: None,
            principal: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Session state as the route guard consumes it.
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        match (self.status, &self.principal) {
            (SessionStatus::Present, Some(principal)) => SessionSnapshot::Present(principal),
            (SessionStatus::Unknown, _) => SessionSnapshot::Unknown,
            _ => SessionSnapshot::Absent,
        }
    }

    /// Exchange credentials for a principal. On failure the session
    /// resolves to absent and the error propagates.
    pub async fn sign_in(
        &mut self,
        identity: &str,
        secret: &str,
    ) -> Result<&Principal, SessionError> {
        let outcome = self.remote.authenticate(identity, secret).await;
        match outcome {
            Ok(session) => {
                let profile = session.profile;
                let principal = Principal::with_bound(
                    profile.principal_id,
                    profile.role,
                    profile.bound_patient_id,
                );
                tracing::info!(
                    principal_id = principal.id(),
                    role = principal.role().as_str(),
                    "Signed in"
                );
                self.session_id = Some(session.session_id);
                self.status = SessionStatus::Present;
                Ok(self.principal.insert(principal))
            }
            Err(e) => {
                self.session_id = None;
                self.principal = None;
                self.status = SessionStatus::Absent;
                tracing::warn!("Sign-in failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Tear down the principal. Consumers drop their live feeds and cached
    /// collections in response to the status change.
    pub fn sign_out(&mut self) {
        if let Some(principal) = &self.principal {
            tracing::info!(principal_id = principal.id(), "Signed out");
        }
        self.principal = None;
        self.session_id = None;
        self.status = SessionStatus::Absent;
    }

    /// Patch the signed-in principal's remote profile.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<(), SessionError> {
        let session_id = self.session_id.as_ref().ok_or(SessionError::NoSession)?;
        self.remote
            .update_profile(session_id, patch)
            .await
            .map_err(SessionError::from)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::{GuardState, RouteGuard, RouteRequirement};
    use crate::models::enums::{EntityKind, Role};
    use crate::models::EntityQuery;
    use crate::presenter::NullPresenter;
    use crate::remote::{AuthSession, EventSink, RemoteProfile, RowOrder, Subscription};
    use async_trait::async_trait;
    use serde_json::Value;

    struct FakeAuthRemote {
        outcome: Result<(), ServiceError>,
    }

    impl FakeAuthRemote {
        fn accepting() -> Self {
            Self { outcome: Ok(()) }
        }

        fn rejecting() -> Self {
            Self {
                outcome: Err(ServiceError::Auth("bad credentials".into())),
            }
        }
    }

    #[async_trait]
    impl RemoteDataService for FakeAuthRemote {
        async fn request(
            &self,
            _entity: EntityKind,
            _query: &EntityQuery,
            _order: &[RowOrder],
        ) -> Result<Vec<Value>, ServiceError> {
            Ok(Vec::new())
        }

        fn subscribe(&self, _entity: EntityKind, _sink: EventSink) -> Subscription {
            Subscription::new(|| {})
        }

        async fn authenticate(
            &self,
            identity: &str,
            _secret: &str,
        ) -> Result<AuthSession, ServiceError> {
            match &self.outcome {
                Ok(()) => Ok(AuthSession {
                    session_id: "sess-1".into(),
                    profile: RemoteProfile {
                        principal_id: identity.to_string(),
                        display_name: "Fam Ily".into(),
                        role: Role::Family,
                        bound_patient_id: Some("pac-001".into()),
                    },
                }),
                Err(ServiceError::Auth(reason)) => Err(ServiceError::Auth(reason.clone())),
                Err(ServiceError::Transport(reason)) => {
                    Err(ServiceError::Transport(reason.clone()))
                }
            }
        }

        async fn update_profile(
            &self,
            _session_id: &str,
            _patch: &ProfilePatch,
        ) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn sign_in_creates_bound_principal() {
        let mut session = SessionManager::new(Arc::new(FakeAuthRemote::accepting()));
        assert_eq!(session.status(), SessionStatus::Unknown);

        let principal = session.sign_in("fam-01", "secret").await.unwrap();
        assert_eq!(principal.role(), Role::Family);
        assert_eq!(principal.bound_patient_id(), Some("pac-001"));
        assert_eq!(session.status(), SessionStatus::Present);
    }

    #[tokio::test]
    async fn rejected_credentials_propagate_and_resolve_absent() {
        let mut session = SessionManager::new(Arc::new(FakeAuthRemote::rejecting()));

        let err = session.sign_in("fam-01", "wrong").await.unwrap_err();
        assert!(matches!(err, SessionError::Auth(_)));
        assert_eq!(session.status(), SessionStatus::Absent);
        assert!(session.principal().is_none());
    }

    #[tokio::test]
    async fn sign_out_tears_down_principal() {
        let mut session = SessionManager::new(Arc::new(FakeAuthRemote::accepting()));
        session.sign_in("fam-01", "secret").await.unwrap();

        session.sign_out();
        assert_eq!(session.status(), SessionStatus::Absent);
        assert!(session.principal().is_none());
        assert!(matches!(
            session.update_profile(&ProfilePatch::default()).await,
            Err(SessionError::NoSession)
        ));
    }

    #[tokio::test]
    async fn snapshot_feeds_route_guard_through_lifecycle() {
        let mut session = SessionManager::new(Arc::new(FakeAuthRemote::accepting()));
        let mut guard = RouteGuard::new(
            RouteRequirement::any_authenticated(),
            Arc::new(NullPresenter),
        );

        assert_eq!(guard.evaluate(session.snapshot()), GuardState::Checking);

        session.sign_in("fam-01", "secret").await.unwrap();
        assert_eq!(guard.evaluate(session.snapshot()), GuardState::Granted);

        session.sign_out();
        assert!(matches!(
            guard.evaluate(session.snapshot()),
            GuardState::Denied(_)
        ));
    }

    #[tokio::test]
    async fn update_profile_requires_session() {
        let session = SessionManager::new(Arc::new(FakeAuthRemote::accepting()));
        assert!(matches!(
            session.update_profile(&ProfilePatch::default()).await,
            Err(SessionError::NoSession)
        ));
    }
}
