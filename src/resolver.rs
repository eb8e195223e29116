//! Tiered resolution of entity reads.
//!
//! Every read walks the same ladder:
//! 1. Demo mode active → serve from the demo store; the remote service is
//!    never contacted.
//! 2. Otherwise attempt the remote fetch.
//! 3. On transport failure, on an absent/temporary principal, or on an
//!    empty live result → substitute the static fallback dataset. The read
//!    still succeeds, tagged `Provenance::Fallback`, with a soft advisory
//!    through the presenter. Transport failures never surface as errors.
//!
//! Hard errors exist only for structurally invalid queries
//! (`ResolveError::Validation`), rejected before any tier is consulted.
//!
//! `resolve_into` adds the monotonic sequence guard: a result is applied to
//! its shared slot only if no later-dispatched resolution for the same
//! query key has completed first, so a slow early fetch can never overwrite
//! fresher data.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;
use thiserror::Error;

use crate::demo::{DemoDataStore, DemoStoreError};
use crate::fallback;
use crate::models::enums::{DataMode, EntityKind, Provenance};
use crate::models::{EntityQuery, Principal, Record};
use crate::presenter::{Presenter, Severity};
use crate::remote::{RemoteDataService, RowOrder, ServiceError};

// ═══════════════════════════════════════════════════════════
// AppContext — explicit, test-isolatable application context
// ═══════════════════════════════════════════════════════════

/// The context a resolution runs in: the data mode plus the three
/// collaborators every tier needs. Two contexts never share mode state.
pub struct AppContext {
    mode: RwLock<DataMode>,
    pub demo: Arc<DemoDataStore>,
    pub remote: Arc<dyn RemoteDataService>,
    pub presenter: Arc<dyn Presenter>,
}

impl AppContext {
    pub fn new(
        mode: DataMode,
        demo: Arc<DemoDataStore>,
        remote: Arc<dyn RemoteDataService>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            mode: RwLock::new(mode),
            demo,
            remote,
            presenter,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode.read().map(|m| *m).unwrap_or(DataMode::Demo)
    }

    /// Toggle the data mode. Does not clear any collection state; only
    /// subsequent reads are redirected.
    pub fn set_mode(&self, mode: DataMode) {
        if let Ok(mut guard) = self.mode.write() {
            *guard = mode;
        }
    }
}

// ═══════════════════════════════════════════════════════════
// CachedCollection
// ═══════════════════════════════════════════════════════════

/// An ordered, identity-deduplicated set of rows plus the provenance of the
/// tier that produced it. Pushed-event merges apply only to live-provenance
/// collections; the tier that produced a read owns its mutations.
#[derive(Debug, Clone)]
pub struct CachedCollection<T: Record> {
    rows: Vec<T>,
    provenance: Provenance,
}

impl<T: Record> CachedCollection<T> {
    pub(crate) fn new(rows: Vec<T>, provenance: Provenance) -> Self {
        let mut seen = HashSet::new();
        let mut deduped = Vec::with_capacity(rows.len());
        for row in rows {
            if seen.insert(row.ident().to_string()) {
                deduped.push(row);
            }
        }
        Self {
            rows: deduped,
            provenance,
        }
    }

    /// Placeholder for a slot that has not completed its first fetch.
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            provenance: Provenance::Fallback,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_shared(self) -> SharedCollection<T> {
        Arc::new(RwLock::new(self))
    }

    pub(crate) fn contains_ident(&self, ident: &str) -> bool {
        self.rows.iter().any(|r| r.ident() == ident)
    }

    pub(crate) fn prepend(&mut self, row: T) {
        self.rows.insert(0, row);
    }

    /// Replace the row with matching identity in place, keeping its
    /// position. Returns false if no row matches.
    pub(crate) fn replace_in_place(&mut self, row: T) -> bool {
        match self.rows.iter_mut().find(|r| r.ident() == row.ident()) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }
}

/// A collection slot shared between the ladder (wholesale replacement) and
/// the realtime merge buffer (element-wise patches).
pub type SharedCollection<T> = Arc<RwLock<CachedCollection<T>>>;

/// Outcome of a single-entity lookup. `NotFound` is a normal outcome,
/// distinct from loading and from error.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The request itself is structurally invalid. The only hard error a
    /// caller sees; transport failures are absorbed into fallback.
    #[error("invalid query: {0}")]
    Validation(String),
    #[error("Demo store error: {0}")]
    Demo(#[from] DemoStoreError),
    #[error("Resolution state lock poisoned")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// ResolutionLadder
// ═══════════════════════════════════════════════════════════

type QueryKey = (EntityKind, Option<String>, Option<String>);

pub struct ResolutionLadder {
    ctx: Arc<AppContext>,
    /// Monotonic dispatch counter shared by all query keys.
    issued: AtomicU64,
    /// Highest token applied per query key.
    applied: Mutex<HashMap<QueryKey, u64>>,
}

impl ResolutionLadder {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            issued: AtomicU64::new(0),
            applied: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Resolve a collection read through the ladder.
    pub async fn resolve<T: Record>(
        &self,
        query: &EntityQuery,
        principal: Option<&Principal>,
    ) -> Result<CachedCollection<T>, ResolveError> {
        validate(query)?;

        if self.ctx.mode() == DataMode::Demo {
            let rows = self.ctx.demo.fetch_rows(T::KIND, query)?;
            return Ok(collection_from(rows, Provenance::Demo));
        }

        let authenticated = principal.map_or(false, |p| !p.is_temporary());
        if !authenticated {
            return Ok(self.fallback_collection::<T>(
                "Showing sample records. Sign in to see live data.",
                Severity::Info,
            ));
        }

        match self
            .ctx
            .remote
            .request(T::KIND, query, order_for(T::KIND))
            .await
        {
            Ok(rows) => {
                let collection = collection_from::<T>(rows, Provenance::Live);
                if collection.is_empty() {
                    return Ok(self.fallback_collection::<T>(
                        "No live records yet. Showing sample data.",
                        Severity::Info,
                    ));
                }
                Ok(collection)
            }
            Err(ServiceError::Transport(reason)) => {
                tracing::warn!(kind = T::KIND.as_str(), %reason, "Live fetch failed");
                Ok(self.fallback_collection::<T>(
                    "Live service unavailable. Showing sample data.",
                    Severity::Warning,
                ))
            }
            Err(ServiceError::Auth(reason)) => {
                // An auth rejection on a read is handled like an
                // unauthenticated principal, not surfaced as an error.
                tracing::warn!(kind = T::KIND.as_str(), %reason, "Live fetch rejected");
                Ok(self.fallback_collection::<T>(
                    "Showing sample records. Sign in to see live data.",
                    Severity::Info,
                ))
            }
        }
    }

    /// Resolve and write the result into a shared slot, guarded by the
    /// monotonic sequence token. Returns `false` when the result was
    /// discarded because a later-dispatched resolution already completed.
    pub async fn resolve_into<T: Record>(
        &self,
        query: &EntityQuery,
        principal: Option<&Principal>,
        slot: &SharedCollection<T>,
    ) -> Result<bool, ResolveError> {
        let key: QueryKey = (T::KIND, query.patient_id.clone(), query.id.clone());
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let collection = self.resolve::<T>(query, principal).await?;

        let mut applied = self.applied.lock().map_err(|_| ResolveError::LockPoisoned)?;
        if applied.get(&key).map_or(false, |&last| last >= token) {
            tracing::debug!(
                kind = T::KIND.as_str(),
                token,
                "Discarding superseded resolution"
            );
            return Ok(false);
        }
        applied.insert(key, token);
        drop(applied);

        let mut guard = slot.write().map_err(|_| ResolveError::LockPoisoned)?;
        *guard = collection;
        Ok(true)
    }

    /// Resolve a single row by identity.
    pub async fn resolve_one<T: Record>(
        &self,
        id: &str,
        principal: Option<&Principal>,
    ) -> Result<Lookup<T>, ResolveError> {
        if id.trim().is_empty() {
            return Err(ResolveError::Validation("id must not be blank".into()));
        }
        let query = EntityQuery::by_id(id);

        if self.ctx.mode() == DataMode::Demo {
            let rows = self.ctx.demo.fetch_rows(T::KIND, &query)?;
            return Ok(first_row(rows));
        }

        let authenticated = principal.map_or(false, |p| !p.is_temporary());
        if !authenticated {
            return Ok(self.fallback_lookup::<T>(id));
        }

        match self
            .ctx
            .remote
            .request(T::KIND, &query, order_for(T::KIND))
            .await
        {
            Ok(rows) => Ok(first_row(rows)),
            Err(e) => {
                tracing::warn!(kind = T::KIND.as_str(), error = %e, "Live lookup failed");
                self.ctx.presenter.notify(
                    "Live service unavailable. Showing sample data.",
                    Severity::Warning,
                );
                Ok(self.fallback_lookup_silent::<T>(id))
            }
        }
    }

    fn fallback_collection<T: Record>(
        &self,
        advisory: &str,
        severity: Severity,
    ) -> CachedCollection<T> {
        self.ctx.presenter.notify(advisory, severity);
        collection_from(fallback::rows(T::KIND), Provenance::Fallback)
    }

    fn fallback_lookup<T: Record>(&self, id: &str) -> Lookup<T> {
        self.ctx.presenter.notify(
            "Showing sample records. Sign in to see live data.",
            Severity::Info,
        );
        self.fallback_lookup_silent(id)
    }

    fn fallback_lookup_silent<T: Record>(&self, id: &str) -> Lookup<T> {
        let collection = collection_from::<T>(fallback::rows(T::KIND), Provenance::Fallback);
        collection
            .rows()
            .iter()
            .find(|r| r.ident() == id)
            .cloned()
            .map_or(Lookup::NotFound, Lookup::Found)
    }
}

fn validate(query: &EntityQuery) -> Result<(), ResolveError> {
    if let Some(pid) = &query.patient_id {
        if pid.trim().is_empty() {
            return Err(ResolveError::Validation(
                "patient filter must not be blank".into(),
            ));
        }
    }
    if let Some(id) = &query.id {
        if id.trim().is_empty() {
            return Err(ResolveError::Validation("id filter must not be blank".into()));
        }
    }
    Ok(())
}

/// Canonical remote ordering per entity class.
fn order_for(kind: EntityKind) -> &'static [RowOrder] {
    match kind {
        EntityKind::Patients => &[RowOrder {
            field: "name",
            descending: false,
        }],
        EntityKind::HistoryEntries => &[RowOrder {
            field: "date",
            descending: true,
        }],
        EntityKind::NurseNotes
        | EntityKind::EmergencyContacts
        | EntityKind::Payments
        | EntityKind::Requisitions => &[],
    }
}

fn collection_from<T: Record>(rows: Vec<Value>, provenance: Provenance) -> CachedCollection<T> {
    let mut typed = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<T>(row) {
            Ok(record) => typed.push(record),
            Err(e) => {
                tracing::warn!(kind = T::KIND.as_str(), "Skipping malformed row: {e}");
            }
        }
    }
    T::sort_rows(&mut typed);
    CachedCollection::new(typed, provenance)
}

fn first_row<T: Record>(rows: Vec<Value>) -> Lookup<T> {
    for row in rows {
        match serde_json::from_value::<T>(row) {
            Ok(record) => return Lookup::Found(record),
            Err(e) => {
                tracing::warn!(kind = T::KIND.as_str(), "Skipping malformed row: {e}");
            }
        }
    }
    Lookup::NotFound
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
