//! Fire-and-forget advisory channel to whatever shell embeds the core.
//!
//! The core never depends on a return value: degraded reads and guard
//! denials are announced here and rendering is someone else's concern.

/// Advisory severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

pub trait Presenter: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Presenter that forwards advisories to the tracing pipeline.
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(advisory = message),
            Severity::Warning => tracing::warn!(advisory = message),
            Severity::Error => tracing::error!(advisory = message),
        }
    }
}

/// Presenter that drops every advisory.
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn notify(&self, _message: &str, _severity: Severity) {}
}
