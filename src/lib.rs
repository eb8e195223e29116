pub mod config;
pub mod models;
pub mod store;
pub mod demo; // In-memory demonstration dataset
pub mod remote; // Remote data service contract
pub mod presenter;
pub mod fallback;
pub mod resolver; // Tiered demo/live/fallback resolution
pub mod authorization; // Role + patient-scope gate, route guard
pub mod realtime; // Pushed-event merge buffer
pub mod notifications;
pub mod alerts;
pub mod session; // Principal lifecycle

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding shell that has no subscriber of its
/// own. Honors RUST_LOG, falling back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}
