use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Careport";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Durable slot keys. Notification and alert slots are distinct so corrupt
/// data in one never affects the other.
pub const NOTIFICATIONS_SLOT: &str = "careport.notifications.v1";
pub const ALERTS_SLOT: &str = "careport.alerts.v1";
pub const DEMO_SNAPSHOT_SLOT: &str = "careport.demo_snapshot.v1";

/// Get the application data directory
/// ~/Careport/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Careport")
}

/// Default path of the SQLite-backed durable store.
pub fn store_path() -> PathBuf {
    app_data_dir().join("careport.db")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "careport=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Careport"));
    }

    #[test]
    fn store_path_under_app_data() {
        let path = store_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("careport.db"));
    }

    #[test]
    fn slot_keys_are_distinct() {
        assert_ne!(NOTIFICATIONS_SLOT, ALERTS_SLOT);
        assert_ne!(NOTIFICATIONS_SLOT, DEMO_SNAPSHOT_SLOT);
        assert_ne!(ALERTS_SLOT, DEMO_SNAPSHOT_SLOT);
    }

    #[test]
    fn app_name_is_careport() {
        assert_eq!(APP_NAME, "Careport");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
