pub mod enums;
pub mod patient;
pub mod alert;
pub mod notification;
pub mod principal;
pub mod filters;

pub use alert::*;
pub use filters::*;
pub use notification::*;
pub use patient::*;
pub use principal::*;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use enums::EntityKind;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// A row type that participates in tiered resolution: it names the remote
/// entity class it belongs to, exposes a stable identity for dedup/merge,
/// and owns its retrieval order.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Stable identity used for dedup and in-place update.
    fn ident(&self) -> &str;

    /// Canonical retrieval order for this entity class. Kinds without a
    /// specified order keep fetch order.
    fn sort_rows(rows: &mut [Self]);
}
