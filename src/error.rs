//! Unified error type.

use crate::config::ConfigError;
use crate::store::StoreError;

/// What the startup path can fail with.
///
/// Anything a client did wrong becomes an HTTP [`Response`](crate::Response)
/// (400, 404, …), never an `Error`. This enum is reserved for the process
/// itself going wrong: unreadable environment, an unopenable database, a
/// port that will not bind.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
