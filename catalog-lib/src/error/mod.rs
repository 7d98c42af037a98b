//! Error types

mod config;
mod fetch;
mod observer;

pub use config::*;
pub use fetch::*;
pub use observer::*;

/// Top-level error for the catalog library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The viewport trigger could not be attached.
    #[error(transparent)]
    Observer(#[from] ObserverError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
