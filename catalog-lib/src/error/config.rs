//! Configuration error types

/// Errors raised while building a [`CatalogConfig`](crate::config::CatalogConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The page size must be positive.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// The base URL could not be parsed.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// An environment variable held an unparsable value.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// The rejected value.
        value: String,
    },
}
