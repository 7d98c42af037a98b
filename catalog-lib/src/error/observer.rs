//! Viewport observer error types

/// Errors raised when attaching a viewport trigger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    /// The host has no viewport-observation primitive.
    #[error("viewport observation is not available in this environment")]
    Unavailable,

    /// The trigger already observes a sentinel; detach it first.
    #[error("trigger is already attached to a sentinel")]
    AlreadyAttached,
}
