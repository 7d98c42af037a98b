//! Viewport-driven load trigger
//!
//! A [`ViewportTrigger`] watches a sentinel through a host-provided
//! [`ViewportObserver`] and invokes its callback each time the sentinel
//! goes from hidden to visible. The callback can be swapped at any time
//! without touching the observation.

mod handle;
mod rows;
mod trigger;

pub use handle::Callback;
pub use handle::VisibilityEntry;
pub use handle::VisibilityHandle;
pub use rows::RowSubscription;
pub use rows::RowViewport;
pub use rows::UnsupportedViewport;
pub use trigger::TriggerOptions;
pub use trigger::ViewportObserver;
pub use trigger::ViewportTrigger;
