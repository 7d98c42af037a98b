//! Infinite pagination
//!
//! [`PaginationState`] holds the loaded records and the offset bookkeeping
//! and exposes the transitions as plain methods. [`PaginationController`]
//! drives those transitions around the async round trip to a
//! [`ProductSource`](crate::api::ProductSource).

mod controller;
mod state;

pub use controller::PaginationController;
pub use state::FetchMode;
pub use state::FetchRequest;
pub use state::LoadError;
pub use state::PaginationState;
pub use state::Phase;
pub use state::Settled;
