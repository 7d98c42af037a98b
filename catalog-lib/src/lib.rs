//! Product catalog client library
//!
//! Infinite pagination over a remote products endpoint, a viewport trigger
//! that asks for the next page when a sentinel scrolls into view, and local
//! title edits that never leave the client.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod view;
pub mod viewport;

mod client;

pub use client::*;
pub use config::CatalogConfig;
pub use pagination::PaginationController;
pub use pagination::PaginationState;
