//! Remote data source contract

mod page;
mod source;

pub use page::Page;
pub use source::ProductSource;
