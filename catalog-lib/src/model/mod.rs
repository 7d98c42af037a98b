//! Catalog data model

mod product;

pub use product::Product;
pub use product::ProductId;
