//! Product record

use serde::Deserialize;
use serde::Serialize;

/// Server-assigned product identifier.
pub type ProductId = u64;

/// A product as returned by the catalog API.
///
/// `id` is the identity; every other field is display data. Only `title` is
/// edited after load, and only locally. Fields the API returns beyond these
/// (description, stock, images, ...) are ignored when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable, unique identifier.
    pub id: ProductId,
    /// Display title, editable in place.
    pub title: String,
    /// Brand name, if the product has one.
    #[serde(default)]
    pub brand: Option<String>,
    /// Category slug, if known.
    #[serde(default)]
    pub category: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Average rating, if rated.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Product {
    /// Creates a product with only the required fields set.
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            brand: None,
            category: None,
            price,
            rating: None,
        }
    }

    /// Sets the brand.
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}
