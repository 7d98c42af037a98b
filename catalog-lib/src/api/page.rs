//! Page type for paginated product results.

use serde::Deserialize;

use crate::model::Product;

/// One page of products plus the server's total count.
///
/// `total_count` counts every record matching the (unfiltered) query, not
/// just the ones in this page. `skip` and `limit` echo what the server
/// applied to the request.
///
/// # Example
///
/// ```ignore
/// let page = client.fetch_page(0, page_size).await?;
///
/// for product in page.records() {
///     println!("{}", product.title);
/// }
/// println!("{} of {}", page.len(), page.total_count());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(rename = "products")]
    records: Vec<Product>,
    #[serde(rename = "total")]
    total_count: usize,
    #[serde(default)]
    skip: usize,
    #[serde(default)]
    limit: usize,
}

impl Page {
    /// Creates a new page with records and the server's total count.
    pub fn new(records: Vec<Product>, total_count: usize) -> Self {
        Self {
            records,
            total_count,
            skip: 0,
            limit: 0,
        }
    }

    /// Sets the echoed `skip` and `limit`.
    pub fn with_window(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Product] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Product> {
        self.records
    }

    /// Returns the total record count known to the server.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the offset the server applied.
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Returns the page size the server applied.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
