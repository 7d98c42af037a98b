//! ProductSource trait

use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::Page;
use crate::error::FetchError;

/// A remote source of paginated products.
///
/// Each call is one round trip: no retries, no caching, and no partial
/// results. A failure is either a transport error or a response error.
///
/// The pagination controller calls this with non-negative offsets and a
/// positive page size, which the types already guarantee.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use catalog_lib::api::{Page, ProductSource};
/// use catalog_lib::error::FetchError;
///
/// struct Fixed(Vec<Product>);
///
/// #[async_trait]
/// impl ProductSource for Fixed {
///     async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
///         let records = self.0.iter().skip(offset).take(page_size.get()).cloned().collect();
///         Ok(Page::new(records, self.0.len()))
///     }
/// }
/// ```
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches up to `page_size` products starting at `offset`.
    async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError>;
}

#[async_trait]
impl<T: ProductSource + ?Sized> ProductSource for Arc<T> {
    async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        (**self).fetch_page(offset, page_size).await
    }
}
