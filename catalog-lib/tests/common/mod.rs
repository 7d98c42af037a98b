//! Shared test doubles for the catalog integration tests.

#![allow(dead_code)]

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use catalog_lib::api::Page;
use catalog_lib::api::ProductSource;
use catalog_lib::error::FetchError;
use catalog_lib::model::Product;
use tokio::sync::Semaphore;

pub fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

pub fn products(ids: std::ops::Range<u64>) -> Vec<Product> {
    ids.map(|id| {
        Product::new(id, format!("Product {}", id), 10.0 + id as f64)
            .with_category("misc")
    })
    .collect()
}

/// In-memory catalog answering like the real endpoint.
pub struct FakeCatalog {
    products: Mutex<Vec<Product>>,
    fail_next: Mutex<Option<FetchError>>,
    short_by: AtomicUsize,
    calls: Mutex<Vec<(usize, usize)>>,
}

impl FakeCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            fail_next: Mutex::new(None),
            short_by: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_count(count: u64) -> Self {
        Self::new(products(0..count))
    }

    /// Replaces the server-side data.
    pub fn replace(&self, products: Vec<Product>) {
        *self.products.lock().unwrap() = products;
    }

    /// Makes the next fetch fail with `err`.
    pub fn fail_next(&self, err: FetchError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    /// Makes every page `n` records shorter than requested.
    pub fn shorten_pages_by(&self, n: usize) {
        self.short_by.store(n, Ordering::SeqCst);
    }

    /// `(offset, page_size)` of every fetch so far.
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        self.calls.lock().unwrap().push((offset, page_size.get()));
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        let products = self.products.lock().unwrap();
        let take = page_size
            .get()
            .saturating_sub(self.short_by.load(Ordering::SeqCst))
            .max(1);
        let records: Vec<Product> = products.iter().skip(offset).take(take).cloned().collect();
        Ok(Page::new(records, products.len()).with_window(offset, page_size.get()))
    }
}

#[async_trait]
impl ProductSource for FakeCatalog {
    async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        self.answer(offset, page_size)
    }
}

/// A [`FakeCatalog`] whose fetches wait for a permit before answering.
pub struct GatedCatalog {
    pub catalog: FakeCatalog,
    pub gate: Semaphore,
}

impl GatedCatalog {
    pub fn with_count(count: u64) -> Self {
        Self {
            catalog: FakeCatalog::with_count(count),
            gate: Semaphore::new(0),
        }
    }

    /// Lets `n` pending or future fetches answer.
    pub fn open(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl ProductSource for GatedCatalog {
    async fn fetch_page(&self, offset: usize, page_size: NonZeroUsize) -> Result<Page, FetchError> {
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.catalog.answer(offset, page_size)
    }
}
