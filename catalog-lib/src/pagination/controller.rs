//! Pagination controller

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use log::debug;
use log::info;
use log::warn;
use tokio::sync::Notify;

use crate::CatalogClient;
use crate::api::ProductSource;
use crate::config::CatalogConfig;
use crate::error::Error;
use crate::model::ProductId;

use super::state::FetchRequest;
use super::state::PaginationState;
use super::state::Settled;

/// Owns the loaded products of one view and drives fetches against a
/// [`ProductSource`].
///
/// State transitions happen synchronously when a call is first polled; the
/// lock is never held across the network round trip. Two `load_more` calls
/// racing each other therefore issue exactly one fetch.
///
/// This controller is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```ignore
/// let controller = PaginationController::mount(client, page_size).await;
///
/// // sentinel became visible
/// controller.load_more().await;
///
/// // local edit, never sent to the server
/// controller.update_title(3, "New title");
/// ```
#[derive(Debug)]
pub struct PaginationController<S> {
    inner: Arc<ControllerInner<S>>,
}

#[derive(Debug)]
struct ControllerInner<S> {
    source: S,
    page_size: NonZeroUsize,
    state: RwLock<PaginationState>,
    changed: Notify,
}

impl<S> Clone for PaginationController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PaginationController<CatalogClient> {
    /// Validates `config` and creates a controller over a [`CatalogClient`]
    /// for its endpoint, in the Loading phase with no fetch issued.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, Error> {
        config.validate()?;
        let client = CatalogClient::from_config(config)?;
        Ok(Self::new(client, config.page_size))
    }
}

impl<S: ProductSource> PaginationController<S> {
    /// Creates a controller in the Loading phase without issuing the
    /// initial fetch.
    ///
    /// Call [`refetch`](Self::refetch) to issue it. Hosts that render while
    /// the first page is in flight use this; everyone else uses
    /// [`mount`](Self::mount).
    pub fn new(source: S, page_size: NonZeroUsize) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                source,
                page_size,
                state: RwLock::new(PaginationState::new()),
                changed: Notify::new(),
            }),
        }
    }

    /// Creates a controller and loads the first page.
    pub async fn mount(source: S, page_size: NonZeroUsize) -> Self {
        let controller = Self::new(source, page_size);
        controller.refetch().await;
        controller
    }

    /// Fetches the next page.
    ///
    /// Returns `None` without fetching while a fetch is in flight or when no
    /// more data is available.
    pub async fn load_more(&self) -> Option<Settled> {
        let request = self.write().begin_load_more()?;
        self.notify();
        Some(self.run(request).await)
    }

    /// Reloads from offset 0, replacing the loaded records once the page
    /// arrives.
    ///
    /// Issued regardless of the current phase. A fetch still in flight is
    /// superseded and its outcome dropped.
    pub async fn refetch(&self) -> Settled {
        let request = self.write().begin_refetch();
        info!("refetching catalog");
        self.notify();
        self.run(request).await
    }

    /// Replaces the title of a loaded product. Never fetches.
    ///
    /// Returns `false` if no loaded product has `id`.
    pub fn update_title(&self, id: ProductId, title: impl Into<String>) -> bool {
        let updated = self.write().update_title(id, title);
        if updated {
            debug!("title of product {} edited locally", id);
            self.notify();
        }
        updated
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> PaginationState {
        self.read().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&PaginationState) -> R) -> R {
        f(&self.read())
    }

    /// Returns the fixed page size.
    pub fn page_size(&self) -> NonZeroUsize {
        self.inner.page_size
    }

    /// Waits until the state changes.
    ///
    /// Meant for a single host loop; a change that happens while nobody
    /// waits is remembered for the next call.
    pub async fn changed(&self) {
        self.inner.changed.notified().await;
    }

    async fn run(&self, request: FetchRequest) -> Settled {
        debug!(
            "fetching offset={} limit={} mode={:?}",
            request.offset, self.inner.page_size, request.mode
        );

        let outcome = self
            .inner
            .source
            .fetch_page(request.offset, self.inner.page_size)
            .await;

        if let Err(err) = &outcome {
            warn!("fetch at offset {} failed: {}", request.offset, err);
        }

        let settled = self.write().settle(request, outcome);
        match settled {
            Settled::Superseded => debug!("dropped superseded fetch at offset {}", request.offset),
            Settled::Loaded { received } => debug!("received {} products", received),
            Settled::Failed => {}
        }
        self.notify();
        settled
    }

    fn notify(&self) {
        self.inner.changed.notify_one();
    }

    fn read(&self) -> RwLockReadGuard<'_, PaginationState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PaginationState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
