//! Pagination state and its transitions.

use crate::api::Page;
use crate::error::FetchError;
use crate::model::Product;
use crate::model::ProductId;

/// Whether a fetch extends the loaded records or replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Append the page after the loaded records.
    Append,
    /// Replace the loaded records with the page (offset 0).
    Reset,
}

/// A fetch that has been started and must be settled.
///
/// Returned by [`PaginationState::begin_load_more`] and
/// [`PaginationState::begin_refetch`], handed back to
/// [`PaginationState::settle`] with the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Offset to fetch from.
    pub offset: usize,
    /// How the page is merged.
    pub mode: FetchMode,
    generation: u64,
}

/// Result of settling a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The page was merged.
    Loaded {
        /// Number of records the server returned.
        received: usize,
    },
    /// The fetch failed and the state moved to Error.
    Failed,
    /// A later refetch superseded this request; the outcome was dropped.
    Superseded,
}

/// Coarse phase of the state machine.
///
/// Only describes the loading and error flags, not whether data is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Error,
}

/// A failed fetch, as kept in the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Human-readable message shown to the user.
    pub message: String,
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    /// `true` when no response was obtained.
    pub transport: bool,
}

impl From<&FetchError> for LoadError {
    fn from(err: &FetchError) -> Self {
        Self {
            message: err.to_string(),
            status: err.status_code(),
            transport: err.is_transport(),
        }
    }
}

/// Loaded records plus the offset bookkeeping of an infinite list.
///
/// Invariants, holding after every settled fetch:
/// - records keep server order and are only appended, except for in-place
///   title edits and the replacement done by a reset
/// - `has_more == records.len() < total_count`, except after a failure,
///   which forces it to `false`
/// - `next_offset` advances by the number of records actually received
/// - at most one append fetch is in flight
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    records: Vec<Product>,
    total_count: usize,
    next_offset: usize,
    is_loading: bool,
    last_error: Option<LoadError>,
    has_more: bool,
    generation: u64,
}

impl PaginationState {
    /// Creates the state of a freshly mounted view: empty and loading its
    /// first page.
    ///
    /// The initial fetch itself is started with [`begin_refetch`](Self::begin_refetch).
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            total_count: 0,
            next_offset: 0,
            is_loading: true,
            last_error: None,
            has_more: true,
            generation: 0,
        }
    }

    /// Starts an append fetch from `next_offset`.
    ///
    /// Returns `None`, changing nothing, while a fetch is in flight or when
    /// no more data is available.
    pub fn begin_load_more(&mut self) -> Option<FetchRequest> {
        if self.is_loading || !self.has_more {
            return None;
        }
        self.is_loading = true;
        Some(FetchRequest {
            offset: self.next_offset,
            mode: FetchMode::Append,
            generation: self.generation,
        })
    }

    /// Starts a reset fetch from offset 0, whatever the current state.
    ///
    /// Loaded records stay in place until the new page settles. Any fetch
    /// still in flight is superseded.
    pub fn begin_refetch(&mut self) -> FetchRequest {
        self.generation += 1;
        self.is_loading = true;
        FetchRequest {
            offset: 0,
            mode: FetchMode::Reset,
            generation: self.generation,
        }
    }

    /// Applies the outcome of a fetch started by one of the `begin_*` methods.
    pub fn settle(&mut self, request: FetchRequest, outcome: Result<Page, FetchError>) -> Settled {
        if request.generation != self.generation {
            return Settled::Superseded;
        }
        self.is_loading = false;

        match outcome {
            Ok(page) => {
                let total_count = page.total_count();
                let records = page.into_records();
                let received = records.len();

                match request.mode {
                    FetchMode::Reset => {
                        self.records = records;
                        self.next_offset = received;
                    }
                    FetchMode::Append => {
                        self.records.extend(records);
                        self.next_offset += received;
                    }
                }

                self.total_count = total_count;
                self.has_more = self.records.len() < total_count;
                self.last_error = None;
                Settled::Loaded { received }
            }
            Err(err) => {
                self.last_error = Some(LoadError::from(&err));
                self.has_more = false;
                Settled::Failed
            }
        }
    }

    /// Replaces the title of the record with `id`.
    ///
    /// Returns `false`, changing nothing, if no loaded record has that id.
    pub fn update_title(&mut self, id: ProductId, title: impl Into<String>) -> bool {
        match self.records.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Returns the loaded records in server order.
    pub fn records(&self) -> &[Product] {
        &self.records
    }

    /// Returns the loaded record with `id`, if any.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.records.iter().find(|p| p.id == id)
    }

    /// Returns the number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the server's total count from the last successful fetch.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the offset the next append fetch starts from.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Returns `true` while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns `true` if more records can be loaded.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Returns the message of the last failed fetch.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_ref().map(|e| e.message.as_str())
    }

    /// Returns the details of the last failed fetch.
    pub fn last_error_detail(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Loading
        } else if self.last_error.is_some() {
            Phase::Error
        } else {
            Phase::Idle
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}
