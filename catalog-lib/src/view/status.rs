//! Status surfaces around the table.

use crate::pagination::PaginationState;

/// A message shown below the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed. Stays until a fetch succeeds.
    Error(String),
    /// Everything is loaded.
    EndOfData,
}

impl Notice {
    /// Display text.
    pub fn text(&self) -> String {
        match self {
            Notice::Loading => "Loading more products...".to_string(),
            Notice::Error(message) => format!("Error: {}", message),
            Notice::EndOfData => "No more products to load".to_string(),
        }
    }
}

/// Everything around the table that depends on pagination state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Loaded record count.
    pub loaded: usize,
    /// Server total.
    pub total: usize,
    /// Notices in display order.
    pub notices: Vec<Notice>,
    /// Whether the load sentinel should be mounted.
    pub show_sentinel: bool,
}

impl StatusView {
    pub fn from_state(state: &PaginationState) -> Self {
        let mut notices = Vec::new();
        if let Some(message) = state.last_error() {
            notices.push(Notice::Error(message.to_string()));
        }
        if state.is_loading() {
            notices.push(Notice::Loading);
        }
        if !state.has_more() && !state.is_empty() {
            notices.push(Notice::EndOfData);
        }

        Self {
            loaded: state.len(),
            total: state.total_count(),
            notices,
            show_sentinel: state.has_more() && !state.is_loading(),
        }
    }

    /// Header line, e.g. `Displaying 10 of 194 products`.
    pub fn header(&self) -> String {
        format!("Displaying {} of {} products", self.loaded, self.total)
    }

    /// The error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        self.notices.iter().find_map(|notice| match notice {
            Notice::Error(message) => Some(message.as_str()),
            _ => None,
        })
    }
}
