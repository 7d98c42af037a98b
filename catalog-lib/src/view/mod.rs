//! Host-independent presentation model
//!
//! Pure projections from [`PaginationState`](crate::pagination::PaginationState)
//! to what a host draws, plus the inline title editor.

mod editor;
mod status;
mod table;

pub use editor::EditOutcome;
pub use editor::TitleEditor;
pub use status::Notice;
pub use status::StatusView;
pub use table::COLUMNS;
pub use table::Column;
pub use table::PLACEHOLDER;
pub use table::ProductRow;
pub use table::format_price;
pub use table::format_rating;
