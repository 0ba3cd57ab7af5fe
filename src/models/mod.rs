//! Data models for the catalog

pub mod author;
pub mod book;
pub mod genre;
pub mod inventory_item;

use chrono::NaiveDate;

// Re-export commonly used types
pub use author::{Author, AuthorFields, AuthorForm};
pub use book::{Book, BookDetail, BookFields, BookForm, BookListing};
pub use genre::{Genre, GenreForm};
pub use inventory_item::{
    InventoryItem, InventoryItemFields, InventoryItemForm, InventoryListing, InventoryStatus,
};

/// Medium date format used on every page, e.g. "Oct 16, 2026"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Aggregate counts shown on the catalog home page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: i64,
    pub copies: i64,
    pub copies_available: i64,
    pub authors: i64,
    pub genres: i64,
}
