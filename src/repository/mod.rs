//! Record store for catalog documents.
//!
//! Services talk to the store only through [`CatalogStore`], handed to them
//! at construction. Every method is a single atomic store operation; the
//! case-insensitive uniqueness checks and the dependency guards on delete
//! run inside the store call rather than as separate read-then-write steps.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, Book, BookFields, Genre, InventoryItem, InventoryItemFields,
        InventoryStatus,
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of an insert guarded by a case-insensitive uniqueness rule
#[derive(Debug, Clone, PartialEq)]
pub enum Insertion<T> {
    Created(T),
    /// A record with the same name already existed; nothing was written
    Existing(T),
}

impl<T> Insertion<T> {
    pub fn record(&self) -> &T {
        match self {
            Insertion::Created(r) | Insertion::Existing(r) => r,
        }
    }
}

/// Result of a guarded delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    Missing,
    /// Other records still reference it; nothing was deleted
    InUse,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;

    // Authors

    /// All authors sorted by family name
    async fn list_authors(&self) -> AppResult<Vec<Author>>;
    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn insert_author(&self, fields: AuthorFields) -> AppResult<Insertion<Author>>;
    /// Full replace; `None` if the author does not exist
    async fn replace_author(&self, id: Uuid, fields: AuthorFields) -> AppResult<Option<Author>>;
    /// Refused while any book references the author
    async fn delete_author(&self, id: Uuid) -> AppResult<Removal>;
    async fn count_authors(&self) -> AppResult<i64>;

    // Genres

    /// All genres sorted by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;
    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn insert_genre(&self, name: String) -> AppResult<Insertion<Genre>>;
    async fn replace_genre(&self, id: Uuid, name: String) -> AppResult<Option<Genre>>;
    /// Refused while any book lists the genre
    async fn delete_genre(&self, id: Uuid) -> AppResult<Removal>;
    async fn count_genres(&self) -> AppResult<i64>;

    // Books

    /// All books sorted by title
    async fn list_books(&self) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>>;
    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>>;
    async fn insert_book(&self, fields: BookFields) -> AppResult<Book>;
    async fn replace_book(&self, id: Uuid, fields: BookFields) -> AppResult<Option<Book>>;
    /// Refused while any inventory item references the book
    async fn delete_book(&self, id: Uuid) -> AppResult<Removal>;
    async fn count_books(&self) -> AppResult<i64>;

    // Inventory

    /// All inventory items ordered by due date
    async fn list_items(&self) -> AppResult<Vec<InventoryItem>>;
    async fn get_item(&self, id: Uuid) -> AppResult<Option<InventoryItem>>;
    async fn items_for_book(&self, book_id: Uuid) -> AppResult<Vec<InventoryItem>>;
    async fn insert_item(&self, fields: InventoryItemFields) -> AppResult<InventoryItem>;
    async fn replace_item(
        &self,
        id: Uuid,
        fields: InventoryItemFields,
    ) -> AppResult<Option<InventoryItem>>;
    async fn delete_item(&self, id: Uuid) -> AppResult<Removal>;
    /// Count items, optionally only those with the given status
    async fn count_items(&self, status: Option<InventoryStatus>) -> AppResult<i64>;
}
