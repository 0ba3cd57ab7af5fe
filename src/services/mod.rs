//! Business logic services

pub mod authors;
pub mod books;
pub mod genres;
pub mod inventory;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// What came of a submitted create or update form
#[derive(Debug)]
pub enum Submission<T, F> {
    /// The record was written
    Saved(T),
    /// A record with the same name already exists; nothing was written
    Duplicate(T),
    /// The form failed validation and should be shown again
    Rejected { form: F, errors: Vec<String> },
}

impl<T, F> Submission<T, F> {
    pub fn rejected(form: F, errors: Vec<String>) -> Self {
        tracing::debug!(?errors, "Form rejected");
        Submission::Rejected { form, errors }
    }
}

/// What came of a delete confirmation
#[derive(Debug)]
pub enum Deletion<D> {
    Deleted,
    /// Nothing to delete; the record was already gone
    Missing,
    /// Dependent records still exist; nothing was deleted
    Blocked(D),
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorService,
    pub books: books::BookService,
    pub genres: genres::GenreService,
    pub inventory: inventory::InventoryService,
    store: Arc<dyn CatalogStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            authors: authors::AuthorService::new(store.clone()),
            books: books::BookService::new(store.clone()),
            genres: genres::GenreService::new(store.clone()),
            inventory: inventory::InventoryService::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }
}
