//! Inventory (book copies) service

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::Submission;
use crate::{
    error::{AppError, AppResult},
    models::{Book, InventoryItem, InventoryItemFields, InventoryItemForm, InventoryListing},
    repository::{CatalogStore, Removal},
};

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn CatalogStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every copy with its book resolved
    pub async fn list(&self) -> AppResult<Vec<InventoryListing>> {
        let (items, books) = tokio::try_join!(self.store.list_items(), self.store.list_books())?;
        let books: HashMap<Uuid, Book> = books.into_iter().map(|b| (b.id, b)).collect();
        Ok(items
            .into_iter()
            .map(|item| InventoryListing {
                book: books.get(&item.book_id).cloned(),
                item,
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<InventoryItem> {
        self.store
            .get_item(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    /// Copy with its book resolved
    pub async fn detail(&self, id: Uuid) -> AppResult<InventoryListing> {
        let item = self.get(id).await?;
        let book = self.store.get_book(item.book_id).await?;
        Ok(InventoryListing { item, book })
    }

    /// Books offered on the copy form, sorted by title
    pub async fn book_options(&self) -> AppResult<Vec<Book>> {
        self.store.list_books().await
    }

    /// Copy to edit together with the book options
    pub async fn edit(&self, id: Uuid) -> AppResult<(InventoryItem, Vec<Book>)> {
        let (item, books) = tokio::try_join!(self.store.get_item(id), self.store.list_books())?;
        let item = item.ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
        Ok((item, books))
    }

    pub async fn create(
        &self,
        mut form: InventoryItemForm,
    ) -> AppResult<Submission<InventoryItem, InventoryItemForm>> {
        let fields = match self.checked(&mut form).await? {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.insert_item(fields).await {
            Ok(item) => {
                tracing::info!(id = %item.id, book = %item.book_id, "Inventory item created");
                Ok(Submission::Saved(item))
            }
            Err(AppError::Conflict(msg)) => Ok(Submission::rejected(form, vec![msg])),
            Err(e) => Err(e),
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut form: InventoryItemForm,
    ) -> AppResult<Submission<InventoryItem, InventoryItemForm>> {
        self.get(id).await?;
        let fields = match self.checked(&mut form).await? {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.replace_item(id, fields).await {
            Ok(Some(item)) => {
                tracing::info!(id = %item.id, status = %item.status, "Inventory item updated");
                Ok(Submission::Saved(item))
            }
            Ok(None) => Err(AppError::NotFound("Item not found".to_string())),
            Err(AppError::Conflict(msg)) => Ok(Submission::rejected(form, vec![msg])),
            Err(e) => Err(e),
        }
    }

    /// Validate the form and check that the referenced book exists
    async fn checked(
        &self,
        form: &mut InventoryItemForm,
    ) -> AppResult<Result<InventoryItemFields, Vec<String>>> {
        let fields = match form.checked(Utc::now()) {
            Ok(fields) => fields,
            Err(errors) => return Ok(Err(errors)),
        };
        if self.store.get_book(fields.book_id).await?.is_none() {
            return Ok(Err(vec!["Book not found".to_string()]));
        }
        Ok(Ok(fields))
    }

    /// Copy to confirm deletion of, or `None` if it is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<InventoryListing>> {
        match self.store.get_item(id).await? {
            Some(item) => {
                let book = self.store.get_book(item.book_id).await?;
                Ok(Some(InventoryListing { item, book }))
            }
            None => Ok(None),
        }
    }

    /// Copies have no dependents, so deletion is never refused
    pub async fn delete(&self, id: Uuid) -> AppResult<Removal> {
        let removal = self.store.delete_item(id).await?;
        if removal == Removal::Deleted {
            tracing::info!(%id, "Inventory item deleted");
        }
        Ok(removal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorFields, BookFields, InventoryStatus};
    use crate::repository::MemoryStore;

    async fn with_book() -> (InventoryService, Arc<MemoryStore>, Book) {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .insert_author(AuthorFields {
                first_name: "Mervyn".into(),
                family_name: "Peake".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();
        let book = store
            .insert_book(BookFields {
                title: "Titus Groan".into(),
                author_id: author.record().id,
                summary: "Gormenghast".into(),
                isbn: "9780099288770".into(),
                genre_ids: vec![],
            })
            .await
            .unwrap();
        (InventoryService::new(store.clone()), store, book)
    }

    #[tokio::test]
    async fn test_defaults_on_create() {
        let (service, _store, book) = with_book().await;
        let before = Utc::now();
        let Submission::Saved(item) = service
            .create(InventoryItemForm {
                book: book.id.to_string(),
                imprint: "Eyre & Spottiswoode, 1946".into(),
                ..InventoryItemForm::default()
            })
            .await
            .unwrap()
        else {
            panic!("item not saved");
        };
        let after = Utc::now();
        assert_eq!(item.status, InventoryStatus::Maintenance);
        assert!(item.due_back >= before && item.due_back <= after);
    }

    #[tokio::test]
    async fn test_missing_item() {
        let (service, _store, _book) = with_book().await;
        let id = Uuid::new_v4();
        assert!(matches!(service.edit(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.detail(id).await, Err(AppError::NotFound(_))));
        assert_eq!(service.delete(id).await.unwrap(), Removal::Missing);
        assert!(service.delete_preview(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_book_rejected() {
        let (service, store, _book) = with_book().await;
        let result = service
            .create(InventoryItemForm {
                book: Uuid::new_v4().to_string(),
                imprint: "x".into(),
                ..InventoryItemForm::default()
            })
            .await
            .unwrap();
        assert!(matches!(result, Submission::Rejected { .. }));
        assert_eq!(store.count_items(None).await.unwrap(), 0);
    }
}
