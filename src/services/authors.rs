//! Author management service

use std::sync::Arc;

use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorForm, Book},
    repository::{CatalogStore, Insertion, Removal},
};

#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn CatalogStore>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// All authors sorted by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.store.list_authors().await
    }

    /// Author by id
    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.store
            .get_author(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Author with the books that reference it
    pub async fn detail(&self, id: Uuid) -> AppResult<(Author, Vec<Book>)> {
        let (author, books) =
            tokio::try_join!(self.store.get_author(id), self.store.books_by_author(id))?;
        let author = author.ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        Ok((author, books))
    }

    /// Create an author unless one with the same name (ignoring case) exists
    pub async fn create(&self, mut form: AuthorForm) -> AppResult<Submission<Author, AuthorForm>> {
        let fields = match form.checked() {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.insert_author(fields).await? {
            Insertion::Created(author) => {
                tracing::info!(id = %author.id, name = %author.name(), "Author created");
                Ok(Submission::Saved(author))
            }
            Insertion::Existing(author) => {
                tracing::info!(id = %author.id, "Author already exists, not creating a duplicate");
                Ok(Submission::Duplicate(author))
            }
        }
    }

    /// Replace every field of an existing author
    pub async fn update(
        &self,
        id: Uuid,
        mut form: AuthorForm,
    ) -> AppResult<Submission<Author, AuthorForm>> {
        self.get(id).await?;
        let fields = match form.checked() {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.replace_author(id, fields).await {
            Ok(Some(author)) => {
                tracing::info!(id = %author.id, "Author updated");
                Ok(Submission::Saved(author))
            }
            Ok(None) => Err(AppError::NotFound("Author not found".to_string())),
            Err(AppError::Conflict(_)) => Ok(Submission::rejected(
                form,
                vec!["An author with this name already exists".to_string()],
            )),
            Err(e) => Err(e),
        }
    }

    /// Author and the books blocking its deletion, or `None` if it is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<(Author, Vec<Book>)>> {
        let (author, books) =
            tokio::try_join!(self.store.get_author(id), self.store.books_by_author(id))?;
        Ok(author.map(|a| (a, books)))
    }

    /// Delete an author that no book references
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<(Author, Vec<Book>)>> {
        match self.store.delete_author(id).await? {
            Removal::Deleted => {
                tracing::info!(%id, "Author deleted");
                Ok(Deletion::Deleted)
            }
            Removal::Missing => Ok(Deletion::Missing),
            Removal::InUse => {
                tracing::info!(%id, "Author still has books, not deleting");
                Ok(match self.delete_preview(id).await? {
                    Some(blocking) => Deletion::Blocked(blocking),
                    None => Deletion::Missing,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookFields;
    use crate::repository::{MemoryStore, MockCatalogStore};

    fn form(first: &str, family: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.into(),
            family_name: family.into(),
            ..AuthorForm::default()
        }
    }

    fn service() -> (AuthorService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AuthorService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_duplicate_differs_only_in_case() {
        let (service, store) = service();
        let first = match service.create(form("Mary", "Shelley")).await.unwrap() {
            Submission::Saved(a) => a,
            other => panic!("expected Saved, got {:?}", other),
        };
        match service.create(form("mary", "SHELLEY")).await.unwrap() {
            Submission::Duplicate(a) => assert_eq!(a.id, first.id),
            other => panic!("expected Duplicate, got {:?}", other),
        }
        assert_eq!(store.count_authors().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let (service, store) = service();
        match service.create(form("", "Shelley")).await.unwrap() {
            Submission::Rejected { form, errors } => {
                assert_eq!(errors, vec!["First name must be specified"]);
                assert_eq!(form.family_name, "Shelley");
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert_eq!(store.count_authors().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_detail_is_not_found() {
        let (service, _store) = service();
        let Submission::Saved(author) = service.create(form("Bram", "Stoker")).await.unwrap() else {
            panic!("author not saved");
        };
        assert!(matches!(service.delete(author.id).await.unwrap(), Deletion::Deleted));
        assert!(matches!(
            service.detail(author.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(author.id).await.unwrap(), Deletion::Missing));
    }

    #[tokio::test]
    async fn test_delete_blocked_by_books() {
        let (service, store) = service();
        let Submission::Saved(author) = service.create(form("Bram", "Stoker")).await.unwrap() else {
            panic!("author not saved");
        };
        store
            .insert_book(BookFields {
                title: "Dracula".into(),
                author_id: author.id,
                summary: "s".into(),
                isbn: "i".into(),
                genre_ids: vec![],
            })
            .await
            .unwrap();

        match service.delete(author.id).await.unwrap() {
            Deletion::Blocked((a, books)) => {
                assert_eq!(a.id, author.id);
                assert_eq!(books.len(), 1);
            }
            other => panic!("expected Blocked, got {:?}", other),
        }
        assert!(service.get(author.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_author() {
        let (service, _store) = service();
        let result = service.update(Uuid::new_v4(), form("A", "B")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // a missing author wins over an invalid form
        let result = service.update(Uuid::new_v4(), form("", "")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store
            .expect_list_authors()
            .returning(|| Err(AppError::Internal("store unavailable".into())));
        let service = AuthorService::new(Arc::new(store));
        assert!(matches!(service.list().await, Err(AppError::Internal(_))));
    }
}
