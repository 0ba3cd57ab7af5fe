//! Genre management service

use std::sync::Arc;

use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{Book, Genre, GenreForm},
    repository::{CatalogStore, Insertion, Removal},
};

#[derive(Clone)]
pub struct GenreService {
    store: Arc<dyn CatalogStore>,
}

impl GenreService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.store.list_genres().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.store
            .get_genre(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    /// Genre with the books filed under it
    pub async fn detail(&self, id: Uuid) -> AppResult<(Genre, Vec<Book>)> {
        let (genre, books) =
            tokio::try_join!(self.store.get_genre(id), self.store.books_by_genre(id))?;
        let genre = genre.ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok((genre, books))
    }

    /// Create a genre unless one with the same name (ignoring case) exists
    pub async fn create(&self, mut form: GenreForm) -> AppResult<Submission<Genre, GenreForm>> {
        let name = match form.checked() {
            Ok(name) => name,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.insert_genre(name).await? {
            Insertion::Created(genre) => {
                tracing::info!(id = %genre.id, name = %genre.name, "Genre created");
                Ok(Submission::Saved(genre))
            }
            Insertion::Existing(genre) => {
                tracing::info!(id = %genre.id, "Genre already exists, not creating a duplicate");
                Ok(Submission::Duplicate(genre))
            }
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        mut form: GenreForm,
    ) -> AppResult<Submission<Genre, GenreForm>> {
        self.get(id).await?;
        let name = match form.checked() {
            Ok(name) => name,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.replace_genre(id, name).await {
            Ok(Some(genre)) => {
                tracing::info!(id = %genre.id, "Genre updated");
                Ok(Submission::Saved(genre))
            }
            Ok(None) => Err(AppError::NotFound("Genre not found".to_string())),
            Err(AppError::Conflict(_)) => Ok(Submission::rejected(
                form,
                vec!["A genre with this name already exists".to_string()],
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<(Genre, Vec<Book>)>> {
        let (genre, books) =
            tokio::try_join!(self.store.get_genre(id), self.store.books_by_genre(id))?;
        Ok(genre.map(|g| (g, books)))
    }

    /// Delete a genre that no book lists
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<(Genre, Vec<Book>)>> {
        match self.store.delete_genre(id).await? {
            Removal::Deleted => {
                tracing::info!(%id, "Genre deleted");
                Ok(Deletion::Deleted)
            }
            Removal::Missing => Ok(Deletion::Missing),
            Removal::InUse => {
                tracing::info!(%id, "Genre still has books, not deleting");
                Ok(match self.delete_preview(id).await? {
                    Some(blocking) => Deletion::Blocked(blocking),
                    None => Deletion::Missing,
                })
            }
        }
    }
}
