//! In-memory record store.
//!
//! Holds every collection behind a single lock, so each operation
//! (including the uniqueness check on insert and the dependency check on
//! delete) is atomic. Used by tests and by the `memory` backend.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogStore, Insertion, Removal};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorFields, Book, BookFields, Genre, InventoryItem, InventoryItemFields,
        InventoryStatus,
    },
};

#[derive(Debug, Default)]
struct Collections {
    authors: IndexMap<Uuid, Author>,
    genres: IndexMap<Uuid, Genre>,
    books: IndexMap<Uuid, Book>,
    items: IndexMap<Uuid, InventoryItem>,
}

impl Collections {
    fn author_named(&self, first_name: &str, family_name: &str) -> Option<&Author> {
        self.authors
            .values()
            .find(|a| a.same_name(first_name, family_name))
    }

    fn genre_named(&self, name: &str) -> Option<&Genre> {
        let wanted = name.to_lowercase();
        self.genres.values().find(|g| g.name.to_lowercase() == wanted)
    }

    fn check_book_refs(&self, fields: &BookFields) -> AppResult<()> {
        if !self.authors.contains_key(&fields.author_id) {
            return Err(AppError::Conflict(format!(
                "Author {} does not exist",
                fields.author_id
            )));
        }
        Ok(())
    }

    fn check_item_refs(&self, fields: &InventoryItemFields) -> AppResult<()> {
        if !self.books.contains_key(&fields.book_id) {
            return Err(AppError::Conflict(format!(
                "Book {} does not exist",
                fields.book_id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T: Clone, K: Ord>(values: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = values.collect();
    out.sort_by_key(|v| key(v));
    out
}

fn by_title(books: impl Iterator<Item = Book>) -> Vec<Book> {
    sorted_by(books, |b| b.title.clone())
}

fn by_due_date(items: impl Iterator<Item = InventoryItem>) -> Vec<InventoryItem> {
    sorted_by(items, |i| i.due_back)
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let db = self.inner.read().await;
        Ok(sorted_by(db.authors.values().cloned(), |a| {
            (a.family_name.clone(), a.first_name.clone())
        }))
    }

    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.inner.read().await.authors.get(&id).cloned())
    }

    async fn insert_author(&self, fields: AuthorFields) -> AppResult<Insertion<Author>> {
        let mut db = self.inner.write().await;
        if let Some(existing) = db.author_named(&fields.first_name, &fields.family_name) {
            return Ok(Insertion::Existing(existing.clone()));
        }
        let author = Author::new(Uuid::new_v4(), fields);
        db.authors.insert(author.id, author.clone());
        Ok(Insertion::Created(author))
    }

    async fn replace_author(&self, id: Uuid, fields: AuthorFields) -> AppResult<Option<Author>> {
        let mut db = self.inner.write().await;
        if !db.authors.contains_key(&id) {
            return Ok(None);
        }
        if let Some(other) = db.author_named(&fields.first_name, &fields.family_name) {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Author {} already exists",
                    other.name()
                )));
            }
        }
        let author = Author::new(id, fields);
        db.authors.insert(id, author.clone());
        Ok(Some(author))
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<Removal> {
        let mut db = self.inner.write().await;
        if !db.authors.contains_key(&id) {
            return Ok(Removal::Missing);
        }
        if db.books.values().any(|b| b.author_id == id) {
            return Ok(Removal::InUse);
        }
        db.authors.shift_remove(&id);
        Ok(Removal::Deleted)
    }

    async fn count_authors(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.authors.len() as i64)
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let db = self.inner.read().await;
        Ok(sorted_by(db.genres.values().cloned(), |g| g.name.clone()))
    }

    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.inner.read().await.genres.get(&id).cloned())
    }

    async fn insert_genre(&self, name: String) -> AppResult<Insertion<Genre>> {
        let mut db = self.inner.write().await;
        if let Some(existing) = db.genre_named(&name) {
            return Ok(Insertion::Existing(existing.clone()));
        }
        let genre = Genre {
            id: Uuid::new_v4(),
            name,
        };
        db.genres.insert(genre.id, genre.clone());
        Ok(Insertion::Created(genre))
    }

    async fn replace_genre(&self, id: Uuid, name: String) -> AppResult<Option<Genre>> {
        let mut db = self.inner.write().await;
        if !db.genres.contains_key(&id) {
            return Ok(None);
        }
        if let Some(other) = db.genre_named(&name) {
            if other.id != id {
                return Err(AppError::Conflict(format!("Genre {} already exists", other.name)));
            }
        }
        let genre = Genre { id, name };
        db.genres.insert(id, genre.clone());
        Ok(Some(genre))
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<Removal> {
        let mut db = self.inner.write().await;
        if !db.genres.contains_key(&id) {
            return Ok(Removal::Missing);
        }
        if db.books.values().any(|b| b.genre_ids.contains(&id)) {
            return Ok(Removal::InUse);
        }
        db.genres.shift_remove(&id);
        Ok(Removal::Deleted)
    }

    async fn count_genres(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.genres.len() as i64)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let db = self.inner.read().await;
        Ok(by_title(db.books.values().cloned()))
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let db = self.inner.read().await;
        Ok(by_title(
            db.books.values().filter(|b| b.author_id == author_id).cloned(),
        ))
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let db = self.inner.read().await;
        Ok(by_title(
            db.books
                .values()
                .filter(|b| b.genre_ids.contains(&genre_id))
                .cloned(),
        ))
    }

    async fn insert_book(&self, fields: BookFields) -> AppResult<Book> {
        let mut db = self.inner.write().await;
        db.check_book_refs(&fields)?;
        let book = Book::new(Uuid::new_v4(), fields);
        db.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn replace_book(&self, id: Uuid, fields: BookFields) -> AppResult<Option<Book>> {
        let mut db = self.inner.write().await;
        if !db.books.contains_key(&id) {
            return Ok(None);
        }
        db.check_book_refs(&fields)?;
        let book = Book::new(id, fields);
        db.books.insert(id, book.clone());
        Ok(Some(book))
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<Removal> {
        let mut db = self.inner.write().await;
        if !db.books.contains_key(&id) {
            return Ok(Removal::Missing);
        }
        if db.items.values().any(|i| i.book_id == id) {
            return Ok(Removal::InUse);
        }
        db.books.shift_remove(&id);
        Ok(Removal::Deleted)
    }

    async fn count_books(&self) -> AppResult<i64> {
        Ok(self.inner.read().await.books.len() as i64)
    }

    async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let db = self.inner.read().await;
        Ok(by_due_date(db.items.values().cloned()))
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<InventoryItem>> {
        Ok(self.inner.read().await.items.get(&id).cloned())
    }

    async fn items_for_book(&self, book_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let db = self.inner.read().await;
        Ok(by_due_date(
            db.items.values().filter(|i| i.book_id == book_id).cloned(),
        ))
    }

    async fn insert_item(&self, fields: InventoryItemFields) -> AppResult<InventoryItem> {
        let mut db = self.inner.write().await;
        db.check_item_refs(&fields)?;
        let item = InventoryItem::new(Uuid::new_v4(), fields);
        db.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn replace_item(
        &self,
        id: Uuid,
        fields: InventoryItemFields,
    ) -> AppResult<Option<InventoryItem>> {
        let mut db = self.inner.write().await;
        if !db.items.contains_key(&id) {
            return Ok(None);
        }
        db.check_item_refs(&fields)?;
        let item = InventoryItem::new(id, fields);
        db.items.insert(id, item.clone());
        Ok(Some(item))
    }

    async fn delete_item(&self, id: Uuid) -> AppResult<Removal> {
        let mut db = self.inner.write().await;
        Ok(match db.items.shift_remove(&id) {
            Some(_) => Removal::Deleted,
            None => Removal::Missing,
        })
    }

    async fn count_items(&self, status: Option<InventoryStatus>) -> AppResult<i64> {
        let db = self.inner.read().await;
        let count = db
            .items
            .values()
            .filter(|i| status.map_or(true, |s| i.status == s))
            .count();
        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn author(first: &str, family: &str) -> AuthorFields {
        AuthorFields {
            first_name: first.into(),
            family_name: family.into(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    async fn book_by(store: &MemoryStore, author_id: Uuid, title: &str) -> Book {
        store
            .insert_book(BookFields {
                title: title.into(),
                author_id,
                summary: "s".into(),
                isbn: "i".into(),
                genre_ids: vec![],
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_author_insert_is_case_insensitive() {
        let store = MemoryStore::new();
        let first = store.insert_author(author("Jane", "Austen")).await.unwrap();
        let second = store.insert_author(author("JANE", "austen")).await.unwrap();
        assert!(matches!(first, Insertion::Created(_)));
        assert_eq!(second, Insertion::Existing(first.record().clone()));
        assert_eq!(store.count_authors().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_authors_sorted_by_family_name() {
        let store = MemoryStore::new();
        for (first, family) in [("Leo", "Tolstoy"), ("Jane", "Austen"), ("Isaac", "Asimov")] {
            store.insert_author(author(first, family)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(names, vec!["Asimov", "Austen", "Tolstoy"]);
    }

    #[tokio::test]
    async fn test_replace_author_rejects_name_clash() {
        let store = MemoryStore::new();
        let austen = store.insert_author(author("Jane", "Austen")).await.unwrap();
        let bronte = store.insert_author(author("Emily", "Bronte")).await.unwrap();
        let result = store
            .replace_author(bronte.record().id, author("jane", "AUSTEN"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // same record may keep its own name with a different case
        let kept = store
            .replace_author(austen.record().id, author("JANE", "Austen"))
            .await
            .unwrap();
        assert_eq!(kept.unwrap().first_name, "JANE");
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let store = MemoryStore::new();
        let author_id = store.insert_author(author("A", "B")).await.unwrap().record().id;
        let book = book_by(&store, author_id, "T").await;
        store
            .insert_item(InventoryItemFields {
                book_id: book.id,
                imprint: "x".into(),
                status: InventoryStatus::Available,
                due_back: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(store.delete_author(author_id).await.unwrap(), Removal::InUse);
        assert_eq!(store.delete_book(book.id).await.unwrap(), Removal::InUse);
        assert_eq!(store.delete_author(Uuid::new_v4()).await.unwrap(), Removal::Missing);
        assert_eq!(store.count_items(Some(InventoryStatus::Available)).await.unwrap(), 1);
        assert_eq!(store.count_items(Some(InventoryStatus::Loaned)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_book_requires_existing_author() {
        let store = MemoryStore::new();
        let result = store
            .insert_book(BookFields {
                title: "Orphan".into(),
                author_id: Uuid::new_v4(),
                summary: "s".into(),
                isbn: "i".into(),
                genre_ids: vec![],
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
