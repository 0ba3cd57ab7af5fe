//! Book management service, including the catalog home counts

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use super::{Deletion, Submission};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, Book, BookDetail, BookFields, BookForm, BookListing, CatalogCounts, Genre,
        InventoryItem, InventoryStatus,
    },
    repository::{CatalogStore, Removal},
};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn CatalogStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Counts for the catalog home page, fetched concurrently
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let (books, copies, copies_available, authors, genres) = tokio::try_join!(
            self.store.count_books(),
            self.store.count_items(None),
            self.store.count_items(Some(InventoryStatus::Available)),
            self.store.count_authors(),
            self.store.count_genres(),
        )?;
        Ok(CatalogCounts {
            books,
            copies,
            copies_available,
            authors,
            genres,
        })
    }

    /// All books sorted by title with their authors resolved
    pub async fn list(&self) -> AppResult<Vec<BookListing>> {
        let (books, authors) = tokio::try_join!(self.store.list_books(), self.store.list_authors())?;
        let authors: HashMap<Uuid, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
        Ok(books
            .into_iter()
            .map(|book| BookListing {
                author: authors.get(&book.author_id).cloned(),
                book,
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.store
            .get_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Book with author and genres resolved, plus its copies
    pub async fn detail(&self, id: Uuid) -> AppResult<(BookDetail, Vec<InventoryItem>)> {
        let book = self.get(id).await?;
        let (author, genres, copies) = tokio::try_join!(
            self.store.get_author(book.author_id),
            self.store.list_genres(),
            self.store.items_for_book(id),
        )?;
        let genres = genres
            .into_iter()
            .filter(|g| book.genre_ids.contains(&g.id))
            .collect();
        Ok((
            BookDetail {
                book,
                author,
                genres,
            },
            copies,
        ))
    }

    /// Authors (by family name) and genres (by name) offered on the book form
    pub async fn form_options(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.store.list_authors(), self.store.list_genres())
    }

    /// Book to edit together with the form options
    pub async fn edit(&self, id: Uuid) -> AppResult<(Book, Vec<Author>, Vec<Genre>)> {
        let (book, authors, genres) = tokio::try_join!(
            self.store.get_book(id),
            self.store.list_authors(),
            self.store.list_genres(),
        )?;
        let book = book.ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        Ok((book, authors, genres))
    }

    pub async fn create(&self, mut form: BookForm) -> AppResult<Submission<Book, BookForm>> {
        let fields = match self.checked(&mut form).await? {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.insert_book(fields).await {
            Ok(book) => {
                tracing::info!(id = %book.id, title = %book.title, "Book created");
                Ok(Submission::Saved(book))
            }
            Err(AppError::Conflict(msg)) => Ok(Submission::rejected(form, vec![msg])),
            Err(e) => Err(e),
        }
    }

    /// Replace every field of a book, including its full genre list
    pub async fn update(&self, id: Uuid, mut form: BookForm) -> AppResult<Submission<Book, BookForm>> {
        self.get(id).await?;
        let fields = match self.checked(&mut form).await? {
            Ok(fields) => fields,
            Err(errors) => return Ok(Submission::rejected(form, errors)),
        };

        match self.store.replace_book(id, fields).await {
            Ok(Some(book)) => {
                tracing::info!(id = %book.id, "Book updated");
                Ok(Submission::Saved(book))
            }
            Ok(None) => Err(AppError::NotFound("Book not found".to_string())),
            Err(AppError::Conflict(msg)) => Ok(Submission::rejected(form, vec![msg])),
            Err(e) => Err(e),
        }
    }

    /// Validate the form and check that its author and genres exist
    async fn checked(&self, form: &mut BookForm) -> AppResult<Result<BookFields, Vec<String>>> {
        let fields = match form.checked() {
            Ok(fields) => fields,
            Err(errors) => return Ok(Err(errors)),
        };

        let (author, genres) = tokio::try_join!(
            self.store.get_author(fields.author_id),
            self.store.list_genres(),
        )?;
        let mut errors = Vec::new();
        if author.is_none() {
            errors.push("Author not found".to_string());
        }
        if fields
            .genre_ids
            .iter()
            .any(|id| !genres.iter().any(|g| g.id == *id))
        {
            errors.push("Genre not found".to_string());
        }
        Ok(if errors.is_empty() { Ok(fields) } else { Err(errors) })
    }

    /// Book and the copies blocking its deletion, or `None` if it is gone
    pub async fn delete_preview(&self, id: Uuid) -> AppResult<Option<(Book, Vec<InventoryItem>)>> {
        let (book, copies) =
            tokio::try_join!(self.store.get_book(id), self.store.items_for_book(id))?;
        Ok(book.map(|b| (b, copies)))
    }

    /// Delete a book that has no copies in the inventory
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<(Book, Vec<InventoryItem>)>> {
        match self.store.delete_book(id).await? {
            Removal::Deleted => {
                tracing::info!(%id, "Book deleted");
                Ok(Deletion::Deleted)
            }
            Removal::Missing => Ok(Deletion::Missing),
            Removal::InUse => {
                tracing::info!(%id, "Book still has copies, not deleting");
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
    use crate::models::{AuthorFields, InventoryItemFields};
    use crate::repository::MemoryStore;
    use crate::validation::Selection;
    use chrono::Utc;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: BookService,
        author: Author,
        genres: Vec<Genre>,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .insert_author(AuthorFields {
                first_name: "Ursula".into(),
                family_name: "Le Guin".into(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap()
            .record()
            .clone();
        let mut genres = Vec::new();
        for name in ["Fantasy", "Science Fiction", "Children"] {
            genres.push(store.insert_genre(name.into()).await.unwrap().record().clone());
        }
        Fixture {
            service: BookService::new(store.clone()),
            store,
            author,
            genres,
        }
    }

    fn form(author: &Author, genre: Selection) -> BookForm {
        BookForm {
            title: "A Wizard of Earthsea".into(),
            author: author.id.to_string(),
            summary: "Ged learns the true names of things".into(),
            isbn: "9780547773742".into(),
            genre,
        }
    }

    #[tokio::test]
    async fn test_update_replaces_genre_set() {
        let f = fixture().await;
        let all: Vec<String> = f.genres.iter().map(|g| g.id.to_string()).collect();
        let Submission::Saved(book) = f
            .service
            .create(form(&f.author, Selection::Many(all)))
            .await
            .unwrap()
        else {
            panic!("book not saved");
        };
        assert_eq!(book.genre_ids.len(), 3);

        let only = f.genres[1].id;
        f.service
            .update(book.id, form(&f.author, Selection::One(only.to_string())))
            .await
            .unwrap();
        let (detail, _) = f.service.detail(book.id).await.unwrap();
        assert_eq!(detail.genres.iter().map(|g| g.id).collect::<Vec<_>>(), vec![only]);
    }

    #[tokio::test]
    async fn test_unknown_author_rejected() {
        let f = fixture().await;
        let mut stranger = f.author.clone();
        stranger.id = Uuid::new_v4();
        match f.service.create(form(&stranger, Selection::Empty)).await.unwrap() {
            Submission::Rejected { errors, .. } => assert_eq!(errors, vec!["Author not found"]),
            other => panic!("expected Rejected, got {:?}", other),
        }
        assert_eq!(f.store.count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counts_and_delete_guard() {
        let f = fixture().await;
        let Submission::Saved(book) = f
            .service
            .create(form(&f.author, Selection::Empty))
            .await
            .unwrap()
        else {
            panic!("book not saved");
        };
        for status in [InventoryStatus::Available, InventoryStatus::Loaned] {
            f.store
                .insert_item(InventoryItemFields {
                    book_id: book.id,
                    imprint: "Parnassus, 1968".into(),
                    status,
                    due_back: Utc::now(),
                })
                .await
                .unwrap();
        }

        let counts = f.service.counts().await.unwrap();
        assert_eq!(
            counts,
            CatalogCounts {
                books: 1,
                copies: 2,
                copies_available: 1,
                authors: 1,
                genres: 3,
            }
        );

        match f.service.delete(book.id).await.unwrap() {
            Deletion::Blocked((_, copies)) => assert_eq!(copies.len(), 2),
            other => panic!("expected Blocked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_resolves_authors() {
        let f = fixture().await;
        f.service
            .create(form(&f.author, Selection::Empty))
            .await
            .unwrap();
        let listing = f.service.list().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].author.as_ref().map(|a| a.name()), Some("Le Guin, Ursula".into()));
    }
}
