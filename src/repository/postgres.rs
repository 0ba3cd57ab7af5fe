//! PostgreSQL record store.
//!
//! Case-insensitive uniqueness is enforced by expression indexes on
//! `lower(...)`; author and book references are foreign keys with
//! `ON DELETE RESTRICT`. Genre references live in a `uuid[]` column and are
//! guarded inside the delete statement itself.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{CatalogStore, Insertion, Removal};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorFields, Book, BookFields, Genre, InventoryItem, InventoryItemFields,
        InventoryStatus,
    },
};

const AUTHOR_COLUMNS: &str = "id, first_name, family_name, date_of_birth, date_of_death";
const BOOK_COLUMNS: &str = "id, title, author_id, summary, isbn, genre_ids";
const ITEM_COLUMNS: &str = "id, book_id, imprint, status, due_back";

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map constraint violations on writes to domain errors
fn write_error(err: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return AppError::Conflict(format!("{} already exists", what));
        }
        if db.is_foreign_key_violation() {
            return AppError::Conflict(format!("{} references a missing record", what));
        }
    }
    AppError::Database(err)
}

/// Run a delete, treating a foreign key violation as "still referenced"
async fn guarded_delete(pool: &Pool<Postgres>, sql: &str, id: Uuid) -> AppResult<Removal> {
    match sqlx::query(sql).bind(id).execute(pool).await {
        Ok(result) if result.rows_affected() == 0 => Ok(Removal::Missing),
        Ok(_) => Ok(Removal::Deleted),
        Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Ok(Removal::InUse),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY family_name, first_name",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_author(&self, fields: AuthorFields) -> AppResult<Insertion<Author>> {
        let created = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(author) = created {
            return Ok(Insertion::Created(author));
        }

        sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE lower(first_name) = lower($1) AND lower(family_name) = lower($2)",
            AUTHOR_COLUMNS
        ))
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .fetch_optional(&self.pool)
        .await?
        .map(Insertion::Existing)
        .ok_or_else(|| AppError::Internal("Author insert conflicted without a match".to_string()))
    }

    async fn replace_author(&self, id: Uuid, fields: AuthorFields) -> AppResult<Option<Author>> {
        sqlx::query_as::<_, Author>(&format!(
            r#"
            UPDATE authors
            SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Author"))
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<Removal> {
        guarded_delete(&self.pool, "DELETE FROM authors WHERE id = $1", id).await
    }

    async fn count_authors(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_genre(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_genre(&self, name: String) -> AppResult<Insertion<Genre>> {
        let created = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(&name)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(genre) = created {
            return Ok(Insertion::Created(genre));
        }

        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE lower(name) = lower($1)")
            .bind(&name)
            .fetch_optional(&self.pool)
            .await?
            .map(Insertion::Existing)
            .ok_or_else(|| AppError::Internal("Genre insert conflicted without a match".to_string()))
    }

    async fn replace_genre(&self, id: Uuid, name: String) -> AppResult<Option<Genre>> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, "Genre"))
    }

    async fn delete_genre(&self, id: Uuid) -> AppResult<Removal> {
        let result = sqlx::query(
            r#"
            DELETE FROM genres
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM books WHERE $1 = ANY(genre_ids))
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(Removal::Deleted);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM genres WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists { Removal::InUse } else { Removal::Missing })
    }

    async fn count_genres(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY title",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn books_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE $1 = ANY(genre_ids) ORDER BY title",
            BOOK_COLUMNS
        ))
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_book(&self, fields: BookFields) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author_id, summary, isbn, genre_ids)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(fields.author_id)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .bind(&fields.genre_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Book"))
    }

    async fn replace_book(&self, id: Uuid, fields: BookFields) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5, genre_ids = $6
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(fields.author_id)
        .bind(&fields.summary)
        .bind(&fields.isbn)
        .bind(&fields.genre_ids)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Book"))
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<Removal> {
        guarded_delete(&self.pool, "DELETE FROM books WHERE id = $1", id).await
    }

    async fn count_books(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // INVENTORY
    // =========================================================================

    async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items ORDER BY due_back",
            ITEM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn items_for_book(&self, book_id: Uuid) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {} FROM inventory_items WHERE book_id = $1 ORDER BY due_back",
            ITEM_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_item(&self, fields: InventoryItemFields) -> AppResult<InventoryItem> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            INSERT INTO inventory_items (id, book_id, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(fields.book_id)
        .bind(&fields.imprint)
        .bind(fields.status)
        .bind(fields.due_back)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Inventory item"))
    }

    async fn replace_item(
        &self,
        id: Uuid,
        fields: InventoryItemFields,
    ) -> AppResult<Option<InventoryItem>> {
        sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            UPDATE inventory_items
            SET book_id = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        ))
        .bind(id)
        .bind(fields.book_id)
        .bind(&fields.imprint)
        .bind(fields.status)
        .bind(fields.due_back)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Inventory item"))
    }

    async fn delete_item(&self, id: Uuid) -> AppResult<Removal> {
        guarded_delete(&self.pool, "DELETE FROM inventory_items WHERE id = $1", id).await
    }

    async fn count_items(&self, status: Option<InventoryStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_items WHERE ($1::inventory_status IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
