//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{Author, Genre};
use crate::validation::{self, Checked, FormFields, Selection};

/// Book record as stored; author and genres are references by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<Uuid>,
}

/// Book fields as written by create and update (full replace)
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author_id: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre_ids: Vec<Uuid>,
}

impl Book {
    pub fn new(id: Uuid, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author_id: fields.author_id,
            summary: fields.summary,
            isbn: fields.isbn,
            genre_ids: fields.genre_ids,
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Book with its author reference resolved, for list pages
#[derive(Debug, Clone)]
pub struct BookListing {
    pub book: Book,
    /// `None` when the reference dangles
    pub author: Option<Author>,
}

/// Book with author and genre references resolved, for the detail page
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
}

/// Book create/update form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(
        length(min = 1, message = "Author must not be empty"),
        custom(function = "author_reference")
    )]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty"))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty"))]
    pub isbn: String,
    #[validate(custom(function = "genre_references"))]
    pub genre: Selection,
}

fn author_reference(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && validation::parse_id(value).is_none() {
        return Err(validation::rule("reference", "Author not found"));
    }
    Ok(())
}

fn genre_references(value: &Selection) -> Result<(), ValidationError> {
    value
        .ids()
        .map(|_| ())
        .map_err(|_| validation::rule("reference", "Invalid genre"))
}

impl FormFields for BookForm {
    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn normalize(&mut self) {
        validation::trim_in_place(&mut self.title);
        validation::trim_in_place(&mut self.author);
        validation::trim_in_place(&mut self.summary);
        validation::trim_in_place(&mut self.isbn);
        self.genre.normalize();
    }
}

impl BookForm {
    /// Validate the submission and convert it to storable fields.
    /// Whether the references resolve is checked by the service.
    pub fn checked(&mut self) -> Checked<BookFields> {
        let errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }
        let author_id = validation::parse_id(&self.author)
            .ok_or_else(|| vec!["Author not found".to_string()])?;
        let genre_ids = self
            .genre
            .ids()
            .map_err(|_| vec!["Invalid genre".to_string()])?;
        Ok(BookFields {
            title: self.title.clone(),
            author_id,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre_ids,
        })
    }

    /// Author id as submitted, if it parses
    pub fn author_id(&self) -> Option<Uuid> {
        validation::parse_id(&self.author)
    }

    /// Genre ids as submitted, skipping values that do not parse
    pub fn genre_ids(&self) -> Vec<Uuid> {
        self.genre
            .values()
            .into_iter()
            .filter_map(validation::parse_id)
            .collect()
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author_id.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: Selection::from(book.genre_ids.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> BookForm {
        BookForm {
            title: "The Hobbit".into(),
            author: Uuid::new_v4().to_string(),
            summary: "There and back again".into(),
            isbn: "9780261102217".into(),
            genre: Selection::Empty,
        }
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut form = BookForm {
            title: "  ".into(),
            ..filled()
        };
        assert_eq!(form.checked().unwrap_err(), vec!["Title must not be empty"]);
        // other fields are kept for the re-rendered form
        assert_eq!(form.summary, "There and back again");
    }

    #[test]
    fn test_genre_selection_normalized() {
        let a = Uuid::new_v4();
        let mut form = BookForm {
            genre: Selection::One(format!(" {} ", a)),
            ..filled()
        };
        assert_eq!(form.checked().unwrap().genre_ids, vec![a]);

        let mut form = filled();
        assert!(form.checked().unwrap().genre_ids.is_empty());
    }

    #[test]
    fn test_bad_references() {
        let mut form = BookForm {
            author: "not-an-id".into(),
            genre: Selection::Many(vec![Uuid::new_v4().to_string(), "x".into()]),
            ..filled()
        };
        assert_eq!(
            form.checked().unwrap_err(),
            vec!["Author not found", "Invalid genre"]
        );
    }

    #[test]
    fn test_missing_everything() {
        let mut form = BookForm::default();
        assert_eq!(
            form.checked().unwrap_err(),
            vec![
                "Title must not be empty",
                "Author must not be empty",
                "Summary must not be empty",
                "ISBN must not be empty",
            ]
        );
    }
}
