//! Book pages

use maud::{html, Markup};

use super::{confirm_delete, error_list, page, text_input};
use crate::models::{
    Author, Book, BookDetail, BookForm, BookListing, Genre, InventoryItem, InventoryStatus,
};

const UNKNOWN_AUTHOR: &str = "Unknown author";

pub fn list(books: &[BookListing]) -> Markup {
    page(
        "Books",
        html! {
            @if books.is_empty() {
                p { "There are no books." }
            } @else {
                ul {
                    @for listing in books {
                        li {
                            a href=(listing.book.url()) { (listing.book.title) }
                            " ("
                            @match &listing.author {
                                Some(author) => { (author.name()) }
                                None => { (UNKNOWN_AUTHOR) }
                            }
                            ")"
                        }
                    }
                }
            }
        },
    )
}

/// One copy as shown under a book
fn copy_entry(copy: &InventoryItem) -> Markup {
    html! {
        div.copy {
            p class={ "status-" (copy.status.as_str().to_lowercase()) } { (copy.status.as_str()) }
            p { strong { "Imprint:" } " " (copy.imprint) }
            @if copy.status != InventoryStatus::Available {
                p { strong { "Due back:" } " " (copy.due_back_formatted()) }
            }
            p { strong { "Id:" } " " a href=(copy.url()) { (copy.id.to_string()) } }
        }
    }
}

pub fn detail(detail: &BookDetail, copies: &[InventoryItem]) -> Markup {
    let book = &detail.book;
    let url = book.url();
    page(
        "Book Details",
        html! {
            h2 { (book.title) }
            p {
                strong { "Author:" } " "
                @match &detail.author {
                    Some(author) => { a href=(author.url()) { (author.name()) } }
                    None => { (UNKNOWN_AUTHOR) }
                }
            }
            p { strong { "Summary:" } " " (book.summary) }
            p { strong { "ISBN:" } " " (book.isbn) }
            p {
                strong { "Genre:" } " "
                @for (i, genre) in detail.genres.iter().enumerate() {
                    @if i > 0 { ", " }
                    a href=(genre.url()) { (genre.name) }
                }
            }
            h3 { "Copies" }
            @if copies.is_empty() {
                p { "There are no copies of this book in the library." }
            } @else {
                @for copy in copies {
                    (copy_entry(copy))
                }
            }
            hr;
            p { a href={ (url) "/delete" } { "Delete book" } }
            p { a href={ (url) "/update" } { "Update book" } }
        },
    )
}

/// Create/update form with author and genre choices pre-marked from `form`
pub fn form(
    title: &str,
    form: &BookForm,
    authors: &[Author],
    genres: &[Genre],
    errors: &[String],
) -> Markup {
    let checked = form.genre_ids();
    page(
        title,
        html! {
            form method="POST" {
                (text_input("Title", "title", &form.title, "Name of book"))
                div.form-group {
                    label for="author" { "Author:" }
                    select id="author" name="author" required {
                        option value="" { "--Please select an author--" }
                        @for author in authors {
                            @let id = author.id.to_string();
                            option value=(id) selected[id == form.author] { (author.name()) }
                        }
                    }
                }
                div.form-group {
                    label for="summary" { "Summary:" }
                    textarea id="summary" name="summary" required { (form.summary) }
                }
                (text_input("ISBN", "isbn", &form.isbn, "ISBN13"))
                div.form-group {
                    label { "Genre:" }
                    @for genre in genres {
                        label {
                            input type="checkbox" name="genre" value=(genre.id.to_string()) checked[checked.contains(&genre.id)];
                            " " (genre.name)
                        }
                    }
                }
                button type="submit" { "Submit" }
            }
            (error_list(errors))
        },
    )
}

pub fn delete(book: &Book, copies: &[InventoryItem]) -> Markup {
    page(
        "Delete Book",
        html! {
            h2 { (book.title) }
            p { (book.summary) }
            @if copies.is_empty() {
                (confirm_delete(
                    &format!("{}/delete", book.url()),
                    "Do you really want to delete this book?",
                ))
            } @else {
                p { strong { "Delete the following copies before attempting to delete this book." } }
                @for copy in copies {
                    (copy_entry(copy))
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Selection;
    use uuid::Uuid;

    #[test]
    fn test_form_marks_selected_author_and_genres() {
        let author = Author {
            id: Uuid::new_v4(),
            first_name: "Italo".into(),
            family_name: "Calvino".into(),
            date_of_birth: None,
            date_of_death: None,
        };
        let chosen = Genre { id: Uuid::new_v4(), name: "Fable".into() };
        let other = Genre { id: Uuid::new_v4(), name: "Poetry".into() };
        let submitted = BookForm {
            title: "<Invisible Cities>".into(),
            author: author.id.to_string(),
            genre: Selection::One(chosen.id.to_string()),
            ..BookForm::default()
        };
        let html = form(
            "Create Book",
            &submitted,
            &[author.clone()],
            &[chosen.clone(), other.clone()],
            &["Summary must not be empty".to_string()],
        )
        .into_string();
        assert!(html.contains(&format!("value=\"{}\" selected>Calvino, Italo", author.id)));
        assert!(html.contains(&format!("value=\"{}\" checked> Fable", chosen.id)));
        assert!(html.contains(&format!("value=\"{}\"> Poetry", other.id)));
        assert!(html.contains("&lt;Invisible Cities&gt;"));
        assert!(html.contains("<li>Summary must not be empty</li>"));
    }
}
