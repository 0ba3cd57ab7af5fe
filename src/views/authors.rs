//! Author pages

use maud::{html, Markup};

use super::{book_list, confirm_delete, date_input, error_list, page, text_input};
use crate::models::{Author, AuthorForm, Book};

pub fn list(authors: &[Author]) -> Markup {
    page(
        "Authors",
        html! {
            @if authors.is_empty() {
                p { "There are no authors." }
            } @else {
                ul {
                    @for author in authors {
                        li {
                            a href=(author.url()) { (author.name()) }
                            " " (author.lifespan_short().unwrap_or_default())
                        }
                    }
                }
            }
        },
    )
}

pub fn detail(author: &Author, books: &[Book]) -> Markup {
    let url = author.url();
    page(
        "Author Details",
        html! {
            h2 { (author.name()) }
            p { (author.lifespan_long()) }
            h3 { "Books" }
            @if books.is_empty() {
                p { "This author has no books." }
            } @else {
                (book_list(books))
            }
            hr;
            p { a href={ (url) "/delete" } { "Delete author" } }
            p { a href={ (url) "/update" } { "Update author" } }
        },
    )
}

/// Create/update form; `title` tells which
pub fn form(title: &str, form: &AuthorForm, errors: &[String]) -> Markup {
    page(
        title,
        html! {
            form method="POST" {
                (text_input("First Name", "first_name", &form.first_name, "First name"))
                (text_input("Family Name", "family_name", &form.family_name, "Family name"))
                (date_input("Date of birth", "date_of_birth", &form.date_of_birth))
                (date_input("Date of death", "date_of_death", &form.date_of_death))
                button type="submit" { "Submit" }
            }
            (error_list(errors))
        },
    )
}

/// Delete confirmation, or the list of books that must go first
pub fn delete(author: &Author, books: &[Book]) -> Markup {
    page(
        "Delete Author",
        html! {
            h2 { (author.name()) }
            p { (author.lifespan_long()) }
            @if books.is_empty() {
                (confirm_delete(
                    &format!("{}/delete", author.url()),
                    "Do you really want to delete this author?",
                ))
            } @else {
                p { strong { "Delete the following books before attempting to delete this author." } }
                (book_list(books))
            }
        },
    )
}
