//! Genre pages

use maud::{html, Markup};

use super::{book_list, confirm_delete, error_list, page, text_input};
use crate::models::{Book, Genre, GenreForm};

pub fn list(genres: &[Genre]) -> Markup {
    page(
        "Genres",
        html! {
            @if genres.is_empty() {
                p { "There are no genres." }
            } @else {
                ul {
                    @for genre in genres {
                        li { a href=(genre.url()) { (genre.name) } }
                    }
                }
            }
        },
    )
}

pub fn detail(genre: &Genre, books: &[Book]) -> Markup {
    let url = genre.url();
    page(
        &format!("Genre: {}", genre.name),
        html! {
            h3 { "Books" }
            @if books.is_empty() {
                p { "This genre has no books." }
            } @else {
                (book_list(books))
            }
            hr;
            p { a href={ (url) "/delete" } { "Delete genre" } }
            p { a href={ (url) "/update" } { "Update genre" } }
        },
    )
}

pub fn form(title: &str, form: &GenreForm, errors: &[String]) -> Markup {
    page(
        title,
        html! {
            form method="POST" {
                (text_input("Genre", "name", &form.name, "Fantasy, Poetry etc."))
                button type="submit" { "Submit" }
            }
            (error_list(errors))
        },
    )
}

pub fn delete(genre: &Genre, books: &[Book]) -> Markup {
    page(
        "Delete Genre",
        html! {
            h2 { (genre.name) }
            @if books.is_empty() {
                (confirm_delete(
                    &format!("{}/delete", genre.url()),
                    "Do you really want to delete this genre?",
                ))
            } @else {
                p { strong { "Delete the following books before attempting to delete this genre." } }
                (book_list(books))
            }
        },
    )
}
