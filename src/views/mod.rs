//! Server-rendered HTML pages.
//!
//! Every page is a pure function of its data, written with `maud::html!`.
//! Interpolated values are escaped by maud, so stored text is rendered
//! exactly as typed.

pub mod authors;
pub mod books;
pub mod genres;
pub mod home;
pub mod inventory;

use maud::{html, Markup, DOCTYPE};

use crate::models::Book;

const NAV: &[(&str, &str)] = &[
    ("/catalog", "Home"),
    ("/catalog/books", "All books"),
    ("/catalog/authors", "All authors"),
    ("/catalog/genres", "All genres"),
    ("/catalog/bookinstances", "All book-instances"),
    ("/catalog/author/create", "Create new author"),
    ("/catalog/genre/create", "Create new genre"),
    ("/catalog/book/create", "Create new book"),
    ("/catalog/bookinstance/create", "Create new book instance (copy)"),
];

/// Wrap a page body in the site layout
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                nav {
                    ul {
                        @for (href, label) in NAV {
                            li { a href=(href) { (label) } }
                        }
                    }
                }
                main {
                    h1 { (title) }
                    (body)
                }
            }
        }
    }
}

/// Validation messages under a form; nothing when there are none
pub fn error_list(errors: &[String]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors {
                    li { (error) }
                }
            }
        }
    }
}

pub fn text_input(label: &str, name: &str, value: &str, placeholder: &str) -> Markup {
    html! {
        div.form-group {
            label for=(name) { (label) ":" }
            input id=(name) type="text" name=(name) placeholder=(placeholder) value=(value) required;
        }
    }
}

pub fn date_input(label: &str, name: &str, value: &str) -> Markup {
    html! {
        div.form-group {
            label for=(name) { (label) ":" }
            input id=(name) type="date" name=(name) value=(value);
        }
    }
}

/// Confirmation form posting back to the delete URL
pub fn confirm_delete(action: &str, question: &str) -> Markup {
    html! {
        p { (question) }
        form method="POST" action=(action) {
            button type="submit" { "Delete" }
        }
    }
}

/// Books with their summaries, as listed under an author or a genre
pub fn book_list(books: &[Book]) -> Markup {
    html! {
        dl {
            @for book in books {
                dt { a href=(book.url()) { (book.title) } }
                dd { (book.summary) }
            }
        }
    }
}

/// Generic error page. `detail` is only passed in development.
pub fn error_page(message: &str, status: u16, detail: Option<&str>) -> Markup {
    page(
        "Error",
        html! {
            p { (message) }
            p { "Status " (status) }
            @if let Some(detail) = detail {
                pre { (detail) }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let html = page("<script>alert(\"x & y\")</script>", html! {}).into_string();
        assert!(html.contains("&lt;script&gt;alert(&quot;x &amp; y&quot;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_error_list() {
        assert_eq!(error_list(&[]).into_string(), "");
        let html = error_list(&["Title must not be empty".to_string()]).into_string();
        assert!(html.contains("<li>Title must not be empty</li>"));
    }

    #[test]
    fn test_book_list_links_titles() {
        let book = Book {
            id: uuid::Uuid::new_v4(),
            title: "Gormenghast".into(),
            author_id: uuid::Uuid::new_v4(),
            summary: "Castle & Groans".into(),
            isbn: "x".into(),
            genre_ids: vec![],
        };
        let html = book_list(&[book.clone()]).into_string();
        assert!(html.contains(&format!("<a href=\"{}\">Gormenghast</a>", book.url())));
        assert!(html.contains("<dd>Castle &amp; Groans</dd>"));
    }

    #[test]
    fn test_error_page_hides_detail() {
        let hidden = error_page("Internal server error", 500, None).into_string();
        assert!(!hidden.contains("<pre>"));
        let shown = error_page("Internal server error", 500, Some("pool closed")).into_string();
        assert!(shown.contains("<pre>pool closed</pre>"));
    }
}
