//! Catalog home page

use maud::{html, Markup};

use super::page;
use crate::models::CatalogCounts;

pub fn index(counts: &CatalogCounts) -> Markup {
    let rows = [
        ("Books", counts.books),
        ("Copies", counts.copies),
        ("Copies available", counts.copies_available),
        ("Authors", counts.authors),
        ("Genres", counts.genres),
    ];
    page(
        "Local Library Home",
        html! {
            p { "Welcome to " em { "LocalLibrary" } "." }
            h2 { "Dynamic content" }
            p { "The library has the following record counts:" }
            ul {
                @for (label, count) in rows {
                    li { strong { (label) ":" } " " (count) }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_lists_counts() {
        let html = index(&CatalogCounts {
            books: 3,
            copies: 5,
            copies_available: 2,
            authors: 4,
            genres: 1,
        })
        .into_string();
        assert!(html.contains("<strong>Copies available:</strong> 2"));
        assert!(html.contains("<strong>Books:</strong> 3"));
    }
}
