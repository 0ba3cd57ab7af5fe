//! Inventory (copy) pages

use maud::{html, Markup};

use super::{confirm_delete, date_input, error_list, page, text_input};
use crate::models::{Book, InventoryItem, InventoryItemForm, InventoryListing, InventoryStatus};

fn book_link(book: Option<&Book>) -> Markup {
    html! {
        @match book {
            Some(book) => { a href=(book.url()) { (book.title) } }
            None => { "Unknown book" }
        }
    }
}

fn status_span(item: &InventoryItem) -> Markup {
    html! {
        span class={ "status-" (item.status.as_str().to_lowercase()) } { (item.status.as_str()) }
    }
}

pub fn list(items: &[InventoryListing]) -> Markup {
    page(
        "Book Instance List",
        html! {
            @if items.is_empty() {
                p { "There are no book copies in this library." }
            } @else {
                ul {
                    @for listing in items {
                        li {
                            (book_link(listing.book.as_ref()))
                            " : "
                            a href=(listing.item.url()) { (listing.item.imprint) }
                            " - "
                            (status_span(&listing.item))
                            @if listing.item.status != InventoryStatus::Available {
                                " (Due: " (listing.item.due_back_formatted()) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

fn summary(listing: &InventoryListing) -> Markup {
    let item = &listing.item;
    html! {
        p { strong { "Title:" } " " (book_link(listing.book.as_ref())) }
        p { strong { "Imprint:" } " " (item.imprint) }
        p { strong { "Status:" } " " (status_span(item)) }
        @if item.status != InventoryStatus::Available {
            p { strong { "Due back:" } " " (item.due_back_formatted()) }
        }
    }
}

pub fn detail(listing: &InventoryListing) -> Markup {
    let url = listing.item.url();
    page(
        "Copy Details",
        html! {
            h2 { "ID: " (listing.item.id.to_string()) }
            (summary(listing))
            hr;
            p { a href={ (url) "/delete" } { "Delete copy" } }
            p { a href={ (url) "/update" } { "Update copy" } }
        },
    )
}

pub fn form(title: &str, form: &InventoryItemForm, books: &[Book], errors: &[String]) -> Markup {
    let selected_status = if form.status.is_empty() {
        InventoryStatus::default().as_str()
    } else {
        form.status.as_str()
    };
    page(
        title,
        html! {
            form method="POST" {
                div.form-group {
                    label for="book" { "Book:" }
                    select id="book" name="book" required {
                        option value="" { "--Please select a book--" }
                        @for book in books {
                            @let id = book.id.to_string();
                            option value=(id) selected[id == form.book] { (book.title) }
                        }
                    }
                }
                (text_input("Imprint", "imprint", &form.imprint, "Publisher and date information"))
                (date_input("Date when book available", "due_back", &form.due_back))
                div.form-group {
                    label for="status" { "Status:" }
                    select id="status" name="status" required {
                        @for status in InventoryStatus::ALL {
                            option value=(status.as_str()) selected[status.as_str() == selected_status] {
                                (status.as_str())
                            }
                        }
                    }
                }
                button type="submit" { "Submit" }
            }
            (error_list(errors))
        },
    )
}

pub fn delete(listing: &InventoryListing) -> Markup {
    page(
        "Delete Book Instance",
        html! {
            h2 { "ID: " (listing.item.id.to_string()) }
            (summary(listing))
            (confirm_delete(
                &format!("{}/delete", listing.item.url()),
                "Do you really want to delete this copy?",
            ))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn listing(status: InventoryStatus) -> InventoryListing {
        InventoryListing {
            item: InventoryItem {
                id: Uuid::new_v4(),
                book_id: Uuid::new_v4(),
                imprint: "Penguin & Sons".into(),
                status,
                due_back: Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
            },
            book: None,
        }
    }

    #[test]
    fn test_due_date_only_when_not_available() {
        let loaned = detail(&listing(InventoryStatus::Loaned)).into_string();
        assert!(loaned.contains("Oct 16, 2026"));
        assert!(loaned.contains("Penguin &amp; Sons"));
        assert!(loaned.contains("Unknown book"));

        let available = detail(&listing(InventoryStatus::Available)).into_string();
        assert!(!available.contains("Due back:"));
    }

    #[test]
    fn test_form_defaults_status_to_maintenance() {
        let html = form("Create BookInstance", &InventoryItemForm::default(), &[], &[]).into_string();
        assert!(html.contains("<option value=\"Maintenance\" selected>Maintenance</option>"));
        assert!(html.contains("<option value=\"Available\">Available</option>"));
    }
}
