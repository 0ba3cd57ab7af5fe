//! Book pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::{record_id, see_other};
use crate::{
    error::AppResult,
    models::{Book, BookForm},
    services::{Deletion, Submission},
    views, AppState,
};

const LIST_URL: &str = "/catalog/books";

/// Redirect on success; a rejected form is shown again with fresh choices
async fn respond(
    state: &AppState,
    title: &str,
    outcome: Submission<Book, BookForm>,
) -> AppResult<Response> {
    match outcome {
        Submission::Saved(book) | Submission::Duplicate(book) => Ok(see_other(&book.url())),
        Submission::Rejected { form, errors } => {
            let (authors, genres) = state.services.books.form_options().await?;
            Ok(views::books::form(title, &form, &authors, &genres, &errors).into_response())
        }
    }
}

/// List all books with their authors
pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let books = state.services.books.list().await?;
    Ok(views::books::list(&books))
}

/// Book details with author, genres and copies
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Book")?;
    let (detail, copies) = state.services.books.detail(id).await?;
    Ok(views::books::detail(&detail, &copies))
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Markup> {
    let (authors, genres) = state.services.books.form_options().await?;
    Ok(views::books::form(
        "Create Book",
        &BookForm::default(),
        &authors,
        &genres,
        &[],
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let outcome = state.services.books.create(form).await?;
    respond(&state, "Create Book", outcome).await
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Book") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.books.delete_preview(id).await? {
        Some((book, copies)) => views::books::delete(&book, &copies).into_response(),
        None => see_other(LIST_URL),
    })
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Book") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.books.delete(id).await? {
        Deletion::Deleted | Deletion::Missing => see_other(LIST_URL),
        Deletion::Blocked((book, copies)) => views::books::delete(&book, &copies).into_response(),
    })
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Book")?;
    let (book, authors, genres) = state.services.books.edit(id).await?;
    Ok(views::books::form(
        "Update Book",
        &BookForm::from(&book),
        &authors,
        &genres,
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> AppResult<Response> {
    let id = record_id(&id, "Book")?;
    let outcome = state.services.books.update(id, form).await?;
    respond(&state, "Update Book", outcome).await
}
