//! Author pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::{record_id, see_other};
use crate::{
    error::AppResult,
    models::{Author, AuthorForm},
    services::{Deletion, Submission},
    views, AppState,
};

const LIST_URL: &str = "/catalog/authors";

fn respond(title: &str, outcome: Submission<Author, AuthorForm>) -> Response {
    match outcome {
        Submission::Saved(author) | Submission::Duplicate(author) => see_other(&author.url()),
        Submission::Rejected { form, errors } => {
            views::authors::form(title, &form, &errors).into_response()
        }
    }
}

/// List all authors
pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let authors = state.services.authors.list().await?;
    Ok(views::authors::list(&authors))
}

/// Author details with their books
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Author")?;
    let (author, books) = state.services.authors.detail(id).await?;
    Ok(views::authors::detail(&author, &books))
}

pub async fn create_form() -> Markup {
    views::authors::form("Create Author", &AuthorForm::default(), &[])
}

/// Create an author, or redirect to the existing one with the same name
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create(form).await?;
    Ok(respond("Create Author", outcome))
}

/// Delete confirmation; an author that is already gone sends the browser
/// back to the list
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Author") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.authors.delete_preview(id).await? {
        Some((author, books)) => views::authors::delete(&author, &books).into_response(),
        None => see_other(LIST_URL),
    })
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Author") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.authors.delete(id).await? {
        Deletion::Deleted | Deletion::Missing => see_other(LIST_URL),
        Deletion::Blocked((author, books)) => {
            views::authors::delete(&author, &books).into_response()
        }
    })
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Author")?;
    let author = state.services.authors.get(id).await?;
    Ok(views::authors::form(
        "Update Author",
        &AuthorForm::from(&author),
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    let id = record_id(&id, "Author")?;
    let outcome = state.services.authors.update(id, form).await?;
    Ok(respond("Update Author", outcome))
}
