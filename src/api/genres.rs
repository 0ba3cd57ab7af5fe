//! Genre pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::{record_id, see_other};
use crate::{
    error::AppResult,
    models::{Genre, GenreForm},
    services::{Deletion, Submission},
    views, AppState,
};

const LIST_URL: &str = "/catalog/genres";

fn respond(title: &str, outcome: Submission<Genre, GenreForm>) -> Response {
    match outcome {
        Submission::Saved(genre) | Submission::Duplicate(genre) => see_other(&genre.url()),
        Submission::Rejected { form, errors } => {
            views::genres::form(title, &form, &errors).into_response()
        }
    }
}

pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let genres = state.services.genres.list().await?;
    Ok(views::genres::list(&genres))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Genre")?;
    let (genre, books) = state.services.genres.detail(id).await?;
    Ok(views::genres::detail(&genre, &books))
}

pub async fn create_form() -> Markup {
    views::genres::form("Create Genre", &GenreForm::default(), &[])
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let outcome = state.services.genres.create(form).await?;
    Ok(respond("Create Genre", outcome))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Genre") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.genres.delete_preview(id).await? {
        Some((genre, books)) => views::genres::delete(&genre, &books).into_response(),
        None => see_other(LIST_URL),
    })
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Genre") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.genres.delete(id).await? {
        Deletion::Deleted | Deletion::Missing => see_other(LIST_URL),
        Deletion::Blocked((genre, books)) => views::genres::delete(&genre, &books).into_response(),
    })
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Genre")?;
    let genre = state.services.genres.get(id).await?;
    Ok(views::genres::form("Update Genre", &GenreForm::from(&genre), &[]))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<GenreForm>,
) -> AppResult<Response> {
    let id = record_id(&id, "Genre")?;
    let outcome = state.services.genres.update(id, form).await?;
    Ok(respond("Update Genre", outcome))
}
