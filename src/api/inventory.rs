//! Inventory (book copy) pages

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::Markup;

use super::{record_id, see_other};
use crate::{
    error::{AppError, AppResult},
    models::{InventoryItem, InventoryItemForm},
    repository::Removal,
    services::Submission,
    views, AppState,
};

const LIST_URL: &str = "/catalog/bookinstances";

async fn respond(
    state: &AppState,
    title: &str,
    outcome: Submission<InventoryItem, InventoryItemForm>,
) -> AppResult<Response> {
    match outcome {
        Submission::Saved(item) | Submission::Duplicate(item) => Ok(see_other(&item.url())),
        Submission::Rejected { form, errors } => {
            let books = state.services.inventory.book_options().await?;
            Ok(views::inventory::form(title, &form, &books, &errors).into_response())
        }
    }
}

pub async fn list(State(state): State<AppState>) -> AppResult<Markup> {
    let items = state.services.inventory.list().await?;
    Ok(views::inventory::list(&items))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Item")?;
    let listing = state.services.inventory.detail(id).await?;
    Ok(views::inventory::detail(&listing))
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Markup> {
    let books = state.services.inventory.book_options().await?;
    Ok(views::inventory::form(
        "Create BookInstance",
        &InventoryItemForm::default(),
        &books,
        &[],
    ))
}

/// Record a new copy; status and due date fall back to their defaults
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<InventoryItemForm>,
) -> AppResult<Response> {
    let outcome = state.services.inventory.create(form).await?;
    respond(&state, "Create BookInstance", outcome).await
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Item") else {
        return Ok(see_other(LIST_URL));
    };
    Ok(match state.services.inventory.delete_preview(id).await? {
        Some(listing) => views::inventory::delete(&listing).into_response(),
        None => see_other(LIST_URL),
    })
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let Ok(id) = record_id(&id, "Item") else {
        return Ok(see_other(LIST_URL));
    };
    match state.services.inventory.delete(id).await? {
        Removal::Deleted | Removal::Missing => Ok(see_other(LIST_URL)),
        // copies have no dependents
        Removal::InUse => Err(AppError::Conflict("Item is still referenced".to_string())),
    }
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Markup> {
    let id = record_id(&id, "Item")?;
    let (item, books) = state.services.inventory.edit(id).await?;
    Ok(views::inventory::form(
        "Update BookInstance",
        &InventoryItemForm::from(&item),
        &books,
        &[],
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<InventoryItemForm>,
) -> AppResult<Response> {
    let id = record_id(&id, "Item")?;
    let outcome = state.services.inventory.update(id, form).await?;
    respond(&state, "Update BookInstance", outcome).await
}
