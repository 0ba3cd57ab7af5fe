//! Catalog home page

use axum::extract::State;
use maud::Markup;

use crate::{error::AppResult, views, AppState};

/// Site welcome with record counts
pub async fn index(State(state): State<AppState>) -> AppResult<Markup> {
    let counts = state.services.books.counts().await?;
    Ok(views::home::index(&counts))
}
