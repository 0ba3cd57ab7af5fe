//! HTTP handlers and routing for the catalog site

pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod inventory;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, Failure},
    views, AppState,
};

const REJECTION_BODY_LIMIT: usize = 64 * 1024;

/// Parse a path id; a malformed id is reported like a missing record
pub fn record_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", what)))
}

/// Where a successful write sends the browser
pub fn see_other(url: &str) -> Response {
    Redirect::to(url).into_response()
}

/// Fallback for unmatched routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Page not found".to_string())
}

/// Render every failed response as an HTML error page. Failures raised by
/// handlers carry their own message; extractor rejections and router
/// errors use the status reason. Details are shown only in development.
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let development = state.config.is_development();
    let failure = response.extensions().get::<Failure>().cloned();
    let (mut parts, body) = response.into_parts();
    let (message, detail) = match failure {
        Some(failure) => (failure.message, Some(failure.detail)),
        None => {
            let message = status.canonical_reason().unwrap_or("Error").to_string();
            let detail = if development {
                axum::body::to_bytes(body, REJECTION_BODY_LIMIT)
                    .await
                    .ok()
                    .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                    .filter(|text| !text.is_empty())
            } else {
                None
            };
            (message, detail)
        }
    };
    let detail = detail.filter(|_| development);

    let page = views::error_page(&message, status.as_u16(), detail.as_deref()).into_string();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    Response::from_parts(parts, Body::from(page))
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/catalog", get(home::index))
        // Authors
        .route("/catalog/authors", get(authors::list))
        .route(
            "/catalog/author/create",
            get(authors::create_form).post(authors::create),
        )
        .route("/catalog/author/:id", get(authors::detail))
        .route(
            "/catalog/author/:id/delete",
            get(authors::delete_form).post(authors::delete),
        )
        .route(
            "/catalog/author/:id/update",
            get(authors::update_form).post(authors::update),
        )
        // Books
        .route("/catalog/books", get(books::list))
        .route(
            "/catalog/book/create",
            get(books::create_form).post(books::create),
        )
        .route("/catalog/book/:id", get(books::detail))
        .route(
            "/catalog/book/:id/delete",
            get(books::delete_form).post(books::delete),
        )
        .route(
            "/catalog/book/:id/update",
            get(books::update_form).post(books::update),
        )
        // Genres
        .route("/catalog/genres", get(genres::list))
        .route(
            "/catalog/genre/create",
            get(genres::create_form).post(genres::create),
        )
        .route("/catalog/genre/:id", get(genres::detail))
        .route(
            "/catalog/genre/:id/delete",
            get(genres::delete_form).post(genres::delete),
        )
        .route(
            "/catalog/genre/:id/update",
            get(genres::update_form).post(genres::update),
        )
        // Inventory copies
        .route("/catalog/bookinstances", get(inventory::list))
        .route(
            "/catalog/bookinstance/create",
            get(inventory::create_form).post(inventory::create),
        )
        .route("/catalog/bookinstance/:id", get(inventory::detail))
        .route(
            "/catalog/bookinstance/:id/delete",
            get(inventory::delete_form).post(inventory::delete),
        )
        .route(
            "/catalog/bookinstance/:id/update",
            get(inventory::update_form).post(inventory::update),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            render_error_pages,
        ))
        // health checks answer JSON, outside the error pages
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
