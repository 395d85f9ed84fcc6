//! HTTP surface: routes, handlers and the response envelope.

mod envelope;
mod error;
mod handlers;

use axum::routing::get;
use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::storage::Database;

pub use envelope::{Deleted, Envelope, ErrorBody, FieldError};
pub use error::{ApiError, INTERNAL_ERROR_MESSAGE};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Build the application router.
///
/// Article routes are served both at `/articles` and under the versioned
/// `/api/v1/articles` prefix.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(article_routes("/articles"))
        .merge(article_routes("/api/v1/articles"))
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn article_routes(prefix: &str) -> Router<AppState> {
    Router::new()
        .route(
            prefix,
            get(handlers::list_articles).post(handlers::create_article),
        )
        .route(
            &format!("{prefix}/{{id}}"),
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
}
