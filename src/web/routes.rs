use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;

use super::AppState;
use crate::posting::Posting;
use crate::scrape;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/scrape/linkedin", get(api_scrape))
}

#[derive(Debug, Serialize)]
struct ScrapeResponse {
    results: Vec<Posting>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn health() -> &'static str {
    "OK"
}

// ========== API Routes ==========

async fn api_scrape(State(state): State<AppState>) -> Response {
    let Some(_permit) = state.guard.try_start() else {
        return error_response(StatusCode::CONFLICT, "scrape already running");
    };

    match state.scraper.scrape().await {
        Ok(results) => {
            scrape::report(&results);
            Json(ScrapeResponse { results }).into_response()
        }
        Err(e) => {
            tracing::error!("Scrape failed: {e}");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}
