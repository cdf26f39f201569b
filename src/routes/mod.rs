pub mod activity;
pub mod community;
pub mod locations;
pub mod rewards;
pub mod users;

use std::str::FromStr;

use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Full application router with tracing, ready to serve.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(users::router())
        .merge(locations::router())
        .merge(rewards::router())
        .merge(activity::router())
        .merge(community::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `?limit=` as sent by the client. Anything that does not parse as a
/// positive integer is treated as absent.
#[derive(Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    pub fn requested(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// Parse a path segment into a typed record id.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> AppResult<T> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid {} id", what)))
}

/// Trim and reject blank or oversized text fields.
pub(crate) fn require_text(value: String, field: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::BadRequest(format!(
            "{} must be {} characters or less",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}
