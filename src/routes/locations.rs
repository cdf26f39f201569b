use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::extractors::ApiJson;
use crate::routes::{parse_id, require_text};
use crate::state::AppState;
use crate::store::models::{Location, LocationId, NewLocation};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/locations", get(list_active).post(create_location))
        .route("/api/locations/{id}", get(get_location))
}

/// Only locations currently open for check-ins
async fn list_active(State(state): State<AppState>) -> Json<Vec<Location>> {
    Json(state.store.lock().await.get_active_locations())
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Location>> {
    let location_id: LocationId = parse_id(&id, "location")?;
    let store = state.store.lock().await;
    store
        .get_location(location_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Location not found".into()))
}

async fn create_location(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    let new = NewLocation {
        name: require_text(body.name, "Name", 200)?,
        description: require_text(body.description, "Description", 2000)?,
        address: require_text(body.address, "Address", 500)?,
        ..body
    };

    let location = state.store.lock().await.create_location(new);
    Ok((StatusCode::CREATED, Json(location)))
}
