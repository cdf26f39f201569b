use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::{AppError, AppResult};
use crate::extractors::ApiJson;
use crate::routes::{parse_id, require_text};
use crate::state::AppState;
use crate::store::models::{NewUser, User, UserId};

const MAX_USERNAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 254;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/by-username/{username}", get(get_user_by_username))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<User>> {
    let user_id: UserId = parse_id(&id, "user")?;
    let store = state.store.lock().await;
    store
        .get_user(user_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<User>> {
    let store = state.store.lock().await;
    store
        .get_user_by_username(&username)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let username = require_text(body.username, "Username", MAX_USERNAME_LEN)?;
    let email = require_text(body.email, "Email", MAX_EMAIL_LEN)?;
    if !email.contains('@') {
        return Err(AppError::BadRequest("Email must contain '@'".into()));
    }

    let user = state
        .store
        .lock()
        .await
        .create_user(NewUser { username, email })?;

    Ok((StatusCode::CREATED, Json(user)))
}
