// Point-moving endpoints (check-ins, redemptions) and their read views.
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extractors::ApiJson;
use crate::routes::{parse_id, LimitQuery};
use crate::state::AppState;
use crate::store::models::{CheckIn, LocationId, Redemption, RewardId, User, UserId};
use crate::store::CheckInWithLocation;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub user_id: UserId,
    pub location_id: LocationId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionRequest {
    pub user_id: UserId,
    pub reward_id: RewardId,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/check-ins", post(create_check_in))
        .route("/api/users/{id}/check-ins", get(user_check_ins))
        .route("/api/users/{id}/recent-activity", get(recent_activity))
        .route("/api/redemptions", post(create_redemption))
        .route("/api/users/{id}/redemptions", get(user_redemptions))
        .route("/api/leaderboard", get(leaderboard))
}

async fn create_check_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckInRequest>,
) -> AppResult<(StatusCode, Json<CheckIn>)> {
    let check_in = state
        .store
        .lock()
        .await
        .create_check_in(body.user_id, body.location_id)?;

    Ok((StatusCode::CREATED, Json(check_in)))
}

async fn user_check_ins(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CheckIn>>> {
    let user_id: UserId = parse_id(&id, "user")?;
    Ok(Json(state.store.lock().await.get_user_check_ins(user_id)))
}

async fn recent_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> AppResult<Json<Vec<CheckInWithLocation>>> {
    let user_id: UserId = parse_id(&id, "user")?;
    let limits = &state.config.limits;
    let limit = limits.resolve(query.requested(), limits.recent_activity);

    Ok(Json(
        state.store.lock().await.get_recent_check_ins(user_id, limit),
    ))
}

async fn create_redemption(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RedemptionRequest>,
) -> AppResult<(StatusCode, Json<Redemption>)> {
    let redemption = state
        .store
        .lock()
        .await
        .create_redemption(body.user_id, body.reward_id)?;

    Ok((StatusCode::CREATED, Json(redemption)))
}

async fn user_redemptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Redemption>>> {
    let user_id: UserId = parse_id(&id, "user")?;
    Ok(Json(state.store.lock().await.get_user_redemptions(user_id)))
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<User>> {
    let limits = &state.config.limits;
    let limit = limits.resolve(query.requested(), limits.leaderboard);
    Json(state.store.lock().await.get_leaderboard(limit))
}
