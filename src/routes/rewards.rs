use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::extractors::ApiJson;
use crate::routes::require_text;
use crate::state::AppState;
use crate::store::models::{NewReward, Reward};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/rewards", get(list_active).post(create_reward))
}

async fn list_active(State(state): State<AppState>) -> Json<Vec<Reward>> {
    Json(state.store.lock().await.get_active_rewards())
}

async fn create_reward(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewReward>,
) -> AppResult<(StatusCode, Json<Reward>)> {
    let new = NewReward {
        title: require_text(body.title, "Title", 200)?,
        ..body
    };

    let reward = state.store.lock().await.create_reward(new);
    Ok((StatusCode::CREATED, Json(reward)))
}
