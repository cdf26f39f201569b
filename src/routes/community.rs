use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extractors::ApiJson;
use crate::routes::{parse_id, require_text, LimitQuery};
use crate::state::AppState;
use crate::store::models::{
    CommunityPost, NewCommunityPost, NewPostComment, PostComment, PostId, UserId,
};
use crate::store::{CommentWithAuthor, PostWithAuthor};

const MAX_TITLE_LEN: usize = 200;
const MAX_POST_LEN: usize = 2000;
const MAX_COMMENT_LEN: usize = 500;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub user_id: UserId,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub liked: bool,
    pub likes: u32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/community/posts", get(list_posts).post(create_post))
        .route(
            "/api/community/posts/{id}/like",
            post(like_post).delete(unlike_post),
        )
        .route(
            "/api/community/posts/{id}/comments",
            get(list_comments).post(create_comment),
        )
}

async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<PostWithAuthor>> {
    let limits = &state.config.limits;
    let limit = limits.resolve(query.requested(), limits.feed);
    Json(state.store.lock().await.get_community_posts(limit))
}

async fn create_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCommunityPost>,
) -> AppResult<(StatusCode, Json<CommunityPost>)> {
    let new = NewCommunityPost {
        title: require_text(body.title, "Title", MAX_TITLE_LEN)?,
        content: require_text(body.content, "Content", MAX_POST_LEN)?,
        ..body
    };

    let post = state.store.lock().await.create_community_post(new)?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn like_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<LikeRequest>,
) -> AppResult<Json<LikeResponse>> {
    let post_id: PostId = parse_id(&id, "post")?;
    let mut store = state.store.lock().await;
    store.like_community_post(post_id, body.user_id)?;

    Ok(Json(like_response(
        store.has_liked(post_id, body.user_id),
        store.get_community_post(post_id),
    )))
}

async fn unlike_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<LikeRequest>,
) -> AppResult<Json<LikeResponse>> {
    let post_id: PostId = parse_id(&id, "post")?;
    let mut store = state.store.lock().await;
    store.unlike_community_post(post_id, body.user_id)?;

    Ok(Json(like_response(
        store.has_liked(post_id, body.user_id),
        store.get_community_post(post_id),
    )))
}

fn like_response(liked: bool, post: Option<CommunityPost>) -> LikeResponse {
    LikeResponse {
        success: true,
        liked,
        likes: post.map(|p| p.likes).unwrap_or(0),
    }
}

async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentWithAuthor>>> {
    let post_id: PostId = parse_id(&id, "post")?;
    Ok(Json(state.store.lock().await.get_post_comments(post_id)))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NewPostComment>,
) -> AppResult<(StatusCode, Json<PostComment>)> {
    let post_id: PostId = parse_id(&id, "post")?;
    let new = NewPostComment {
        content: require_text(body.content, "Comment", MAX_COMMENT_LEN)?,
        ..body
    };

    let comment = state.store.lock().await.create_post_comment(post_id, new)?;
    Ok((StatusCode::CREATED, Json(comment)))
}
