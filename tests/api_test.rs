//! End-to-end tests for the JSON API, driven through the router in-process
//!
//! Covers:
//! - User creation and lookup
//! - Check-ins crediting points and recent activity
//! - Redemptions and the insufficient-points path
//! - Leaderboard ordering
//! - Community feed, likes and comments

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use civicquest::config::Config;
use civicquest::routes;
use civicquest::state::AppState;
use civicquest::store::models::{LocationKind, NewLocation, NewReward, RewardCategory};
use civicquest::store::Store;

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(Store::new(), Config::default());
        let app = routes::app(state.clone());
        Self { app, state }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn create_user(&self, username: &str) -> String {
        let (status, user) = self
            .post(
                "/api/users",
                json!({ "username": username, "email": format!("{}@example.com", username) }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        user["id"].as_str().unwrap().to_string()
    }

    async fn create_location(&self, name: &str, points: u32) -> String {
        let location = self.state.store.lock().await.create_location(NewLocation {
            name: name.to_string(),
            kind: LocationKind::Recycling,
            description: "Sort materials and learn sustainability".to_string(),
            address: "5678 North Broad St".to_string(),
            distance: Some("0.7 miles away".to_string()),
            points,
            image_url: None,
            is_active: true,
        });
        location.id.to_string()
    }

    async fn create_reward(&self, title: &str, points: u32) -> String {
        let reward = self.state.store.lock().await.create_reward(NewReward {
            title: title.to_string(),
            description: None,
            points,
            category: RewardCategory::LocalAttraction,
            image_url: None,
            is_active: true,
        });
        reward.id.to_string()
    }

    async fn check_in(&self, user_id: &str, location_id: &str) -> (StatusCode, Value) {
        self.post(
            "/api/check-ins",
            json!({ "userId": user_id, "locationId": location_id }),
        )
        .await
    }
}

#[tokio::test]
async fn health_is_ok() {
    let app = TestApp::new();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_and_fetch_user() {
    let app = TestApp::new();
    let user_id = app.create_user("demo_user").await;

    let (status, user) = app.get(&format!("/api/users/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "demo_user");
    assert_eq!(user["points"], 0);
    assert_eq!(user["level"], 1);
    assert!(user["joinedAt"].is_string());

    let (status, by_name) = app.get("/api/users/by-username/demo_user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name["id"], user_id.as_str());
}

#[tokio::test]
async fn duplicate_username_is_409() {
    let app = TestApp::new();
    app.create_user("alice").await;

    let (status, body) = app
        .post(
            "/api/users",
            json!({ "username": "alice", "email": "new@example.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("alice"));
}

#[tokio::test]
async fn invalid_user_payloads_are_400() {
    let app = TestApp::new();

    let (status, _) = app
        .post("/api/users", json!({ "username": "  ", "email": "a@b.c" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/users", json!({ "username": "bob", "email": "nope" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_and_malformed_user_ids() {
    let app = TestApp::new();

    let (status, body) = app
        .get("/api/users/0190a3c4-0000-7000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let (status, _) = app.get("/api/users/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_in_credits_points_and_shows_in_recent_activity() {
    let app = TestApp::new();
    let user_id = app.create_user("alice").await;
    let farm = app.create_location("Kensington Community Farm", 75).await;
    let hub = app.create_location("North Philly Recycling Hub", 60).await;

    let (status, check_in) = app.check_in(&user_id, &farm).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(check_in["points"], 75);

    app.check_in(&user_id, &hub).await;
    let (_, latest) = app.check_in(&user_id, &hub).await;

    let (_, user) = app.get(&format!("/api/users/{}", user_id)).await;
    assert_eq!(user["points"], 195);

    let (status, recent) = app
        .get(&format!("/api/users/{}/recent-activity?limit=2", user_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    let recent = recent.as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["id"], latest["id"]);
    assert_eq!(recent[0]["location"]["name"], "North Philly Recycling Hub");
    assert_eq!(recent[0]["location"]["type"], "recycling");

    let (_, all) = app.get(&format!("/api/users/{}/check-ins", user_id)).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn check_in_at_unknown_location_is_404() {
    let app = TestApp::new();
    let user_id = app.create_user("alice").await;

    let (status, body) = app
        .check_in(&user_id, "0190a3c4-0000-7000-8000-000000000000")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Location not found");
}

#[tokio::test]
async fn redemption_flow() {
    let app = TestApp::new();
    let user_id = app.create_user("alice").await;
    let landmark = app.create_location("Franklin Institute", 100).await;
    let entry = app.create_reward("Franklin Institute Entry", 500).await;

    // Not enough yet
    let (status, body) = app
        .post(
            "/api/redemptions",
            json!({ "userId": user_id, "rewardId": entry }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient points");

    for _ in 0..6 {
        app.check_in(&user_id, &landmark).await;
    }

    let (status, redemption) = app
        .post(
            "/api/redemptions",
            json!({ "userId": user_id, "rewardId": entry }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(redemption["points"], 500);

    let (_, user) = app.get(&format!("/api/users/{}", user_id)).await;
    assert_eq!(user["points"], 100);
    assert_eq!(user["level"], 1);

    let (_, history) = app
        .get(&format!("/api/users/{}/redemptions", user_id))
        .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn leaderboard_orders_by_points() {
    let app = TestApp::new();
    let low = app.create_user("low").await;
    let high = app.create_user("high").await;
    let mid = app.create_user("mid").await;
    let big = app.create_location("Big", 900).await;
    let small = app.create_location("Small", 40).await;

    app.check_in(&high, &big).await;
    app.check_in(&mid, &small).await;
    app.check_in(&mid, &small).await;

    let (status, board) = app.get("/api/leaderboard?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let board = board.as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["id"], high.as_str());
    assert_eq!(board[1]["id"], mid.as_str());

    // Garbage limit falls back to the default
    let (_, board) = app.get("/api/leaderboard?limit=abc").await;
    let ids: Vec<&str> = board
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![high.as_str(), mid.as_str(), low.as_str()]);
}

#[tokio::test]
async fn active_locations_and_rewards_are_listed() {
    let app = TestApp::new();

    let (status, created) = app
        .post(
            "/api/locations",
            json!({
                "name": "Central Library",
                "type": "library",
                "description": "Reading program and homework help",
                "address": "1901 Vine St",
                "points": 40
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isActive"], true);

    app.post(
        "/api/locations",
        json!({
            "name": "Closed Garden",
            "type": "farm",
            "description": "Closed for winter",
            "address": "1 Elm St",
            "points": 20,
            "isActive": false
        }),
    )
    .await;

    let (_, locations) = app.get("/api/locations").await;
    let locations = locations.as_array().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["name"], "Central Library");

    let (_, fetched) = app
        .get(&format!("/api/locations/{}", created["id"].as_str().unwrap()))
        .await;
    assert_eq!(fetched["address"], "1901 Vine St");

    let (status, _) = app
        .post(
            "/api/rewards",
            json!({ "title": "AMC Movie Ticket", "points": 850, "category": "movie" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, rewards) = app.get("/api/rewards").await;
    assert_eq!(rewards.as_array().unwrap().len(), 1);
    assert_eq!(rewards[0]["category"], "movie");
}

#[tokio::test]
async fn community_feed_likes_and_comments() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;
    let bob = app.create_user("bob").await;
    let farm = app.create_location("Kensington Community Farm", 75).await;

    let (status, post) = app
        .post(
            "/api/community/posts",
            json!({
                "userId": alice,
                "title": "Amazing day at the farm",
                "content": "Tomatoes for local families",
                "locationId": farm,
                "points": 75
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["likes"], 0);
    let post_id = post["id"].as_str().unwrap().to_string();
    let like_uri = format!("/api/community/posts/{}/like", post_id);

    let (status, liked) = app.post(&like_uri, json!({ "userId": bob })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["success"], true);
    assert_eq!(liked["likes"], 1);

    // Second like from the same user changes nothing
    let (_, liked) = app.post(&like_uri, json!({ "userId": bob })).await;
    assert_eq!(liked["likes"], 1);
    assert_eq!(liked["liked"], true);

    let (status, unliked) = app
        .send(Method::DELETE, &like_uri, Some(json!({ "userId": bob })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unliked["likes"], 0);
    assert_eq!(unliked["liked"], false);

    let (_, unliked) = app
        .send(Method::DELETE, &like_uri, Some(json!({ "userId": bob })))
        .await;
    assert_eq!(unliked["likes"], 0);

    let comments_uri = format!("/api/community/posts/{}/comments", post_id);
    let (status, _) = app
        .post(&comments_uri, json!({ "userId": bob, "content": "Great work!" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.post(&comments_uri, json!({ "userId": alice, "content": "Thanks" }))
        .await;

    let (_, comments) = app.get(&comments_uri).await;
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Great work!");
    assert_eq!(comments[0]["user"]["username"], "bob");
    assert_eq!(comments[1]["user"]["username"], "alice");

    let (_, feed) = app.get("/api/community/posts").await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["user"]["username"], "alice");
    assert_eq!(feed[0]["location"]["name"], "Kensington Community Farm");
}

#[tokio::test]
async fn liking_a_missing_post_is_404() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;

    let (status, body) = app
        .post(
            "/api/community/posts/0190a3c4-0000-7000-8000-000000000000/like",
            json!({ "userId": alice }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn blank_comment_is_400() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;
    let (_, post) = app
        .post(
            "/api/community/posts",
            json!({ "userId": alice, "title": "Hello", "content": "World" }),
        )
        .await;

    let (status, body) = app
        .post(
            &format!("/api/community/posts/{}/comments", post["id"].as_str().unwrap()),
            json!({ "userId": alice, "content": "   " }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Comment cannot be empty");
}

#[tokio::test]
async fn malformed_bodies_are_400_with_json_error() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;
    let (_, post) = app
        .post(
            "/api/community/posts",
            json!({ "userId": alice, "title": "Hello", "content": "World" }),
        )
        .await;
    let like_uri = format!("/api/community/posts/{}/like", post["id"].as_str().unwrap());

    let cases = [
        ("/api/check-ins", json!({ "userId": "nope", "locationId": "x" })),
        (like_uri.as_str(), json!({})),
        ("/api/users", json!({ "username": "bob" })),
    ];
    for (uri, body) in cases {
        let (status, body) = app.post(uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{} returned {}", uri, body);
    }

    let (_, feed) = app.get("/api/community/posts").await;
    assert_eq!(feed[0]["likes"], 0);
}

#[tokio::test]
async fn check_in_overflowing_the_balance_is_500_and_not_recorded() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;
    let jackpot = app.create_location("Jackpot", u32::MAX).await;

    let (status, _) = app.check_in(&alice, &jackpot).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.check_in(&alice, &jackpot).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let (_, check_ins) = app.get(&format!("/api/users/{}/check-ins", alice)).await;
    assert_eq!(check_ins.as_array().unwrap().len(), 1);
    let (_, user) = app.get(&format!("/api/users/{}", alice)).await;
    assert_eq!(user["points"], u32::MAX);
}
