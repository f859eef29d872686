//! Room API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chat_rooms::application::dto::RoomParticipantsResponse;

use crate::common::TestApp;

#[tokio::test]
async fn test_create_room_returns_id_and_name() {
    let app = TestApp::new().await;

    let room = app.create_room("general", &[1, 2]).await;

    assert_eq!(room.room_id, 1);
    assert_eq!(room.room_name, "general");
}

#[tokio::test]
async fn test_create_room_rejects_empty_members() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms")
        .json(&json!({ "roomName": "empty", "userIds": [] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "invalid-argument");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_create_room_rejects_blank_name() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms")
        .json(&json!({ "roomName": "   ", "userIds": [1] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_invalid_argument() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "invalid-argument");
}

#[tokio::test]
async fn test_participants_include_creators() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1, 2]).await;

    let response = app
        .server
        .get(&format!("/api/v1/rooms/{}/participants", room.room_id))
        .await;

    response.assert_status_ok();
    let view: RoomParticipantsResponse = response.json();
    let mut ids: Vec<u64> = view.users.iter().map(|u| u.user_id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(view.room_name, "general");
}

#[tokio::test]
async fn test_add_participant_resolves_username() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    let view = app.add_participant(room.room_id, 3).await;

    let added = view
        .users
        .iter()
        .find(|u| u.user_id == 3)
        .expect("new participant listed");
    assert!(!added.username.is_empty());
}

#[tokio::test]
async fn test_add_participant_is_idempotent() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    app.add_participant(room.room_id, 3).await;
    let view = app.add_participant(room.room_id, 3).await;

    let count = view.users.iter().filter(|u| u.user_id == 3).count();
    assert_eq!(count, 1);
    assert_eq!(view.users.len(), 2);
}

#[tokio::test]
async fn test_add_participant_to_missing_room_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms/99/participants")
        .json(&json!({ "userId": 3, "username": "carol" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], "not-found");
}

#[tokio::test]
async fn test_user_id_beyond_signed_range_is_invalid_argument() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms")
        .json(&json!({ "roomName": "big", "userIds": [1u64 << 63] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["status"], "invalid-argument");
    assert_eq!(body["retryable"], false);

    let room = app.create_room("general", &[1]).await;
    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/participants", room.room_id))
        .json(&json!({ "userId": u64::MAX, "username": "max" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_participants_of_missing_room_is_not_found() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/v1/rooms/42/participants").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_room_id_is_invalid_argument() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/v1/rooms/abc/participants").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "invalid-argument");
}
