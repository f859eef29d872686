//! Message API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::TestApp;

#[tokio::test]
async fn test_general_room_scenario() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1, 2]).await;

    let first = app.save_message(room.room_id, 1, "hi").await;
    let second = app.save_message(room.room_id, 2, "hello").await;
    assert_eq!((first, second), (1, 2));

    let page = app.get_messages(room.room_id, 1, 10).await;

    let ids: Vec<u64> = page.messages.iter().map(|m| m.message_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(page.messages[0].content, "hi");
    assert_eq!(page.messages[1].sender_id, 2);
    assert_eq!(page.pagination.total_items, 2);
    assert_eq!(page.pagination.total_pages, 1);
    assert_eq!(page.room_name, "general");
}

#[tokio::test]
async fn test_sent_at_is_strictly_increasing() {
    let app = TestApp::new().await;
    let room = app.create_room("fast", &[1]).await;
    for i in 0..5 {
        app.save_message(room.room_id, 1, &format!("m{i}")).await;
    }

    let page = app.get_messages(room.room_id, 1, 10).await;

    let times: Vec<&str> = page.messages.iter().map(|m| m.sent_at.as_str()).collect();
    assert!(times.windows(2).all(|w| w[0] < w[1]), "{times:?}");
}

#[tokio::test]
async fn test_page_beyond_range_is_empty_with_totals() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;
    for i in 0..3 {
        app.save_message(room.room_id, 1, &format!("m{i}")).await;
    }

    let page = app.get_messages(room.room_id, 5, 2).await;

    assert!(page.messages.is_empty());
    assert_eq!(page.pagination.total_items, 3);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.page, 5);
}

#[tokio::test]
async fn test_pages_partition_history() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;
    for i in 0..5 {
        app.save_message(room.room_id, 1, &format!("m{i}")).await;
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = app.get_messages(room.room_id, page, 2).await;
        seen.extend(result.messages.into_iter().map(|m| m.message_id));
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_missing_paging_params_use_defaults() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;
    app.save_message(room.room_id, 1, "hi").await;

    let response = app
        .server
        .get(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);
}

#[tokio::test]
async fn test_reply_and_attachment_round_trip() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1, 2]).await;
    let original = app.save_message(room.room_id, 1, "question").await;

    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .json(&json!({
            "senderId": 2,
            "content": "answer",
            "replyTo": original,
            "attachmentUrl": "https://cdn.example.com/a.png",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let page = app.get_messages(room.room_id, 1, 10).await;
    assert_eq!(page.messages[0].reply_to, 0);
    assert_eq!(page.messages[0].attachment_url, "");
    assert_eq!(page.messages[1].reply_to, original);
    assert_eq!(page.messages[1].attachment_url, "https://cdn.example.com/a.png");
}

#[tokio::test]
async fn test_attachment_only_message_is_accepted() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .json(&json!({ "senderId": 1, "attachmentUrl": "https://cdn.example.com/b.png" }))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_reply_to_unknown_message_is_invalid_argument() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .json(&json!({ "senderId": 1, "content": "re", "replyTo": 77 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["status"], "invalid-argument");
}

#[tokio::test]
async fn test_empty_message_is_invalid_argument() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .json(&json!({ "senderId": 1, "content": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_member_sender_is_permission_denied() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;

    let response = app
        .server
        .post(&format!("/api/v1/rooms/{}/messages", room.room_id))
        .json(&json!({ "senderId": 9, "content": "let me in" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["status"], "permission-denied");
}

#[tokio::test]
async fn test_added_participant_can_post() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;
    app.add_participant(room.room_id, 9).await;

    let id = app.save_message(room.room_id, 9, "finally").await;

    assert_eq!(id, 1);
}

#[tokio::test]
async fn test_save_to_missing_room_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/v1/rooms/5/messages")
        .json(&json!({ "senderId": 1, "content": "hello?" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_idempotency_key_replays_original_id() {
    let app = TestApp::new().await;
    let room = app.create_room("general", &[1]).await;
    let body = json!({ "senderId": 1, "content": "once", "idempotencyKey": "k-1" });
    let uri = format!("/api/v1/rooms/{}/messages", room.room_id);

    let first: Value = app.server.post(&uri).json(&body).await.json();
    let second: Value = app.server.post(&uri).json(&body).await.json();

    assert_eq!(first["messageId"], second["messageId"]);
    let page = app.get_messages(room.room_id, 1, 10).await;
    assert_eq!(page.pagination.total_items, 1);
}

#[tokio::test]
async fn test_rooms_number_messages_independently() {
    let app = TestApp::new().await;
    let a = app.create_room("a", &[1]).await;
    let b = app.create_room("b", &[1]).await;

    app.save_message(a.room_id, 1, "a1").await;
    app.save_message(b.room_id, 1, "b1").await;

    assert_eq!(app.get_messages(a.room_id, 1, 10).await.messages.len(), 1);
    assert_eq!(app.get_messages(b.room_id, 1, 10).await.messages.len(), 1);
}
