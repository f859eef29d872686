//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::http::StatusCode;
use axum_test::TestServer;
use fake::faker::internet::en::Username;
use fake::Fake;
use serde_json::json;

use chat_rooms::application::dto::{
    CreateRoomResponse, PaginatedMessagesResponse, RoomParticipantsResponse, SaveMessageResponse,
};
use chat_rooms::config::{
    CorsSettings, DatabaseSettings, PaginationSettings, ServerSettings, Settings, StorageDriver,
};
use chat_rooms::startup::{build_router, build_state};

/// Settings for an in-memory instance
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 10,
            shutdown_timeout_secs: 1,
        },
        database: DatabaseSettings {
            driver: StorageDriver::Memory,
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: 1,
            run_migrations: false,
        },
        pagination: PaginationSettings::default(),
        cors: CorsSettings {
            allowed_origins: Vec::new(),
        },
        environment: "test".into(),
    }
}

/// Test application backed by the in-memory store
pub struct TestApp {
    pub server: TestServer,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = build_state(&test_settings())
            .await
            .expect("in-memory state");
        let server = TestServer::new(build_router(state)).expect("test server");

        Self { server }
    }

    pub async fn create_room(&self, name: &str, user_ids: &[u64]) -> CreateRoomResponse {
        let response = self
            .server
            .post("/api/v1/rooms")
            .json(&json!({ "roomName": name, "userIds": user_ids }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    /// Add a participant with a generated username
    pub async fn add_participant(&self, room_id: u64, user_id: u64) -> RoomParticipantsResponse {
        let username: String = Username().fake();
        let response = self
            .server
            .post(&format!("/api/v1/rooms/{room_id}/participants"))
            .json(&json!({ "userId": user_id, "username": username }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn save_message(&self, room_id: u64, sender_id: u64, content: &str) -> u64 {
        let response = self
            .server
            .post(&format!("/api/v1/rooms/{room_id}/messages"))
            .json(&json!({ "senderId": sender_id, "content": content }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<SaveMessageResponse>().message_id
    }

    pub async fn get_messages(&self, room_id: u64, page: u32, limit: u32) -> PaginatedMessagesResponse {
        let response = self
            .server
            .get(&format!("/api/v1/rooms/{room_id}/messages"))
            .add_query_param("page", page)
            .add_query_param("limit", limit)
            .await;
        response.assert_status_ok();
        response.json()
    }
}
