//! Message Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::{
    GetMessagesRequest, PaginatedMessagesResponse, SaveMessageRequest, SaveMessageResponse,
};
use crate::presentation::http::extractors::{RpcJson, RpcPath, RpcQuery};
use crate::shared::error::RpcError;
use crate::startup::AppState;

/// GetRoomMessages (`?limit=&page=`)
pub async fn get_messages(
    State(state): State<AppState>,
    RpcPath(room_id): RpcPath<u64>,
    RpcQuery(mut query): RpcQuery<GetMessagesRequest>,
) -> Result<Json<PaginatedMessagesResponse>, RpcError> {
    query.room_id = room_id;

    let page = state.chat.get_room_messages(query).await?;
    Ok(Json(page))
}

/// SaveMessage
pub async fn save_message(
    State(state): State<AppState>,
    RpcPath(room_id): RpcPath<u64>,
    RpcJson(mut body): RpcJson<SaveMessageRequest>,
) -> Result<(StatusCode, Json<SaveMessageResponse>), RpcError> {
    body.room_id = room_id;

    let saved = state.chat.save_message(body).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
