//! Room Handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::application::dto::{
    AddRoomParticipantRequest, CreateRoomRequest, CreateRoomResponse, GetRoomRequest,
    RoomParticipantsResponse,
};
use crate::presentation::http::extractors::{RpcJson, RpcPath};
use crate::shared::error::RpcError;
use crate::startup::AppState;

/// CreateRoom
pub async fn create_room(
    State(state): State<AppState>,
    RpcJson(body): RpcJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), RpcError> {
    let room = state.chat.create_room(body).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// GetRoomParticipants
pub async fn get_participants(
    State(state): State<AppState>,
    RpcPath(room_id): RpcPath<u64>,
) -> Result<Json<RoomParticipantsResponse>, RpcError> {
    let view = state
        .chat
        .get_room_participants(GetRoomRequest { room_id })
        .await?;
    Ok(Json(view))
}

/// AddRoomParticipant
pub async fn add_participant(
    State(state): State<AppState>,
    RpcPath(room_id): RpcPath<u64>,
    RpcJson(mut body): RpcJson<AddRoomParticipantRequest>,
) -> Result<Json<RoomParticipantsResponse>, RpcError> {
    body.room_id = room_id;

    let view = state.chat.add_room_participant(body).await?;
    Ok(Json(view))
}
