//! Chat Service Façade
//!
//! RPC-facing entry point. Checks request shape, delegates to the room and
//! message services, and maps domain failures to RPC statuses.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use validator::Validate;

use super::message_service::{MessageService, SaveMessageDto};
use super::room_service::RoomService;
use crate::application::dto::{
    AddRoomParticipantRequest, CreateRoomRequest, CreateRoomResponse, GetMessagesRequest,
    GetRoomRequest, PaginatedMessagesResponse, RoomParticipantsResponse, SaveMessageRequest,
    SaveMessageResponse,
};
use crate::domain::{DomainError, User};
use crate::infrastructure::metrics;
use crate::shared::error::{RpcError, RpcStatus};
use crate::shared::validation::validation_error;

impl From<DomainError> for RpcError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(msg) => RpcError::new(RpcStatus::InvalidArgument, msg),
            DomainError::NotFound(msg) => RpcError::new(RpcStatus::NotFound, msg),
            DomainError::PermissionDenied(msg) => RpcError::new(RpcStatus::PermissionDenied, msg),
            DomainError::DependencyFailure(msg) => RpcError::new(RpcStatus::Unavailable, msg),
        }
    }
}

/// The five chat RPCs.
pub struct ChatService {
    rooms: Arc<dyn RoomService>,
    messages: Arc<dyn MessageService>,
}

impl ChatService {
    pub fn new(rooms: Arc<dyn RoomService>, messages: Arc<dyn MessageService>) -> Self {
        Self { rooms, messages }
    }

    pub async fn save_message(
        &self,
        request: SaveMessageRequest,
    ) -> Result<SaveMessageResponse, RpcError> {
        observe("SaveMessage", async move {
            request.validate().map_err(validation_error)?;

            let appended = self
                .messages
                .save_message(SaveMessageDto {
                    room_id: request.room_id,
                    sender_id: request.sender_id,
                    content: request.content,
                    attachment_url: Some(request.attachment_url),
                    reply_to: Some(request.reply_to),
                    idempotency_key: request.idempotency_key,
                })
                .await?;

            if !appended.replayed {
                metrics::record_message_saved();
            }

            Ok::<_, RpcError>(SaveMessageResponse {
                message_id: appended.message.id,
            })
        })
        .await
    }

    pub async fn get_room_participants(
        &self,
        request: GetRoomRequest,
    ) -> Result<RoomParticipantsResponse, RpcError> {
        observe("GetRoomParticipants", async move {
            request.validate().map_err(validation_error)?;

            let view = self.rooms.get_participants(request.room_id).await?;
            Ok::<_, RpcError>(RoomParticipantsResponse::from(view))
        })
        .await
    }

    pub async fn get_room_messages(
        &self,
        request: GetMessagesRequest,
    ) -> Result<PaginatedMessagesResponse, RpcError> {
        observe("GetRoomMessages", async move {
            request.validate().map_err(validation_error)?;

            let page = self
                .messages
                .get_messages(request.room_id, request.page, request.limit)
                .await?;
            Ok::<_, RpcError>(PaginatedMessagesResponse::from(page))
        })
        .await
    }

    pub async fn create_room(
        &self,
        request: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, RpcError> {
        observe("CreateRoom", async move {
            request.validate().map_err(validation_error)?;

            let room = self
                .rooms
                .create_room(&request.room_name, &request.user_ids)
                .await?;
            Ok::<_, RpcError>(CreateRoomResponse::from(room))
        })
        .await
    }

    pub async fn add_room_participant(
        &self,
        request: AddRoomParticipantRequest,
    ) -> Result<RoomParticipantsResponse, RpcError> {
        observe("AddRoomParticipant", async move {
            request.validate().map_err(validation_error)?;

            let view = self
                .rooms
                .add_participant(request.room_id, User::new(request.user_id, request.username))
                .await?;
            Ok::<_, RpcError>(RoomParticipantsResponse::from(view))
        })
        .await
    }
}

/// Time an RPC, record its outcome and log failures.
async fn observe<T, F>(method: &'static str, call: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    let started = Instant::now();
    let result = call.await;

    let status = match &result {
        Ok(_) => "ok",
        Err(e) => {
            match e.status {
                RpcStatus::Unavailable => {
                    tracing::error!(method, error = %e.message, "RPC failed on a dependency")
                }
                _ => tracing::debug!(method, status = %e.status, error = %e.message, "RPC rejected"),
            }
            e.status.as_str()
        }
    };
    metrics::record_rpc(method, status, started.elapsed().as_secs_f64());

    result
}
