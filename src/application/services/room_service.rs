//! Room Service
//!
//! The room directory: creates rooms, manages membership and assembles the
//! participant view with resolved display names.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    DomainError, NewRoom, Room, RoomId, RoomRepository, User, UserDirectory, UserId,
    MAX_ROOM_NAME_LENGTH, MAX_USER_ID,
};

/// Room service trait
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Create a room with its initial members
    async fn create_room(&self, name: &str, user_ids: &[UserId]) -> Result<Room, DomainError>;

    /// Add a participant, returning the full current membership
    async fn add_participant(&self, room_id: RoomId, user: User) -> Result<RoomView, DomainError>;

    /// Get the room and its participants
    async fn get_participants(&self, room_id: RoomId) -> Result<RoomView, DomainError>;
}

/// A room together with its resolved participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub room: Room,
    /// In join order
    pub participants: Vec<User>,
}

/// RoomService implementation
pub struct RoomServiceImpl<R, U>
where
    R: RoomRepository,
    U: UserDirectory,
{
    room_repo: Arc<R>,
    users: Arc<U>,
}

impl<R, U> RoomServiceImpl<R, U>
where
    R: RoomRepository,
    U: UserDirectory,
{
    pub fn new(room_repo: Arc<R>, users: Arc<U>) -> Self {
        Self { room_repo, users }
    }

    async fn find_room(&self, room_id: RoomId) -> Result<Room, DomainError> {
        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::room_not_found(room_id))
    }

    /// Resolve every member. Members without a known name keep an empty username.
    async fn view(&self, room: Room) -> Result<RoomView, DomainError> {
        let member_ids = self.room_repo.member_ids(room.id).await?;

        let mut names: HashMap<UserId, String> = self
            .users
            .resolve(&member_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let participants: Vec<User> = member_ids
            .into_iter()
            .map(|id| User::new(id, names.remove(&id).unwrap_or_default()))
            .collect();

        let unresolved = participants.iter().filter(|u| !u.has_username()).count();
        if unresolved > 0 {
            tracing::warn!(room_id = room.id, unresolved, "Participants without a known username");
        }

        Ok(RoomView { room, participants })
    }
}

/// User IDs are non-zero and fit the stores' signed 64-bit keys.
fn check_user_id(id: UserId) -> Result<(), DomainError> {
    if id == 0 || id > MAX_USER_ID {
        return Err(DomainError::InvalidArgument(format!("User ID {} is not valid", id)));
    }
    Ok(())
}

#[async_trait]
impl<R, U> RoomService for RoomServiceImpl<R, U>
where
    R: RoomRepository + 'static,
    U: UserDirectory + 'static,
{
    async fn create_room(&self, name: &str, user_ids: &[UserId]) -> Result<Room, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidArgument("Room name is required".into()));
        }
        if name.chars().count() > MAX_ROOM_NAME_LENGTH {
            return Err(DomainError::InvalidArgument(format!(
                "Room name must be at most {} characters",
                MAX_ROOM_NAME_LENGTH
            )));
        }
        if user_ids.is_empty() {
            return Err(DomainError::InvalidArgument(
                "A room needs at least one member".into(),
            ));
        }
        user_ids.iter().try_for_each(|&id| check_user_id(id))?;

        let room = self
            .room_repo
            .create_with_members(&NewRoom::new(name, user_ids.iter().copied()))
            .await?;

        tracing::info!(room_id = room.id, members = user_ids.len(), "Room created");

        Ok(room)
    }

    async fn add_participant(&self, room_id: RoomId, user: User) -> Result<RoomView, DomainError> {
        check_user_id(user.id)?;

        let room = self.find_room(room_id).await?;

        if self.room_repo.add_member(room_id, &user).await? {
            tracing::info!(room_id, user_id = user.id, "Participant added");
        } else {
            tracing::debug!(room_id, user_id = user.id, "Already a participant");
        }

        self.view(room).await
    }

    async fn get_participants(&self, room_id: RoomId) -> Result<RoomView, DomainError> {
        let room = self.find_room(room_id).await?;
        self.view(room).await
    }
}
