//! In-Memory Store
//!
//! Process-local implementation of the room, message and user traits behind
//! a single mutex. Every trait call takes the lock once, which gives each
//! write the same all-or-nothing behaviour as a database transaction.
//! Data is lost on restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::domain::{
    AppendedMessage, Message, MessageId, MessageRepository, NewMessage, NewRoom, Room, RoomId,
    RoomRepository, User, UserDirectory, UserId,
};
use crate::shared::error::AppError;

#[derive(Debug)]
struct RoomRecord {
    room: Room,
    /// Join order
    members: Vec<UserId>,
    /// Ascending
    message_ids: Vec<MessageId>,
    last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct State {
    rooms: BTreeMap<RoomId, RoomRecord>,
    messages: HashMap<MessageId, Message>,
    idempotency_keys: HashMap<(RoomId, UserId, String), MessageId>,
    usernames: HashMap<UserId, String>,
    last_room_id: RoomId,
    last_message_id: MessageId,
}

/// In-memory chat store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn room_not_found(room_id: RoomId) -> AppError {
    AppError::NotFound(format!("Room {} not found", room_id))
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, AppError> {
        let state = self.state.lock();
        Ok(state.rooms.get(&id).map(|r| r.room.clone()))
    }

    async fn create_with_members(&self, room: &NewRoom) -> Result<Room, AppError> {
        if room.member_ids.is_empty() {
            return Err(AppError::Internal("room must have at least one member".into()));
        }

        let mut state = self.state.lock();
        state.last_room_id += 1;

        let created = Room {
            id: state.last_room_id,
            name: room.name.clone(),
            created_at: Utc::now(),
        };

        state.rooms.insert(
            created.id,
            RoomRecord {
                room: created.clone(),
                members: room.member_ids.clone(),
                message_ids: Vec::new(),
                last_message_at: None,
            },
        );

        Ok(created)
    }

    async fn add_member(&self, room_id: RoomId, user: &User) -> Result<bool, AppError> {
        let mut state = self.state.lock();

        let record = state
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| room_not_found(room_id))?;

        let inserted = !record.members.contains(&user.id);
        if inserted {
            record.members.push(user.id);
        }

        if user.has_username() {
            state.usernames.insert(user.id, user.username.clone());
        }

        Ok(inserted)
    }

    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> Result<bool, AppError> {
        let state = self.state.lock();
        Ok(state
            .rooms
            .get(&room_id)
            .is_some_and(|r| r.members.contains(&user_id)))
    }

    async fn member_ids(&self, room_id: RoomId) -> Result<Vec<UserId>, AppError> {
        let state = self.state.lock();
        Ok(state
            .rooms
            .get(&room_id)
            .map(|r| r.members.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: MessageId) -> Result<Option<Message>, AppError> {
        let state = self.state.lock();
        Ok(state.messages.get(&id).cloned())
    }

    async fn append(&self, message: &NewMessage) -> Result<AppendedMessage, AppError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let record = state
            .rooms
            .get_mut(&message.room_id)
            .ok_or_else(|| room_not_found(message.room_id))?;

        let key = message
            .idempotency_key
            .as_ref()
            .map(|k| (message.room_id, message.sender_id, k.clone()));

        if let Some(existing) = key.as_ref().and_then(|k| state.idempotency_keys.get(k)) {
            if let Some(stored) = state.messages.get(existing) {
                return Ok(AppendedMessage {
                    message: stored.clone(),
                    replayed: true,
                });
            }
        }

        let now = Utc::now();
        let sent_at = match record.last_message_at {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };

        state.last_message_id += 1;
        let stored = Message {
            id: state.last_message_id,
            room_id: message.room_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            attachment_url: message.attachment_url.clone(),
            reply_to: message.reply_to,
            sent_at,
            read_at: None,
        };

        record.message_ids.push(stored.id);
        record.last_message_at = Some(sent_at);
        if let Some(key) = key {
            state.idempotency_keys.insert(key, stored.id);
        }
        state.messages.insert(stored.id, stored.clone());

        Ok(AppendedMessage {
            message: stored,
            replayed: false,
        })
    }

    async fn count_by_room(&self, room_id: RoomId) -> Result<u64, AppError> {
        let state = self.state.lock();
        Ok(state
            .rooms
            .get(&room_id)
            .map(|r| r.message_ids.len() as u64)
            .unwrap_or_default())
    }

    async fn find_page(
        &self,
        room_id: RoomId,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Message>, AppError> {
        let state = self.state.lock();
        let Some(record) = state.rooms.get(&room_id) else {
            return Ok(Vec::new());
        };

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(record
            .message_ids
            .iter()
            .skip(offset)
            .take(limit as usize)
            .filter_map(|id| state.messages.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn resolve(&self, ids: &[UserId]) -> Result<Vec<User>, AppError> {
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.usernames.get(id).map(|name| User::new(*id, name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(room_id: RoomId, sender_id: UserId, content: &str) -> NewMessage {
        NewMessage {
            room_id,
            sender_id,
            content: content.into(),
            attachment_url: None,
            reply_to: None,
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn test_ids_are_issued_in_order() {
        let store = MemoryStore::new();
        let first = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();
        let second = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
    }

    #[tokio::test]
    async fn test_send_times_strictly_increase() {
        let store = MemoryStore::new();
        let room = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();

        let mut previous: Option<Message> = None;
        for i in 0..50 {
            let appended = store.append(&text(room.id, 1, &format!("m{}", i))).await.unwrap();
            if let Some(prev) = previous {
                assert!(appended.message.id > prev.id);
                assert!(appended.message.sent_at > prev.sent_at);
            }
            previous = Some(appended.message);
        }
    }

    #[tokio::test]
    async fn test_append_to_missing_room_fails() {
        let store = MemoryStore::new();
        let err = store.append(&text(9, 1, "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_idempotency_key_replays_stored_message() {
        let store = MemoryStore::new();
        let room = store.create_with_members(&NewRoom::new("a", [1, 2])).await.unwrap();

        let mut message = text(room.id, 1, "hi");
        message.idempotency_key = Some("k-1".into());

        let first = store.append(&message).await.unwrap();
        let again = store.append(&message).await.unwrap();
        assert!(!first.replayed);
        assert!(again.replayed);
        assert_eq!(first.message, again.message);
        assert_eq!(store.count_by_room(room.id).await.unwrap(), 1);

        // Same key from another sender is a different message
        message.sender_id = 2;
        let other = store.append(&message).await.unwrap();
        assert!(!other.replayed);
        assert_eq!(store.count_by_room(room.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_add_member_records_username_once() {
        let store = MemoryStore::new();
        let room = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();

        assert!(store.add_member(room.id, &User::new(2, "bob")).await.unwrap());
        assert!(!store.add_member(room.id, &User::new(2, "bob")).await.unwrap());
        assert_eq!(store.member_ids(room.id).await.unwrap(), vec![1, 2]);
        assert_eq!(store.resolve(&[1, 2]).await.unwrap(), vec![User::new(2, "bob")]);
    }

    #[tokio::test]
    async fn test_find_page_skips_and_takes() {
        let store = MemoryStore::new();
        let room = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();
        for i in 0..5 {
            store.append(&text(room.id, 1, &format!("m{}", i))).await.unwrap();
        }

        let page: Vec<String> = store
            .find_page(room.id, 2, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(page, vec!["m2".to_string(), "m3".to_string()]);
        assert!(store.find_page(room.id, 10, 2).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_stay_ordered() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let room = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(&text(room.id, 1, &format!("m{i}"))).await })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap().unwrap().message.id));
        }

        let stored = store.find_page(room.id, 0, 100).await.unwrap();
        assert_eq!(stored.len(), 100);
        for pair in stored.windows(2) {
            assert!(pair[0].id < pair[1].id);
            assert!(pair[0].sent_at < pair[1].sent_at);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_retries_store_one_message() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let room = store.create_with_members(&NewRoom::new("a", [1])).await.unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let message = NewMessage {
                        idempotency_key: Some("retry".into()),
                        ..text(room.id, 1, "once")
                    };
                    store.append(&message).await
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().message.id);
        }

        assert_eq!(ids.len(), 1);
        assert_eq!(store.count_by_room(room.id).await.unwrap(), 1);
    }
}
