//! Chat and message operations.

use chatter_shared::types::{ChatId, MessageId, UserId};

use crate::clock::StoreOp;
use crate::error::StoreError;
use crate::models::{Chat, Message, MessageDraft, MessageUpdate};
use crate::store::Store;
use crate::Result;

impl Store {
    /// Open the direct chat with `target`, creating it if it does not exist.
    ///
    /// Idempotent: there is exactly one two-party chat per unordered pair of
    /// uids, so a second call with the same target returns the same chat.
    pub async fn create_chat(&mut self, target: UserId) -> Result<Chat> {
        let me = self.require_session()?;
        self.simulate(StoreOp::CreateChat).await;

        if self.user_by_uid(target).is_none() {
            return Err(StoreError::NotFound("user"));
        }

        if let Some(existing) = self.chats.iter().find(|c| c.is_direct_between(me, target)) {
            return Ok(existing.clone());
        }

        let chat = Chat {
            id: ChatId::new(),
            participants: vec![me, target],
            messages: Vec::new(),
            updated_at: self.now(),
            unread_count: [(me, 0), (target, 0)].into_iter().collect(),
        };

        tracing::debug!(chat = %chat.id.short(), peer = %target.short(), "chat created");
        self.chats.push(chat.clone());
        self.persist()?;
        Ok(chat)
    }

    /// Chats the logged-in user participates in, most recently updated first.
    pub async fn chats(&self) -> Vec<Chat> {
        let Some(me) = self.session else {
            return Vec::new();
        };
        let mut chats: Vec<Chat> = self
            .chats
            .iter()
            .filter(|c| c.participants.contains(&me))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        chats
    }

    /// Look up a single chat by id.
    pub async fn chat(&self, id: ChatId) -> Result<Chat> {
        self.chats
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("chat"))
    }

    /// Append a message to a chat.
    ///
    /// Stamps the id, sender and timestamp, bumps the chat's `updated_at`,
    /// and increments the unread counter of every participant except the
    /// sender by exactly one.
    pub async fn send_message(&mut self, chat_id: ChatId, draft: MessageDraft) -> Result<Message> {
        let me = self.require_session()?;
        let now = self.now();

        let chat = self
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or(StoreError::NotFound("chat"))?;

        // Timestamps stay monotonic in insertion order even if the clock
        // reads the same instant twice.
        let timestamp = match chat.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        let message = Message {
            id: MessageId::new(),
            sender_id: me,
            kind: draft.kind,
            content: draft.content,
            timestamp,
            read: false,
            transcript: None,
            summary: None,
        };

        chat.messages.push(message.clone());
        chat.updated_at = timestamp;
        for &pid in &chat.participants {
            if pid != me {
                *chat.unread_count.entry(pid).or_insert(0) += 1;
            }
        }

        tracing::debug!(chat = %chat_id.short(), message = %message.id.short(), "message sent");
        self.persist()?;
        Ok(message)
    }

    /// Apply a field-level update (read flag, annotation results) to a
    /// message.
    pub async fn update_message(
        &mut self,
        chat_id: ChatId,
        message_id: MessageId,
        update: MessageUpdate,
    ) -> Result<Message> {
        let chat = self
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or(StoreError::NotFound("chat"))?;

        let message = chat
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(StoreError::NotFound("message"))?;

        update.apply(message);
        let updated = message.clone();

        self.persist()?;
        Ok(updated)
    }

    /// Reset the logged-in user's unread counter for a chat and mark the
    /// other participants' messages as read.
    pub async fn mark_chat_read(&mut self, chat_id: ChatId) -> Result<()> {
        let me = self.require_session()?;

        let chat = self
            .chats
            .iter_mut()
            .find(|c| c.id == chat_id)
            .ok_or(StoreError::NotFound("chat"))?;

        chat.unread_count.insert(me, 0);
        for message in chat.messages.iter_mut().filter(|m| m.sender_id != me) {
            message.read = true;
        }

        self.persist()
    }
}
