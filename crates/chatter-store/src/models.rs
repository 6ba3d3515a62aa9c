//! Domain model structs persisted in the local key-value storage.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can round-trip
//! through the durable JSON records and be handed directly to the UI layer.
//! Field names serialize in camelCase, matching the storage layout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatter_shared::types::{
    Appearance, CallId, ChatId, InviteId, Language, MessageId, UserId, WalkieId,
};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier, immutable once created.
    pub uid: UserId,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Name shown in chat lists; defaults to the username.
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
    pub bio: String,
    pub country: String,
    /// Avatar image URL.
    pub avatar: String,
    pub language: Language,
    pub appearance: Appearance,
    pub created_at: DateTime<Utc>,
    /// Uids of accepted friends.
    pub friends: Vec<UserId>,
    /// Push notification tokens for this user's devices.
    #[serde(default)]
    pub device_tokens: Vec<String>,
}

/// Field-level profile update.  Fields left `None` are untouched.
///
/// The uid, username and friend list are deliberately not updatable here:
/// the uid is immutable, the username is a uniqueness anchor, and friends
/// change only through invitation acceptance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub avatar: Option<String>,
    pub language: Option<Language>,
    pub appearance: Option<Appearance>,
    pub device_tokens: Option<Vec<String>>,
}

impl UserUpdate {
    pub(crate) fn apply(self, user: &mut User) {
        if let Some(v) = self.display_name {
            user.display_name = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.phone_number {
            user.phone_number = v;
        }
        if let Some(v) = self.bio {
            user.bio = v;
        }
        if let Some(v) = self.country {
            user.country = v;
        }
        if let Some(v) = self.avatar {
            user.avatar = v;
        }
        if let Some(v) = self.language {
            user.language = v;
        }
        if let Some(v) = self.appearance {
            user.appearance = v;
        }
        if let Some(v) = self.device_tokens {
            user.device_tokens = v;
        }
    }
}

// ---------------------------------------------------------------------------
// Chat and messages
// ---------------------------------------------------------------------------

/// A conversation between two or more participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: ChatId,
    /// Participant uids.  Direct chats have exactly two.
    pub participants: Vec<UserId>,
    /// Append-only message list, oldest first.
    pub messages: Vec<Message>,
    /// Bumped on every appended message; chat lists sort on this.
    pub updated_at: DateTime<Utc>,
    /// Per-participant count of unseen messages.
    pub unread_count: HashMap<UserId, u32>,
}

impl Chat {
    /// Whether this is the direct chat between `a` and `b` (order ignored).
    pub fn is_direct_between(&self, a: UserId, b: UserId) -> bool {
        self.participants.len() == 2
            && self.participants.contains(&a)
            && self.participants.contains(&b)
    }
}

/// Payload kind of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Audio,
    Video,
    Sticker,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Text content, or a data URL for media kinds.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Speech transcript for audio/video messages, once annotated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Short content summary for video messages, once annotated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Caller-supplied part of a new message.  Id, sender and timestamp are
/// stamped by the store on send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
}

impl MessageDraft {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            content: content.into(),
        }
    }
}

/// Field-level message update (annotation results, read flag).
#[derive(Debug, Clone, Default)]
pub struct MessageUpdate {
    pub read: Option<bool>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
}

impl MessageUpdate {
    pub(crate) fn apply(self, message: &mut Message) {
        if let Some(v) = self.read {
            message.read = v;
        }
        if let Some(v) = self.transcript {
            message.transcript = Some(v);
        }
        if let Some(v) = self.summary {
            message.summary = Some(v);
        }
    }
}

// ---------------------------------------------------------------------------
// Invitation
// ---------------------------------------------------------------------------

/// What an invitation asks the receiver to join.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationKind {
    Friend,
    Walkie,
    Location,
    Group,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

/// A directed, typed request awaiting accept/decline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: InviteId,
    #[serde(rename = "type")]
    pub kind: InvitationKind,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub status: InvitationStatus,
    pub timestamp: DateTime<Utc>,
    /// Kind-specific extra payload (e.g. a location or a group id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Call history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Missed,
    Incoming,
    Outgoing,
}

/// One entry in the call history, newest first in the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    pub id: CallId,
    pub participants: Vec<UserId>,
    #[serde(rename = "type")]
    pub kind: CallKind,
    pub status: CallStatus,
    pub timestamp: DateTime<Utc>,
    /// Call duration in seconds, absent for missed calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

// ---------------------------------------------------------------------------
// Walkie session
// ---------------------------------------------------------------------------

/// An active push-to-talk channel between two accepted participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalkieSession {
    pub id: WalkieId,
    pub participants: Vec<UserId>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
