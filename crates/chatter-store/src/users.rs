//! Session, registration and profile operations.

use chatter_shared::constants::{AVATAR_SERVICE_URL, DEFAULT_COUNTRY};
use chatter_shared::types::{Appearance, Language, UserId};

use crate::clock::StoreOp;
use crate::error::StoreError;
use crate::models::{User, UserUpdate};
use crate::store::Store;
use crate::Result;

impl Store {
    // ------------------------------------------------------------------
    // Auth / session
    // ------------------------------------------------------------------

    /// Log in by username (case-insensitive) and set the session pointer.
    pub async fn login(&mut self, username: &str) -> Result<User> {
        self.simulate(StoreOp::Login).await;

        let user = self
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or(StoreError::NotFound("user"))?;

        tracing::debug!(uid = %user.uid.short(), "login");
        self.session = Some(user.uid);
        self.persist()?;
        Ok(user)
    }

    /// Register a new user and log them in.
    ///
    /// Usernames are unique case-insensitively; a clash fails with
    /// `Conflict`.  The new profile gets a generated uid, a default avatar
    /// derived from the username, and an empty friend list.
    pub async fn register(&mut self, username: &str, language: Option<Language>) -> Result<User> {
        self.simulate(StoreOp::Register).await;

        if self
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(username))
        {
            return Err(StoreError::Conflict("Username already taken".into()));
        }

        let user = User {
            uid: UserId::new(),
            username: username.to_string(),
            display_name: username.to_string(),
            email: String::new(),
            phone_number: String::new(),
            bio: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            avatar: format!("{AVATAR_SERVICE_URL}?name={username}&background=random"),
            language: language.unwrap_or_default(),
            appearance: Appearance::Dark,
            created_at: self.now(),
            friends: Vec::new(),
            device_tokens: Vec::new(),
        };

        tracing::debug!(uid = %user.uid.short(), username, "registered user");
        self.users.push(user.clone());
        self.session = Some(user.uid);
        self.persist()?;
        Ok(user)
    }

    /// Clear the session pointer.
    pub async fn logout(&mut self) -> Result<()> {
        self.simulate(StoreOp::Logout).await;
        self.session = None;
        self.persist()
    }

    /// Delete the logged-in user and every record referencing them: their
    /// chats, their invitations (sent or received), their call history and
    /// their walkie sessions.  Clears the session.
    pub async fn delete_account(&mut self) -> Result<()> {
        let uid = self.require_session()?;
        self.simulate(StoreOp::DeleteAccount).await;

        self.users.retain(|u| u.uid != uid);
        self.chats.retain(|c| !c.participants.contains(&uid));
        self.invitations
            .retain(|i| i.sender_id != uid && i.receiver_id != uid);
        self.calls.retain(|c| !c.participants.contains(&uid));
        self.walkie_sessions
            .retain(|s| !s.participants.contains(&uid));

        tracing::debug!(uid = %uid.short(), "account deleted");
        self.session = None;
        self.persist()
    }

    /// Clone of the logged-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.session.and_then(|uid| self.user_by_uid(uid)).cloned()
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Apply a field-level update to the logged-in user's profile.
    pub async fn update_user(&mut self, update: UserUpdate) -> Result<User> {
        let uid = self.require_session()?;

        let user = self
            .user_by_uid_mut(uid)
            .ok_or(StoreError::NotFound("user"))?;
        update.apply(user);
        let updated = user.clone();

        self.persist()?;
        Ok(updated)
    }

    /// Case-insensitive substring search over username, display name, email
    /// and phone number.  The logged-in user is excluded from results; an
    /// empty query yields nothing.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        self.simulate(StoreOp::SearchUsers).await;

        if query.is_empty() {
            return Ok(Vec::new());
        }
        let q = query.to_lowercase();

        Ok(self
            .users
            .iter()
            .filter(|u| Some(u.uid) != self.session)
            .filter(|u| {
                u.username.to_lowercase().contains(&q)
                    || u.display_name.to_lowercase().contains(&q)
                    || u.email.to_lowercase().contains(&q)
                    || u.phone_number.contains(query)
            })
            .cloned()
            .collect())
    }

    /// Look up a single user by uid.
    pub fn user(&self, uid: UserId) -> Option<User> {
        self.user_by_uid(uid).cloned()
    }

    /// Profiles of the logged-in user's accepted friends.
    pub fn friends_of_current_user(&self) -> Vec<User> {
        let Some(current) = self.session.and_then(|uid| self.user_by_uid(uid)) else {
            return Vec::new();
        };
        self.users
            .iter()
            .filter(|u| current.friends.contains(&u.uid))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{NoLatency, SteppingClock};
    use crate::storage::MemoryStorage;

    fn test_store() -> Store {
        Store::with_parts(
            Box::new(MemoryStorage::new()),
            Box::new(SteppingClock::new()),
            Box::new(NoLatency),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn registration_is_case_insensitively_unique() {
        let mut store = test_store();
        store.register("alice", None).await.unwrap();

        let err = store.register("Alice", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let err = store.register("ALICE", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_sets_session_and_defaults() {
        let mut store = test_store();
        let user = store.register("alice", Some(Language::Yue)).await.unwrap();

        assert_eq!(store.current_user().unwrap().uid, user.uid);
        assert_eq!(user.display_name, "alice");
        assert_eq!(user.country, DEFAULT_COUNTRY);
        assert_eq!(user.language, Language::Yue);
        assert_eq!(user.appearance, Appearance::Dark);
        assert!(user.friends.is_empty());
        assert!(user.avatar.contains("name=alice"));
    }

    #[tokio::test]
    async fn login_is_case_insensitive_and_fails_for_unknown() {
        let mut store = test_store();
        store.register("Alice", None).await.unwrap();
        store.logout().await.unwrap();

        let user = store.login("aLiCe").await.unwrap();
        assert_eq!(user.username, "Alice");

        let err = store.login("bob").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("user")));
    }

    #[tokio::test]
    async fn update_user_requires_session() {
        let mut store = test_store();
        let err = store.update_user(UserUpdate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));
    }

    #[tokio::test]
    async fn update_user_merges_into_collection() {
        let mut store = test_store();
        let alice = store.register("alice", None).await.unwrap();

        let updated = store
            .update_user(UserUpdate {
                bio: Some("hi there".into()),
                appearance: Some(Appearance::Light),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.bio, "hi there");
        assert_eq!(store.user(alice.uid).unwrap().bio, "hi there");
        assert_eq!(
            store.current_user().unwrap().appearance,
            Appearance::Light
        );
    }

    #[tokio::test]
    async fn search_excludes_self_and_empty_query() {
        let mut store = test_store();
        store.register("bob", None).await.unwrap();
        store.register("bobby", None).await.unwrap();
        // Session is now bobby.

        let hits = store.search_users("bob").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "bob");

        assert!(store.search_users("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_matches_profile_fields() {
        let mut store = test_store();
        store.register("carol", None).await.unwrap();
        store
            .update_user(UserUpdate {
                email: Some("carol@example.com".into()),
                phone_number: Some("+85212345678".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        store.register("dave", None).await.unwrap();

        assert_eq!(store.search_users("example.com").await.unwrap().len(), 1);
        assert_eq!(store.search_users("1234").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_account_cascades() {
        let mut store = test_store();
        let bob = store.register("bob", None).await.unwrap();
        let alice = store.register("alice", None).await.unwrap();

        let chat = store.create_chat(bob.uid).await.unwrap();
        store
            .send_invitation(crate::models::InvitationKind::Friend, bob.uid)
            .await
            .unwrap();
        store
            .add_call_record(
                crate::models::CallKind::Audio,
                bob.uid,
                crate::models::CallStatus::Outgoing,
            )
            .await
            .unwrap();

        store.delete_account().await.unwrap();

        assert!(store.user(alice.uid).is_none());
        assert!(store.current_user().is_none());
        assert!(store.chat(chat.id).await.is_err());
        assert!(store.chats.is_empty());
        assert!(store.invitations.is_empty());
        assert!(store.calls.is_empty());

        // Unrelated users survive.
        assert!(store.user(bob.uid).is_some());
    }

    #[tokio::test]
    async fn delete_account_without_session_fails() {
        let mut store = test_store();
        let err = store.delete_account().await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));
    }
}
