//! Walkie-talkie session operations.
//!
//! Sessions are only ever created by [`Store::respond_to_invitation`]
//! accepting a walkie invitation; this module reads and ends them.

use chatter_shared::types::WalkieId;

use crate::error::StoreError;
use crate::models::WalkieSession;
use crate::store::Store;
use crate::Result;

impl Store {
    /// Active sessions involving the logged-in user.
    pub async fn active_walkie_sessions(&self) -> Vec<WalkieSession> {
        let Some(me) = self.session else {
            return Vec::new();
        };
        self.walkie_sessions
            .iter()
            .filter(|s| s.active && s.participants.contains(&me))
            .cloned()
            .collect()
    }

    /// Deactivate a session.  The record stays for history; only the
    /// `active` flag flips.
    pub async fn end_walkie_session(&mut self, id: WalkieId) -> Result<()> {
        self.require_session()?;

        let session = self
            .walkie_sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound("walkie session"))?;
        session.active = false;

        tracing::debug!(session = %id.short(), "walkie session ended");
        self.persist()
    }
}
