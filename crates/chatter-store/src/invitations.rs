//! Invitation operations: the social-graph entry point.
//!
//! Friend lists are never edited directly; they only change when a friend
//! invitation is accepted.  Walkie sessions likewise only come into being
//! through an accepted walkie invitation.

use chatter_shared::types::{InviteId, UserId, WalkieId};

use crate::error::StoreError;
use crate::models::{Invitation, InvitationKind, InvitationStatus, WalkieSession};
use crate::store::Store;
use crate::Result;

impl Store {
    /// Send a typed invitation to another user.
    ///
    /// At most one *pending* invitation may exist per (kind, sender,
    /// receiver) triple; a duplicate fails with `Conflict`.  A declined or
    /// accepted invitation does not block a new one.
    pub async fn send_invitation(
        &mut self,
        kind: InvitationKind,
        receiver_id: UserId,
    ) -> Result<Invitation> {
        let me = self.require_session()?;

        if self.user_by_uid(receiver_id).is_none() {
            return Err(StoreError::NotFound("user"));
        }

        let duplicate = self.invitations.iter().any(|i| {
            i.kind == kind
                && i.sender_id == me
                && i.receiver_id == receiver_id
                && i.status == InvitationStatus::Pending
        });
        if duplicate {
            return Err(StoreError::Conflict("Invitation already sent".into()));
        }

        let invitation = Invitation {
            id: InviteId::new(),
            kind,
            sender_id: me,
            receiver_id,
            status: InvitationStatus::Pending,
            timestamp: self.now(),
            metadata: None,
        };

        tracing::debug!(
            invite = %invitation.id.short(),
            ?kind,
            receiver = %receiver_id.short(),
            "invitation sent"
        );
        self.invitations.push(invitation.clone());
        self.persist()?;
        Ok(invitation)
    }

    /// Pending invitations where the logged-in user is sender or receiver.
    pub async fn pending_invitations(&self) -> Vec<Invitation> {
        let Some(me) = self.session else {
            return Vec::new();
        };
        self.invitations
            .iter()
            .filter(|i| {
                (i.receiver_id == me || i.sender_id == me)
                    && i.status == InvitationStatus::Pending
            })
            .cloned()
            .collect()
    }

    /// Accept or decline an invitation.
    ///
    /// Accepting a friend invitation adds each party to the other's friend
    /// list; the membership check makes a repeated accept a no-op, so friend
    /// lists never hold duplicates.  Accepting a walkie invitation creates
    /// an active [`WalkieSession`] between the two participants.
    pub async fn respond_to_invitation(&mut self, id: InviteId, accept: bool) -> Result<()> {
        self.require_session()?;

        let invitation = self
            .invitations
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(StoreError::NotFound("invitation"))?;

        invitation.status = if accept {
            InvitationStatus::Accepted
        } else {
            InvitationStatus::Declined
        };
        let kind = invitation.kind;
        let sender_id = invitation.sender_id;
        let receiver_id = invitation.receiver_id;

        if accept && kind == InvitationKind::Friend {
            if let Some(sender) = self.user_by_uid_mut(sender_id) {
                if !sender.friends.contains(&receiver_id) {
                    sender.friends.push(receiver_id);
                }
            }
            if let Some(receiver) = self.user_by_uid_mut(receiver_id) {
                if !receiver.friends.contains(&sender_id) {
                    receiver.friends.push(sender_id);
                }
            }
        }

        if accept && kind == InvitationKind::Walkie {
            let session = WalkieSession {
                id: WalkieId::new(),
                participants: vec![sender_id, receiver_id],
                active: true,
                created_at: self.now(),
            };
            tracing::debug!(session = %session.id.short(), "walkie session started");
            self.walkie_sessions.push(session);
        }

        tracing::debug!(invite = %id.short(), accept, "invitation answered");
        self.persist()
    }
}
