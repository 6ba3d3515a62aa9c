//! Call history operations.

use chatter_shared::types::{CallId, UserId};

use crate::models::{CallKind, CallRecord, CallStatus};
use crate::store::Store;
use crate::Result;

impl Store {
    /// Record a call with `peer`.  Records are kept newest first.
    pub async fn add_call_record(
        &mut self,
        kind: CallKind,
        peer: UserId,
        status: CallStatus,
    ) -> Result<CallRecord> {
        let me = self.require_session()?;

        let record = CallRecord {
            id: CallId::new(),
            participants: vec![me, peer],
            kind,
            status,
            timestamp: self.now(),
            duration: None,
        };

        self.calls.insert(0, record.clone());
        self.persist()?;
        Ok(record)
    }

    /// Call records involving the logged-in user, newest first.
    pub async fn call_history(&self) -> Vec<CallRecord> {
        let Some(me) = self.session else {
            return Vec::new();
        };
        self.calls
            .iter()
            .filter(|c| c.participants.contains(&me))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{NoLatency, SteppingClock};
    use crate::error::StoreError;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn history_is_newest_first_and_scoped_to_caller() {
        let mut store = Store::with_parts(
            Box::new(MemoryStorage::new()),
            Box::new(SteppingClock::new()),
            Box::new(NoLatency),
        )
        .unwrap();
        let bob = store.register("bob", None).await.unwrap();
        store.register("carol", None).await.unwrap();
        store.register("alice", None).await.unwrap();

        store
            .add_call_record(CallKind::Audio, bob.uid, CallStatus::Outgoing)
            .await
            .unwrap();
        store
            .add_call_record(CallKind::Video, bob.uid, CallStatus::Missed)
            .await
            .unwrap();

        let history = store.call_history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, CallKind::Video);
        assert_eq!(history[1].kind, CallKind::Audio);
        assert!(history[0].timestamp > history[1].timestamp);

        // Carol was never on a call.
        store.login("carol").await.unwrap();
        assert!(store.call_history().await.is_empty());
    }

    #[tokio::test]
    async fn recording_a_call_requires_session() {
        let mut store = Store::with_parts(
            Box::new(MemoryStorage::new()),
            Box::new(SteppingClock::new()),
            Box::new(NoLatency),
        )
        .unwrap();
        let err = store
            .add_call_record(CallKind::Audio, UserId::new(), CallStatus::Incoming)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated));
    }
}
