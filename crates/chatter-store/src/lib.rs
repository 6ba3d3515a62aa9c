//! # chatter-store
//!
//! Local persistence for the Chatter application, backed by a key-value
//! storage engine holding one JSON record per collection.
//!
//! The crate exposes a [`Store`] handle that owns every domain collection
//! (users, chats, invitations, call history, walkie sessions) plus the
//! logged-in session pointer, and provides typed operations for each.  Every
//! mutation is followed by an all-or-nothing serialize of the affected
//! records; the store rehydrates from storage on open.

pub mod calls;
pub mod chats;
pub mod clock;
pub mod invitations;
pub mod migrations;
pub mod models;
pub mod storage;
pub mod store;
pub mod users;
pub mod walkie;

mod error;

pub use clock::{
    Clock, LatencyPolicy, NoLatency, SimulatedLatency, SteppingClock, StoreOp, SystemClock,
};
pub use error::StoreError;
pub use models::*;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::Store;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
