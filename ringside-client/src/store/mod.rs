//! Persistence of session records, consumed by the initiating side.

mod memory_store;

pub use memory_store::MemorySessionStore;

use async_trait::async_trait;
use ringside_core::{Session, SessionId, UserId};

use crate::error::StoreError;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Marks `user_id` as invited to the session.
    async fn add_participant(&self, session_id: &SessionId, user_id: &UserId) -> Result<(), StoreError>;
}
