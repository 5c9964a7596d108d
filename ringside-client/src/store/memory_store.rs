use async_trait::async_trait;
use dashmap::DashMap;
use ringside_core::{Session, SessionId, UserId};
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;
use crate::store::SessionStore;

struct SessionRecord {
    session: Session,
    participants: Vec<UserId>,
}

/// Session store kept in process memory.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions
            .get(session_id)
            .map(|record| record.session.clone())
    }

    pub fn participants(&self, session_id: &SessionId) -> Vec<UserId> {
        self.sessions
            .get(session_id)
            .map(|record| record.participants.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), StoreError> {
        debug!("Storing session {}", session.id);
        self.sessions.insert(
            session.id.clone(),
            SessionRecord {
                session: session.clone(),
                participants: Vec::new(),
            },
        );
        Ok(())
    }

    async fn add_participant(&self, session_id: &SessionId, user_id: &UserId) -> Result<(), StoreError> {
        let mut record = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))?;

        if !record.participants.contains(user_id) {
            record.participants.push(*user_id);
        }
        Ok(())
    }
}
