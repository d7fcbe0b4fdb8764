use crate::core::errors::ShinmalError;
use crate::core::models::{bill::UserId, session::ConversationState};
use crate::infrastructure::sessions::SessionStore;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, ConversationState>>>,
    idle_timeout: Option<TimeDelta>,
}

impl InMemorySessionStore {
    /// A store that never expires sessions.
    pub fn new() -> Self {
        InMemorySessionStore::default()
    }

    pub fn with_idle_timeout(timeout: std::time::Duration) -> Result<Self, ShinmalError> {
        let timeout = TimeDelta::from_std(timeout)
            .map_err(|e| ShinmalError::SessionStoreError(format!("Failed to convert idle timeout: {}", e)))?;
        Ok(InMemorySessionStore {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: Some(timeout),
        })
    }

    fn is_expired(&self, state: &ConversationState, now: DateTime<Utc>) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| state.is_idle(now, timeout))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<ConversationState>, ShinmalError> {
        let sessions = self.sessions.read().await;
        let now = Utc::now();
        Ok(sessions
            .get(&user_id)
            .filter(|state| !self.is_expired(state, now))
            .cloned())
    }

    async fn set(&self, state: ConversationState) -> Result<(), ShinmalError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(state.user_id, state);
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), ShinmalError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&user_id);
        Ok(())
    }

    async fn evict_idle(&self, now: DateTime<Utc>) -> Result<Vec<UserId>, ShinmalError> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<UserId> = sessions
            .values()
            .filter(|state| self.is_expired(state, now))
            .map(|state| state.user_id)
            .collect();
        for user_id in &expired {
            sessions.remove(user_id);
        }
        Ok(expired)
    }

    async fn evict_if_idle(&self, user_id: UserId, now: DateTime<Utc>) -> Result<bool, ShinmalError> {
        let sessions = self.sessions.read().await;
        if !sessions.get(&user_id).is_some_and(|state| self.is_expired(state, now)) {
            return Ok(false);
        }
        drop(sessions); // Release read lock before acquiring write lock
        let mut sessions = self.sessions.write().await;
        // Re-check: the session may have been replaced while the lock was released
        match sessions.get(&user_id) {
            Some(state) if self.is_expired(state, now) => {
                sessions.remove(&user_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
