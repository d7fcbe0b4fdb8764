pub mod in_memory;

use crate::core::errors::ShinmalError;
use crate::core::models::{bill::UserId, session::ConversationState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Holds the in-progress conversation of each user. The controller assumes events for
/// one user are delivered one at a time; implementations do not need compare-and-swap.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The user's live session. Sessions idle past the timeout read as absent but stay
    /// stored until [`SessionStore::evict_if_idle`] or [`SessionStore::evict_idle`] takes them.
    async fn get(&self, user_id: UserId) -> Result<Option<ConversationState>, ShinmalError>;
    async fn set(&self, state: ConversationState) -> Result<(), ShinmalError>;
    async fn delete(&self, user_id: UserId) -> Result<(), ShinmalError>;
    /// Drops sessions idle past the store's timeout and returns whose they were.
    async fn evict_idle(&self, now: DateTime<Utc>) -> Result<Vec<UserId>, ShinmalError>;
    /// Drops this user's session if it is idle. Returns whether one was dropped.
    async fn evict_if_idle(&self, user_id: UserId, now: DateTime<Utc>) -> Result<bool, ShinmalError>;
}
