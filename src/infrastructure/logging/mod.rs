pub mod in_memory;

use crate::core::errors::ShinmalError;
use crate::core::models::{audit::AppLog, bill::UserId};
use async_trait::async_trait;

/// Audit trail of what happened to bills and sessions. Diagnostics go through `tracing`.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<UserId>,
    ) -> Result<(), ShinmalError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, ShinmalError>;
    /// Entries about `user_id`, oldest first.
    async fn get_logs_for_user(&self, user_id: UserId) -> Result<Vec<AppLog>, ShinmalError>;
}
