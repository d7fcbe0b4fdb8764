use crate::core::errors::ShinmalError;
use crate::core::models::{audit::AppLog, bill::UserId};
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only audit trail. Entries are also indexed by the user they concern.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<Vec<AppLog>>>,
    logs_by_user: Arc<RwLock<HashMap<UserId, Vec<usize>>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        InMemoryLogging::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<UserId>,
    ) -> Result<(), ShinmalError> {
        let details = match details {
            serde_json::Value::Null => HashMap::new(),
            serde_json::Value::Object(map) => map.into_iter().collect(),
            other => {
                return Err(ShinmalError::LoggingError(format!(
                    "Audit details for {} must be a JSON object, got {}",
                    action, other
                )));
            }
        };
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id,
            details,
            timestamp: chrono::Utc::now(),
        };

        let mut logs = self.logs.write().await;
        if let Some(user_id) = user_id {
            let mut logs_by_user = self.logs_by_user.write().await;
            logs_by_user.entry(user_id).or_default().push(logs.len());
        }
        logs.push(entry);
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, ShinmalError> {
        let logs = self.logs.read().await;
        Ok(logs.clone())
    }

    async fn get_logs_for_user(&self, user_id: UserId) -> Result<Vec<AppLog>, ShinmalError> {
        let logs = self.logs.read().await;
        let logs_by_user = self.logs_by_user.read().await;
        Ok(logs_by_user
            .get(&user_id)
            .map(|positions| positions.iter().filter_map(|&i| logs.get(i).cloned()).collect())
            .unwrap_or_default())
    }
}
