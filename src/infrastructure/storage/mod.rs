use crate::core::errors::ShinmalError;
use crate::core::models::bill::{BillRecord, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait BillStore: Send + Sync {
    async fn save_bill(&self, bill: BillRecord) -> Result<(), ShinmalError>;
    async fn get_bill(&self, bill_id: &str) -> Result<Option<BillRecord>, ShinmalError>;
    /// Bills created by `user_id`, oldest first.
    async fn get_bills_by_creator(&self, user_id: UserId) -> Result<Vec<BillRecord>, ShinmalError>;
}

pub mod in_memory;
