use crate::core::errors::ShinmalError;
use crate::core::models::bill::{BillRecord, UserId};
use crate::infrastructure::storage::BillStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    bills: Arc<RwLock<HashMap<String, BillRecord>>>,
    bills_by_creator: Arc<RwLock<HashMap<UserId, Vec<String>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

#[async_trait]
impl BillStore for InMemoryStorage {
    async fn save_bill(&self, bill: BillRecord) -> Result<(), ShinmalError> {
        let mut bills = self.bills.write().await;
        if bills.contains_key(&bill.id) {
            return Err(ShinmalError::StorageError(format!("Bill {} already exists", bill.id)));
        }
        let mut bills_by_creator = self.bills_by_creator.write().await;
        bills_by_creator
            .entry(bill.created_by)
            .or_default()
            .push(bill.id.clone());
        bills.insert(bill.id.clone(), bill);
        Ok(())
    }

    async fn get_bill(&self, bill_id: &str) -> Result<Option<BillRecord>, ShinmalError> {
        let bills = self.bills.read().await;
        Ok(bills.get(bill_id).cloned())
    }

    async fn get_bills_by_creator(&self, user_id: UserId) -> Result<Vec<BillRecord>, ShinmalError> {
        let bills = self.bills.read().await;
        let bills_by_creator = self.bills_by_creator.read().await;
        Ok(bills_by_creator
            .get(&user_id)
            .map(|ids| ids.iter().filter_map(|id| bills.get(id).cloned()).collect())
            .unwrap_or_default())
    }
}
