use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::bill::{BillData, UserId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    /// One person paid the whole bill.
    Single,
    /// Several people paid different amounts.
    Multi,
}

impl std::fmt::Display for BillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BillType::Single => "single",
            BillType::Multi => "multi",
        };
        write!(f, "{}", s)
    }
}

/// Stage of the bill-building conversation. Finishing a bill removes the session,
/// so there is no terminal variant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    BillName,
    TotalPeople,
    AddNames,
    CollectNames,
    PaymentAmount,
    SinglePayer,
    IndividualPayments,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    pub user_id: UserId,
    pub step: Step,
    pub bill_type: BillType,
    pub bill: BillData,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(user_id: UserId, bill_type: BillType, now: DateTime<Utc>) -> Self {
        ConversationState {
            user_id,
            step: Step::BillName,
            bill_type,
            bill: BillData::default(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn is_idle(&self, now: DateTime<Utc>, timeout: TimeDelta) -> bool {
        now - self.updated_at > timeout
    }
}
