use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bill::ParticipantId;
use crate::constants::SETTLEMENT_TOLERANCE;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Overpaid,
    Underpaid,
    Exact,
}

impl SettlementStatus {
    pub fn classify(difference: Decimal) -> Self {
        if difference > SETTLEMENT_TOLERANCE {
            SettlementStatus::Overpaid
        } else if difference < -SETTLEMENT_TOLERANCE {
            SettlementStatus::Underpaid
        } else {
            SettlementStatus::Exact
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonSettlement {
    pub person_number: usize,
    pub participant: ParticipantId,
    pub paid: Decimal,
    pub should_pay: Decimal,
    /// `paid - should_pay`; positive means the person is owed money.
    pub difference: Decimal,
    pub status: SettlementStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SettlementResult {
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub per_person: Decimal,
    pub results: Vec<PersonSettlement>,
    pub overpaid: Vec<PersonSettlement>,
    pub underpaid: Vec<PersonSettlement>,
    pub exact: Vec<PersonSettlement>,
}

impl SettlementResult {
    pub fn differences(&self) -> Vec<Decimal> {
        self.results.iter().map(|r| r.difference).collect()
    }
}

/// A recommendation for one participant to pay another. Indices are 0-based positions
/// in the bill's participant list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transfer {
    pub from: usize,
    pub to: usize,
    pub amount: Decimal,
}
