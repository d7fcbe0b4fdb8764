use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity of a gateway user (the chat platform's numeric id).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session-local participant slot. Slot 0 is always the user who started the bill.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u8);

impl ParticipantId {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

/// How a participant is shown to the user: a 1-based number and, if collected, a name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonLabel {
    pub number: usize,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillData {
    pub title: String,
    pub total_amount: Decimal,
    pub participants: Vec<ParticipantId>,
    pub participant_names: Option<Vec<String>>,
    pub payments: Vec<Payment>,
}

impl Default for BillData {
    fn default() -> Self {
        BillData {
            title: String::new(),
            total_amount: Decimal::ZERO,
            participants: vec![ParticipantId(0)],
            participant_names: None,
            payments: Vec::new(),
        }
    }
}

impl BillData {
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Replaces the participant list with `count` fresh slots, initiator first.
    pub fn resize_participants(&mut self, count: u8) {
        self.participants = (0..count).map(ParticipantId).collect();
    }

    pub fn person(&self, index: usize) -> PersonLabel {
        PersonLabel {
            number: index + 1,
            name: self
                .participant_names
                .as_ref()
                .and_then(|names| names.get(index))
                .cloned(),
        }
    }

    pub fn people(&self) -> Vec<PersonLabel> {
        (0..self.participant_count()).map(|i| self.person(i)).collect()
    }

    pub fn payment_for(&self, participant: ParticipantId) -> Option<Decimal> {
        self.payments
            .iter()
            .find(|p| p.participant == participant)
            .map(|p| p.amount)
    }

    /// Sum of recorded payments, or `None` if it does not fit in a `Decimal`.
    pub fn total_paid(&self) -> Option<Decimal> {
        self.payments
            .iter()
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount))
    }

    /// The first participant, in order, that has no payment recorded yet.
    pub fn next_unpaid(&self) -> Option<ParticipantId> {
        self.participants.get(self.payments.len()).copied()
    }
}

/// The durable form of a finished bill. The settlement itself is never stored.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BillRecord {
    pub id: String,
    pub title: String,
    pub total_amount: Decimal,
    pub participants: Vec<ParticipantId>,
    pub participant_names: Option<Vec<String>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl BillRecord {
    pub fn finalize(bill: &BillData, created_by: UserId, created_at: DateTime<Utc>) -> Self {
        BillRecord {
            id: Uuid::new_v4().to_string(),
            title: bill.title.clone(),
            total_amount: bill.total_amount,
            participants: bill.participants.clone(),
            participant_names: bill.participant_names.clone(),
            created_by,
            created_at,
        }
    }
}
