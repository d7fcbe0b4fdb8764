use rust_decimal::Decimal;
use tracing::debug;

use crate::constants::SETTLEMENT_TOLERANCE;
use crate::core::models::{
    bill::BillData,
    settlement::{PersonSettlement, SettlementResult, SettlementStatus, Transfer},
};

/// Splits the bill total evenly and compares each participant's payment against the share.
pub fn calculate_settlement(bill: &BillData) -> SettlementResult {
    // individual payments are capped on entry so their sum always fits
    let total_paid = bill.total_paid().unwrap_or(Decimal::MAX);
    let count = Decimal::from(bill.participant_count());
    // participant_count is never zero once a session has passed `totalPeople`
    let per_person = bill.total_amount.checked_div(count).unwrap_or_default();

    let results: Vec<PersonSettlement> = bill
        .participants
        .iter()
        .enumerate()
        .map(|(index, &participant)| {
            let paid = bill.payment_for(participant).unwrap_or(Decimal::ZERO);
            let difference = paid - per_person;
            PersonSettlement {
                person_number: index + 1,
                participant,
                paid,
                should_pay: per_person,
                difference,
                status: SettlementStatus::classify(difference),
            }
        })
        .collect();

    let with_status = |status: SettlementStatus| -> Vec<PersonSettlement> {
        results.iter().filter(|r| r.status == status).cloned().collect()
    };
    let overpaid = with_status(SettlementStatus::Overpaid);
    let underpaid = with_status(SettlementStatus::Underpaid);
    let exact = with_status(SettlementStatus::Exact);

    debug!(
        "Settlement for '{}': total {}, per person {}, {} overpaid, {} underpaid",
        bill.title,
        bill.total_amount,
        per_person,
        overpaid.len(),
        underpaid.len()
    );

    SettlementResult {
        total_amount: bill.total_amount,
        total_paid,
        per_person,
        results,
        overpaid,
        underpaid,
        exact,
    }
}

/// Greedily matches the largest debts with the largest surpluses.
///
/// `differences[i]` is participant `i`'s `paid - should_pay`. Produces at most
/// `debtors + creditors - 1` transfers, each larger than [`SETTLEMENT_TOLERANCE`].
pub fn plan_transfers(differences: &[Decimal]) -> Vec<Transfer> {
    let mut debtors: Vec<(usize, Decimal)> = differences
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, d)| *d < Decimal::ZERO)
        .collect();
    let mut creditors: Vec<(usize, Decimal)> = differences
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, d)| *d > Decimal::ZERO)
        .collect();

    // sort_by is stable, so equal balances keep participant order
    debtors.sort_by(|a, b| a.1.cmp(&b.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));
    for debtor in &mut debtors {
        debtor.1 = debtor.1.abs();
    }

    let mut transfers = Vec::new();
    let (mut d, mut c) = (0, 0);
    while d < debtors.len() && c < creditors.len() {
        let (debtor, owed) = debtors[d];
        let (creditor, surplus) = creditors[c];
        let amount = owed.min(surplus);

        if amount > SETTLEMENT_TOLERANCE {
            transfers.push(Transfer {
                from: debtor,
                to: creditor,
                amount,
            });
        }

        debtors[d].1 = owed - amount;
        creditors[c].1 = surplus - amount;

        if debtors[d].1 < SETTLEMENT_TOLERANCE {
            d += 1;
        }
        if creditors[c].1 < SETTLEMENT_TOLERANCE {
            c += 1;
        }
    }

    debug!("Planned {} transfers: {:?}", transfers.len(), transfers);
    transfers
}
