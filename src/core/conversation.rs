//! Per-step transition rules for the bill-building conversation.
//!
//! [`step`] is pure: it inspects one input against the session's current [`Step`],
//! mutates the session only when the input is accepted, and reports what happened.
//! Storing or deleting the session is left to the controller.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::{MAX_PARTICIPANTS, MIN_PARTICIPANTS};
use crate::core::errors::ValidationError;
use crate::core::models::{
    bill::Payment,
    event::{Action, Prompt, Reply},
    session::{BillType, ConversationState, Step},
};

/// One conversational input, after commands and menu actions have been routed away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepInput {
    Text(String),
    Choice(Action),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// Input accepted; the session was updated and must be stored.
    Continue(Reply),
    /// Input refused; the session is unchanged.
    Rejected { error: ValidationError, reply: Reply },
    /// The bill is complete: payments and total are final and settlement can run.
    Finished,
}

pub fn step(state: &mut ConversationState, input: StepInput) -> Transition {
    let result = match (state.step, input) {
        (Step::BillName, StepInput::Text(text)) => bill_name(state, &text),
        (Step::TotalPeople, StepInput::Text(text)) => total_people(state, &text),
        (Step::AddNames, StepInput::Choice(Action::AcceptNames)) => Ok(accept_names(state)),
        (Step::AddNames, StepInput::Choice(Action::DeclineNames)) => Ok(payment_branch(state, None)),
        (Step::AddNames, StepInput::Text(_)) => Err(ValidationError::ChoiceRequired),
        (Step::CollectNames, StepInput::Text(text)) => collect_names(state, &text),
        (Step::PaymentAmount, StepInput::Text(text)) => payment_amount(state, &text),
        (Step::SinglePayer, StepInput::Text(text)) => single_payer(state, &text),
        (Step::IndividualPayments, StepInput::Text(text)) => individual_payment(state, &text),
        (Step::IndividualPayments, StepInput::Choice(Action::FinishEarly)) => {
            finish_multi_payer(state)
        }
        (_, StepInput::Choice(_)) => Err(ValidationError::ActionNotAvailable),
    };

    match result {
        Ok(transition) => transition,
        Err(error) => Transition::Rejected {
            reply: Reply::with_actions(Prompt::Rejected(error.clone()), step_actions(state.step)),
            error,
        },
    }
}

/// Buttons that stay attached to a step while the user keeps answering it.
fn step_actions(step: Step) -> &'static [Action] {
    match step {
        Step::AddNames => &[Action::AcceptNames, Action::DeclineNames],
        Step::IndividualPayments => &[Action::FinishEarly],
        _ => &[],
    }
}

fn bill_name(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    state.bill.title = text.to_string();
    state.step = Step::TotalPeople;
    Ok(Transition::Continue(Reply::new(Prompt::BillNameConfirmed {
        title: state.bill.title.clone(),
    })))
}

fn total_people(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    let count: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAWholeNumber)?;
    if count < MIN_PARTICIPANTS as i64 {
        return Err(ValidationError::TooFewPeople { min: MIN_PARTICIPANTS });
    }
    let count = u8::try_from(count)
        .ok()
        .filter(|c| usize::from(*c) <= MAX_PARTICIPANTS)
        .ok_or(ValidationError::TooManyPeople { max: MAX_PARTICIPANTS })?;

    state.bill.resize_participants(count);
    state.step = Step::AddNames;
    Ok(Transition::Continue(Reply::with_actions(
        Prompt::PeopleCountConfirmed {
            count: usize::from(count),
        },
        step_actions(Step::AddNames),
    )))
}

fn accept_names(state: &mut ConversationState) -> Transition {
    state.step = Step::CollectNames;
    Transition::Continue(Reply::new(Prompt::AskNames {
        count: state.bill.participant_count(),
    }))
}

fn collect_names(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    let names: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    let expected = state.bill.participant_count();
    if names.len() != expected {
        return Err(ValidationError::NameCountMismatch {
            expected,
            got: names.len(),
        });
    }

    state.bill.participant_names = Some(names.clone());
    Ok(payment_branch(state, Some(names)))
}

/// Where a bill goes once the participants are known.
fn payment_branch(state: &mut ConversationState, names: Option<Vec<String>>) -> Transition {
    match state.bill_type {
        BillType::Single => {
            state.step = Step::PaymentAmount;
            Transition::Continue(Reply::new(Prompt::AskTotalAmount { names }))
        }
        BillType::Multi => {
            state.step = Step::IndividualPayments;
            Transition::Continue(Reply::with_actions(
                Prompt::AskFirstPayment {
                    person: state.bill.person(0),
                    names,
                },
                step_actions(Step::IndividualPayments),
            ))
        }
    }
}

fn parse_amount(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

fn payment_amount(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    let total = parse_amount(text)
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or(ValidationError::InvalidTotalAmount)?;

    state.bill.total_amount = total;
    state.step = Step::SinglePayer;
    Ok(Transition::Continue(Reply::new(Prompt::AskPayer {
        total,
        options: state.bill.people(),
    })))
}

fn single_payer(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    let max = state.bill.participant_count();
    let payer = text
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=max).contains(n))
        .ok_or(ValidationError::InvalidPersonNumber { max })?;

    let total = state.bill.total_amount;
    state.bill.payments = state
        .bill
        .participants
        .iter()
        .map(|&participant| Payment {
            participant,
            amount: if participant.index() == payer - 1 {
                total
            } else {
                Decimal::ZERO
            },
        })
        .collect();
    Ok(Transition::Finished)
}

fn individual_payment(state: &mut ConversationState, text: &str) -> Result<Transition, ValidationError> {
    let amount = parse_amount(text)
        .filter(|amount| *amount >= Decimal::ZERO)
        .ok_or(ValidationError::InvalidPayment)?;
    state
        .bill
        .total_paid()
        .and_then(|paid| paid.checked_add(amount))
        .ok_or(ValidationError::AmountTooLarge)?;

    if let Some(participant) = state.bill.next_unpaid() {
        state.bill.payments.push(Payment { participant, amount });
    }

    match state.bill.next_unpaid() {
        Some(next) => Ok(Transition::Continue(Reply::with_actions(
            Prompt::AskNextPayment {
                person: state.bill.person(next.index()),
            },
            step_actions(Step::IndividualPayments),
        ))),
        None => finish_multi_payer(state),
    }
}

/// Participants without a recorded payment count as having paid nothing.
fn finish_multi_payer(state: &mut ConversationState) -> Result<Transition, ValidationError> {
    state.bill.total_amount = state
        .bill
        .total_paid()
        .ok_or(ValidationError::AmountTooLarge)?;
    Ok(Transition::Finished)
}
