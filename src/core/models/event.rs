use rust_decimal::Decimal;
use std::str::FromStr;

use super::bill::{BillRecord, PersonLabel, UserId};
use super::session::BillType;
use super::settlement::{SettlementResult, Transfer};
use crate::core::errors::{ShinmalError, ValidationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Single,
    Multi,
    /// Legacy entry point without an explicit bill type; behaves like `Multi`.
    NewBill,
    Menu,
    Help,
}

impl FromStr for Command {
    type Err = ShinmalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/') {
            "start" => Ok(Command::Start),
            "single" => Ok(Command::Single),
            "multi" => Ok(Command::Multi),
            "newbill" => Ok(Command::NewBill),
            "menu" => Ok(Command::Menu),
            "help" => Ok(Command::Help),
            other => Err(ShinmalError::UnknownInput(format!("command `{}`", other))),
        }
    }
}

/// Button callbacks the gateway can deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    AcceptNames,
    DeclineNames,
    FinishEarly,
    ShowMenu,
    Help,
    ViewBills,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::AcceptNames => "add_names_yes",
            Action::DeclineNames => "add_names_no",
            Action::FinishEarly => "finish_bill",
            Action::ShowMenu => "menu",
            Action::Help => "help",
            Action::ViewBills => "view_bills",
        }
    }
}

impl FromStr for Action {
    type Err = ShinmalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add_names_yes" => Ok(Action::AcceptNames),
            "add_names_no" => Ok(Action::DeclineNames),
            "finish_bill" => Ok(Action::FinishEarly),
            "menu" => Ok(Action::ShowMenu),
            "help" => Ok(Action::Help),
            "view_bills" => Ok(Action::ViewBills),
            other => Err(ShinmalError::UnknownInput(format!("action `{}`", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Action(Action),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: Option<UserId>,
    pub input: Input,
}

impl InboundEvent {
    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        InboundEvent {
            user_id: Some(user_id),
            input: Input::Text(text.into()),
        }
    }

    pub fn action(user_id: UserId, action: Action) -> Self {
        InboundEvent {
            user_id: Some(user_id),
            input: Input::Action(action),
        }
    }

    pub fn command(user_id: UserId, command: Command) -> Self {
        InboundEvent {
            user_id: Some(user_id),
            input: Input::Command(command),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BillSummary {
    pub title: String,
    pub people: Vec<PersonLabel>,
    pub settlement: SettlementResult,
    pub transfers: Vec<Transfer>,
}

/// Language-neutral description of one outgoing message. The gateway owns the wording.
#[derive(Clone, Debug, PartialEq)]
pub enum Prompt {
    Welcome,
    Menu,
    Help,
    CannotIdentify,
    ProcessingError,
    BillHistory {
        bills: Vec<BillRecord>,
    },
    StartBillCreation {
        bill_type: BillType,
    },
    BillNameConfirmed {
        title: String,
    },
    PeopleCountConfirmed {
        count: usize,
    },
    AskNames {
        count: usize,
    },
    /// Single-payer bills ask for the total next. `names` is set right after collection.
    AskTotalAmount {
        names: Option<Vec<String>>,
    },
    AskPayer {
        total: Decimal,
        options: Vec<PersonLabel>,
    },
    /// Multi-payer bills ask each person in turn. `names` is set right after collection.
    AskFirstPayment {
        person: PersonLabel,
        names: Option<Vec<String>>,
    },
    AskNextPayment {
        person: PersonLabel,
    },
    Rejected(ValidationError),
    BillSummary(Box<BillSummary>),
    SaveFailed {
        reason: String,
        fallback: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub prompt: Prompt,
    pub actions: Vec<Action>,
}

impl Reply {
    pub fn new(prompt: Prompt) -> Self {
        Reply {
            prompt,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(prompt: Prompt, actions: &[Action]) -> Self {
        Reply {
            prompt,
            actions: actions.to_vec(),
        }
    }
}
