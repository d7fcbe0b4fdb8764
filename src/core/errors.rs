use serde::Serialize;
use thiserror::Error;

use crate::core::models::bill::UserId;

/// Why a single conversational input was rejected. The session keeps its step and data.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    #[error("Bill title cannot be empty")]
    EmptyTitle,
    #[error("Number of people must be a whole number")]
    NotAWholeNumber,
    #[error("At least {min} person is required")]
    TooFewPeople { min: usize },
    #[error("At most {max} people are supported")]
    TooManyPeople { max: usize },
    #[error("Expected {expected} names, got {got}")]
    NameCountMismatch { expected: usize, got: usize },
    #[error("Total amount must be a number greater than 0")]
    InvalidTotalAmount,
    #[error("Person number must be between 1 and {max}")]
    InvalidPersonNumber { max: usize },
    #[error("Payment must be a number of at least 0")]
    InvalidPayment,
    #[error("Payments add up to more than can be recorded")]
    AmountTooLarge,
    #[error("Please answer using the buttons")]
    ChoiceRequired,
    #[error("That action is not available at this step")]
    ActionNotAvailable,
}

#[derive(Error, Debug, Serialize)]
pub enum ShinmalError {
    /// Event for a user without an active session
    #[error("No active session for user {0}")]
    MissingSession(UserId),

    /// Inbound event carried no user identity
    #[error("Unable to identify the sender")]
    UnidentifiableActor,

    /// Command or action name the gateway does not know
    #[error("Unknown input: {0}")]
    UnknownInput(String),

    #[error("Bill {0} not found")]
    BillNotFound(String),

    #[error("Failed to persist bill: {0}")]
    PersistenceFailure(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Session store error: {0}")]
    SessionStoreError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}
