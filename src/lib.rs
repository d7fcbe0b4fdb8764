pub mod api;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::{ShinmalError, ValidationError};
pub use crate::core::services::ConversationController;
pub use infrastructure::logging::in_memory::InMemoryLogging;
pub use infrastructure::sessions::in_memory::InMemorySessionStore;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
