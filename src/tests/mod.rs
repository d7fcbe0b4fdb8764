mod session_tests;

use crate::core::models::{
    bill::UserId,
    event::{Action, BillSummary, Command, InboundEvent, Prompt, Reply},
    session::ConversationState,
};
use crate::core::services::ConversationController;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::sessions::in_memory::InMemorySessionStore;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub const USER: UserId = UserId(42);

/// A controller plus handles onto the stores it writes to.
pub struct TestBed {
    pub controller: ConversationController<InMemorySessionStore, InMemoryStorage, InMemoryLogging>,
    pub sessions: InMemorySessionStore,
    pub storage: InMemoryStorage,
    pub logging: InMemoryLogging,
}

pub fn create_test_controller() -> TestBed {
    let sessions = InMemorySessionStore::new();
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    TestBed {
        controller: ConversationController::new(sessions.clone(), storage.clone(), logging.clone()),
        sessions,
        storage,
        logging,
    }
}

impl TestBed {
    pub async fn command(&self, command: Command) -> Reply {
        self.controller
            .handle_event(InboundEvent::command(USER, command))
            .await
            .unwrap()
            .expect("commands always reply")
    }

    pub async fn send(&self, text: &str) -> Reply {
        self.controller
            .handle_event(InboundEvent::text(USER, text))
            .await
            .unwrap()
            .expect("active session should reply")
    }

    pub async fn press(&self, action: Action) -> Reply {
        self.controller
            .handle_event(InboundEvent::action(USER, action))
            .await
            .unwrap()
            .expect("active session should reply")
    }
}

pub fn expect_summary(reply: Reply) -> BillSummary {
    match reply.prompt {
        Prompt::BillSummary(summary) => *summary,
        other => panic!("expected bill summary, got {:?}", other),
    }
}

/// The session with its activity timestamp reset, for comparing conversation progress.
pub fn without_activity(mut state: ConversationState) -> ConversationState {
    state.updated_at = state.started_at;
    state
}
