use crate::constants::{
    BILL_FINALIZED, BILL_PERSISTENCE_FAILED, BILLS_QUERIED, SESSION_EXPIRED, SESSION_STARTED,
};
use crate::core::conversation::{StepInput, Transition, step};
use crate::core::errors::ShinmalError;
use crate::core::models::{
    audit::AppLog,
    bill::{BillRecord, UserId},
    event::{Action, BillSummary, Command, InboundEvent, Input, Prompt, Reply},
    session::{BillType, ConversationState},
};
use crate::core::settlement::{calculate_settlement, plan_transfers};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::sessions::SessionStore;
use crate::infrastructure::storage::BillStore;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Drives each user's bill conversation one event at a time.
///
/// Callers must not hand it two events for the same user concurrently: a session is
/// read, advanced and written back without any compare-and-swap.
pub struct ConversationController<S: SessionStore, B: BillStore, L: LoggingService> {
    sessions: S,
    storage: B,
    logging: L,
}

impl<S: SessionStore, B: BillStore, L: LoggingService> ConversationController<S, B, L> {
    pub fn new(sessions: S, storage: B, logging: L) -> Self {
        ConversationController {
            sessions,
            storage,
            logging,
        }
    }

    /// Processes one inbound event. `Ok(None)` means the event was deliberately ignored
    /// (no active session) and nothing should be sent back.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<Option<Reply>, ShinmalError> {
        match self.dispatch(event).await {
            Err(ShinmalError::UnidentifiableActor) => {
                warn!("Rejecting event without a user identity");
                Ok(Some(Reply::new(Prompt::CannotIdentify)))
            }
            Err(ShinmalError::MissingSession(user_id)) => {
                debug!("Ignoring input from user {} without an active session", user_id);
                Ok(None)
            }
            other => other.map(Some),
        }
    }

    async fn dispatch(&self, event: InboundEvent) -> Result<Reply, ShinmalError> {
        let user_id = event.user_id.ok_or(ShinmalError::UnidentifiableActor)?;
        match event.input {
            Input::Command(command) => self.handle_command(user_id, command).await,
            Input::Action(Action::ShowMenu) => Ok(menu()),
            Input::Action(Action::Help) => Ok(Reply::new(Prompt::Help)),
            Input::Action(Action::ViewBills) => self.bill_history(user_id).await,
            Input::Action(action) => self.advance(user_id, StepInput::Choice(action)).await,
            Input::Text(text) => self.advance(user_id, StepInput::Text(text)).await,
        }
    }

    async fn handle_command(&self, user_id: UserId, command: Command) -> Result<Reply, ShinmalError> {
        match command {
            Command::Start => Ok(Reply::new(Prompt::Welcome)),
            Command::Single => self.start_session(user_id, BillType::Single).await,
            Command::Multi | Command::NewBill => self.start_session(user_id, BillType::Multi).await,
            Command::Menu => Ok(menu()),
            Command::Help => Ok(Reply::new(Prompt::Help)),
        }
    }

    /// Opens a fresh session, replacing any unfinished one the user had.
    pub async fn start_session(&self, user_id: UserId, bill_type: BillType) -> Result<Reply, ShinmalError> {
        info!("User {} starting a {} payer bill", user_id, bill_type);
        self.expire_if_idle(user_id).await?;
        let state = ConversationState::new(user_id, bill_type, Utc::now());
        self.sessions.set(state).await?;
        self.audit(SESSION_STARTED, json!({ "bill_type": bill_type }), Some(user_id))
            .await;
        Ok(Reply::new(Prompt::StartBillCreation { bill_type }))
    }

    async fn advance(&self, user_id: UserId, input: StepInput) -> Result<Reply, ShinmalError> {
        self.expire_if_idle(user_id).await?;
        let mut state = self
            .sessions
            .get(user_id)
            .await?
            .ok_or(ShinmalError::MissingSession(user_id))?;
        debug!("User {} at step {:?} sent {:?}", user_id, state.step, input);

        match step(&mut state, input) {
            Transition::Continue(reply) => {
                state.updated_at = Utc::now();
                self.sessions.set(state).await?;
                Ok(reply)
            }
            Transition::Rejected { error, reply } => {
                debug!("Rejected input from user {}: {}", user_id, error);
                // A user retrying bad input is still active
                state.updated_at = Utc::now();
                self.sessions.set(state).await?;
                Ok(reply)
            }
            Transition::Finished => self.finish(state).await,
        }
    }

    /// Settles a completed bill, persists its record and ends the session.
    async fn finish(&self, state: ConversationState) -> Result<Reply, ShinmalError> {
        self.sessions.delete(state.user_id).await?;

        let settlement = calculate_settlement(&state.bill);
        let transfers = plan_transfers(&settlement.differences());
        let record = BillRecord::finalize(&state.bill, state.user_id, Utc::now());
        let bill_id = record.id.clone();

        if let Err(e) = self.storage.save_bill(record).await {
            let failure = ShinmalError::PersistenceFailure(e.to_string());
            error!("Bill '{}' for user {}: {}", state.bill.title, state.user_id, failure);
            self.audit(
                BILL_PERSISTENCE_FAILED,
                json!({ "title": state.bill.title, "error": failure.to_string() }),
                Some(state.user_id),
            )
            .await;
            let fallback = serde_json::to_string_pretty(&settlement)
                .map_err(|e| ShinmalError::InternalServerError(format!("Failed to serialize settlement: {}", e)))?;
            return Ok(Reply::new(Prompt::SaveFailed {
                reason: failure.to_string(),
                fallback,
            }));
        }

        info!(
            "Bill {} '{}' finalized by user {}: {} people, {} transfers",
            bill_id,
            state.bill.title,
            state.user_id,
            state.bill.participant_count(),
            transfers.len()
        );
        self.audit(
            BILL_FINALIZED,
            json!({
                "bill_id": bill_id,
                "bill_type": state.bill_type,
                "total_amount": state.bill.total_amount,
                "participants": state.bill.participant_count(),
                "transfers": transfers.len(),
            }),
            Some(state.user_id),
        )
        .await;

        Ok(Reply::new(Prompt::BillSummary(Box::new(BillSummary {
            title: state.bill.title.clone(),
            people: state.bill.people(),
            settlement,
            transfers,
        }))))
    }

    async fn bill_history(&self, user_id: UserId) -> Result<Reply, ShinmalError> {
        let bills = self.storage.get_bills_by_creator(user_id).await?;
        self.audit(BILLS_QUERIED, json!({ "count": bills.len() }), Some(user_id))
            .await;
        Ok(Reply::new(Prompt::BillHistory { bills }))
    }

    /// Drops abandoned sessions. Returns how many were removed.
    pub async fn expire_idle_sessions(&self) -> Result<usize, ShinmalError> {
        let expired = self.sessions.evict_idle(Utc::now()).await?;
        for user_id in &expired {
            self.record_expiry(*user_id, "sweep").await;
        }
        Ok(expired.len())
    }

    /// Catches a session that went idle before the sweeper got to it.
    async fn expire_if_idle(&self, user_id: UserId) -> Result<(), ShinmalError> {
        if self.sessions.evict_if_idle(user_id, Utc::now()).await? {
            self.record_expiry(user_id, "next_event").await;
        }
        Ok(())
    }

    async fn record_expiry(&self, user_id: UserId, detected_by: &str) {
        info!("Session of user {} expired ({})", user_id, detected_by);
        self.audit(SESSION_EXPIRED, json!({ "detected_by": detected_by }), Some(user_id))
            .await;
    }

    pub async fn get_bills(&self, user_id: UserId) -> Result<Vec<BillRecord>, ShinmalError> {
        self.storage.get_bills_by_creator(user_id).await
    }

    pub async fn get_bill(&self, bill_id: &str) -> Result<Option<BillRecord>, ShinmalError> {
        self.storage.get_bill(bill_id).await
    }

    /// Audit entries, optionally only those about one user.
    pub async fn get_app_logs(&self, user_id: Option<UserId>) -> Result<Vec<AppLog>, ShinmalError> {
        match user_id {
            Some(user_id) => self.logging.get_logs_for_user(user_id).await,
            None => self.logging.get_logs().await,
        }
    }

    // An audit write failing must not cost the user their reply.
    async fn audit(&self, action: &str, details: serde_json::Value, user_id: Option<UserId>) {
        if let Err(e) = self.logging.log_action(action, details, user_id).await {
            warn!("Failed to record {} audit entry: {}", action, e);
        }
    }
}

fn menu() -> Reply {
    Reply::with_actions(Prompt::Menu, &[Action::ViewBills, Action::Help])
}
