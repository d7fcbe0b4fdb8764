use crate::constants::{SESSION_EXPIRED, SESSION_STARTED};
use crate::core::errors::ValidationError;
use crate::core::models::{
    bill::UserId,
    event::{Command, InboundEvent, Prompt},
    session::{BillType, ConversationState, Step},
};
use crate::core::services::ConversationController;
use crate::infrastructure::logging::{LoggingService, in_memory::InMemoryLogging};
use crate::infrastructure::sessions::{SessionStore, in_memory::InMemorySessionStore};
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::USER;
use chrono::{TimeDelta, Utc};
use std::time::Duration;

fn half_hour_store() -> InMemorySessionStore {
    InMemorySessionStore::with_idle_timeout(Duration::from_secs(30 * 60)).unwrap()
}

fn session_idle_for(user_id: UserId, idle: TimeDelta) -> ConversationState {
    let then = Utc::now() - idle;
    ConversationState::new(user_id, BillType::Multi, then)
}

#[tokio::test]
async fn test_idle_session_is_hidden_until_evicted() {
    let store = half_hour_store();
    store
        .set(session_idle_for(USER, TimeDelta::hours(2)))
        .await
        .unwrap();

    assert!(store.get(USER).await.unwrap().is_none());
    assert_eq!(store.len().await, 1);

    assert!(store.evict_if_idle(USER, Utc::now()).await.unwrap());
    assert_eq!(store.len().await, 0);
    assert!(!store.evict_if_idle(USER, Utc::now()).await.unwrap());
}

#[tokio::test]
async fn test_evict_if_idle_keeps_live_sessions() {
    let store = half_hour_store();
    store
        .set(session_idle_for(USER, TimeDelta::minutes(10)))
        .await
        .unwrap();

    assert!(!store.evict_if_idle(USER, Utc::now()).await.unwrap());
    assert!(store.get(USER).await.unwrap().is_some());
}

#[tokio::test]
async fn test_recent_session_survives() {
    let store = half_hour_store();
    store
        .set(session_idle_for(USER, TimeDelta::minutes(5)))
        .await
        .unwrap();

    let state = store.get(USER).await.unwrap().unwrap();
    assert_eq!(state.step, Step::BillName);
    assert!(store.evict_idle(Utc::now()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_without_timeout_never_expires() {
    let store = InMemorySessionStore::new();
    store
        .set(session_idle_for(USER, TimeDelta::days(30)))
        .await
        .unwrap();

    assert!(store.get(USER).await.unwrap().is_some());
    assert!(store.evict_idle(Utc::now()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sweep_expires_only_idle_sessions() {
    let sessions = half_hour_store();
    let logging = InMemoryLogging::new();
    let controller = ConversationController::new(sessions.clone(), InMemoryStorage::new(), logging.clone());
    let active = UserId(1);
    sessions
        .set(session_idle_for(USER, TimeDelta::hours(2)))
        .await
        .unwrap();
    sessions
        .set(session_idle_for(active, TimeDelta::minutes(1)))
        .await
        .unwrap();

    let expired = controller.expire_idle_sessions().await.unwrap();

    assert_eq!(expired, 1);
    assert_eq!(sessions.len().await, 1);
    assert!(sessions.get(active).await.unwrap().is_some());
    let logs = logging.get_logs().await.unwrap();
    let expiries: Vec<_> = logs.iter().filter(|log| log.action == SESSION_EXPIRED).collect();
    assert_eq!(expiries.len(), 1);
    assert_eq!(expiries[0].user_id, Some(USER));
}

#[tokio::test]
async fn test_returning_after_timeout_expires_and_audits() {
    let sessions = half_hour_store();
    let logging = InMemoryLogging::new();
    let controller = ConversationController::new(sessions.clone(), InMemoryStorage::new(), logging.clone());
    sessions
        .set(session_idle_for(USER, TimeDelta::hours(1)))
        .await
        .unwrap();

    let reply = controller
        .handle_event(InboundEvent::text(USER, "Dinner"))
        .await
        .unwrap();

    assert!(reply.is_none());
    assert_eq!(sessions.len().await, 0);
    let logs = controller.get_app_logs(Some(USER)).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, SESSION_EXPIRED);
    assert_eq!(logs[0].details["detected_by"], "next_event");

    // Nothing left for the sweeper to report twice.
    assert_eq!(controller.expire_idle_sessions().await.unwrap(), 0);
    let expiries = logging
        .get_logs()
        .await
        .unwrap()
        .into_iter()
        .filter(|log| log.action == SESSION_EXPIRED)
        .count();
    assert_eq!(expiries, 1);
}

#[tokio::test]
async fn test_restart_after_timeout_audits_the_old_session() {
    let sessions = half_hour_store();
    let logging = InMemoryLogging::new();
    let controller = ConversationController::new(sessions.clone(), InMemoryStorage::new(), logging.clone());
    sessions
        .set(session_idle_for(USER, TimeDelta::hours(3)))
        .await
        .unwrap();

    controller
        .handle_event(InboundEvent::command(USER, Command::Single))
        .await
        .unwrap();

    let actions: Vec<_> = logging
        .get_logs_for_user(USER)
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec![SESSION_EXPIRED.to_string(), SESSION_STARTED.to_string()]);
    let state = sessions.get(USER).await.unwrap().unwrap();
    assert_eq!(state.bill_type, BillType::Single);
}

#[tokio::test]
async fn test_rejected_input_refreshes_activity() {
    let sessions = half_hour_store();
    let controller = ConversationController::new(
        sessions.clone(),
        InMemoryStorage::new(),
        InMemoryLogging::new(),
    );
    let stale = session_idle_for(USER, TimeDelta::minutes(25));
    let last_seen = stale.updated_at;
    sessions.set(stale).await.unwrap();

    let reply = controller
        .handle_event(InboundEvent::text(USER, "   "))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reply.prompt, Prompt::Rejected(ValidationError::EmptyTitle));
    let state = sessions.get(USER).await.unwrap().unwrap();
    assert_eq!(state.step, Step::BillName);
    assert!(state.updated_at > last_seen);
    // 35 minutes after the original activity, but only 10 after the retry.
    let later = last_seen + TimeDelta::minutes(35);
    assert!(sessions.evict_idle(later).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_accepted_input_refreshes_activity() {
    let sessions = half_hour_store();
    let controller = ConversationController::new(
        sessions.clone(),
        InMemoryStorage::new(),
        InMemoryLogging::new(),
    );
    let stale = session_idle_for(USER, TimeDelta::minutes(20));
    let last_seen = stale.updated_at;
    sessions.set(stale).await.unwrap();

    controller
        .handle_event(InboundEvent::text(USER, "Dinner"))
        .await
        .unwrap();

    let state = sessions.get(USER).await.unwrap().unwrap();
    assert_eq!(state.step, Step::TotalPeople);
    assert!(state.updated_at > last_seen);
    assert_eq!(state.started_at, last_seen);
}
