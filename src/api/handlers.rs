use crate::{
    api::{
        models::*,
        render::render,
    },
    core::{
        errors::ShinmalError,
        models::{
            audit::AppLog,
            bill::{BillRecord, UserId},
            event::{InboundEvent, Prompt, Reply},
        },
        services::ConversationController,
    },
    infrastructure::{
        logging::in_memory::InMemoryLogging, sessions::in_memory::InMemorySessionStore,
        storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

pub type Controller = ConversationController<InMemorySessionStore, InMemoryStorage, InMemoryLogging>;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Controller>,
    /// Held for the whole of one event so session updates never interleave.
    pub event_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(controller: Arc<Controller>) -> Self {
        AppState {
            controller,
            event_gate: Arc::new(Mutex::new(())),
        }
    }
}

// Define API routes
pub fn api_routes(controller: Arc<Controller>) -> Router {
    Router::new()
        .route("/events", axum::routing::post(post_event))
        .route("/bills/{bill_id}", axum::routing::get(get_bill))
        .route("/users/{user_id}/bills", axum::routing::get(get_user_bills))
        .route("/logs", axum::routing::get(get_app_logs))
        .with_state(AppState::new(controller))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = InboundEventRequest,
    responses(
        (status = 200, description = "Event processed; reply to deliver", body = RenderedReply),
        (status = 204, description = "Event ignored (no active session)"),
        (status = 400, description = "Unknown command or action", body = ErrorResponse)
    )
)]
async fn post_event(
    State(state): State<AppState>,
    Json(req): Json<InboundEventRequest>,
) -> Result<Response, ApiError> {
    let event = InboundEvent::try_from(req)?;
    let _gate = state.event_gate.lock().await;
    match state.controller.handle_event(event).await {
        Ok(Some(reply)) => Ok((StatusCode::OK, Json(render(&reply))).into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            error!("Failed to process event: {}", e);
            Ok((StatusCode::OK, Json(render(&Reply::new(Prompt::ProcessingError)))).into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/bills/{bill_id}",
    params(
        ("bill_id" = String, Path, description = "ID of the bill")
    ),
    responses(
        (status = 200, description = "Bill retrieved successfully", body = BillRecord),
        (status = 404, description = "Bill not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<String>,
) -> Result<Json<BillRecord>, ApiError> {
    let bill = state
        .controller
        .get_bill(&bill_id)
        .await?
        .ok_or(ShinmalError::BillNotFound(bill_id))?;
    Ok(Json(bill))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/bills",
    params(
        ("user_id" = i64, Path, description = "ID of the user who created the bills")
    ),
    responses(
        (status = 200, description = "Bills retrieved successfully", body = Vec<BillRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_user_bills(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BillRecord>>, ApiError> {
    let bills = state.controller.get_bills(UserId(user_id)).await?;
    Ok(Json(bills))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    params(LogQuery),
    responses(
        (status = 200, description = "Application logs retrieved successfully", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_app_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = state.controller.get_app_logs(query.user_id.map(UserId)).await?;
    Ok(Json(logs))
}
