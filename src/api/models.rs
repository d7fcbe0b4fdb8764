use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::ShinmalError;
use crate::core::models::{
    bill::UserId,
    event::{InboundEvent, Input},
};

#[derive(Deserialize, ToSchema)]
pub struct InboundEventRequest {
    /// Sender identity as reported by the chat platform.
    pub user_id: Option<i64>,
    pub input: InputPayload,
}

#[derive(Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputPayload {
    Command { name: String },
    Action { name: String },
    Text { text: String },
}

impl TryFrom<InboundEventRequest> for InboundEvent {
    type Error = ShinmalError;

    fn try_from(req: InboundEventRequest) -> Result<Self, Self::Error> {
        let input = match req.input {
            InputPayload::Command { name } => Input::Command(name.parse()?),
            InputPayload::Action { name } => Input::Action(name.parse()?),
            InputPayload::Text { text } => Input::Text(text),
        };
        Ok(InboundEvent {
            user_id: req.user_id.map(UserId),
            input,
        })
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogQuery {
    /// Only entries about this user.
    pub user_id: Option<i64>,
}

#[derive(Serialize, ToSchema, Debug, PartialEq)]
pub struct ButtonView {
    pub label: String,
    /// Callback name to send back as an `action` input.
    pub action: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct RenderedReply {
    pub text: String,
    pub buttons: Vec<ButtonView>,
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for ShinmalError to implement IntoResponse
pub struct ApiError(pub ShinmalError);

impl From<ShinmalError> for ApiError {
    fn from(err: ShinmalError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            ShinmalError::UnknownInput(_) => StatusCode::BAD_REQUEST,
            ShinmalError::UnidentifiableActor => StatusCode::UNAUTHORIZED,
            ShinmalError::MissingSession(_) | ShinmalError::BillNotFound(_) => StatusCode::NOT_FOUND,
            ShinmalError::PersistenceFailure(_)
            | ShinmalError::StorageError(_)
            | ShinmalError::SessionStoreError(_)
            | ShinmalError::LoggingError(_)
            | ShinmalError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
