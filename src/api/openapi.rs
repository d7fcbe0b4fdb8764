use utoipa::OpenApi;

use crate::{
    api::models::{ButtonView, ErrorResponse, InboundEventRequest, InputPayload, RenderedReply},
    core::models::{
        audit::AppLog,
        bill::{BillRecord, ParticipantId, UserId},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::post_event,
        super::handlers::get_bill,
        super::handlers::get_user_bills,
        super::handlers::get_app_logs
    ),
    components(schemas(
        InboundEventRequest,
        InputPayload,
        RenderedReply,
        ButtonView,
        ErrorResponse,
        BillRecord,
        ParticipantId,
        UserId,
        AppLog
    )),
    info(
        title = "Shin Mal API",
        description = "Messaging gateway for the bill-splitting conversation",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
