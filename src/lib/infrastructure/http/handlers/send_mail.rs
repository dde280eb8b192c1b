//! Send mail handler

use std::path::PathBuf;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::mailer::Mailer,
        dispatch::{
            content::{self, ContentSpec},
            pipeline::{DeliveryPipeline, FailurePolicy},
            request::DeliveryRequest,
        },
    },
    infrastructure::{
        http::{
            auth,
            errors::{ApiError, ErrorResponse},
            state::AppState,
        },
        markdown,
    },
};

/// Send mail request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailBody {
    /// The recipient addresses
    #[serde(default)]
    #[schema(example = json!(["a@example.com", "b@example.com"]))]
    to: Vec<String>,

    /// The message subject
    subject: Option<String>,

    /// The plain text body
    message: Option<String>,

    /// The HTML body
    html: Option<String>,

    /// Server-local path of a Markdown file to render as the HTML body
    #[schema(value_type = Option<String>)]
    markdown_file: Option<PathBuf>,
}

/// Send mail response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailResponse {
    /// Human-readable delivery summary
    #[schema(example = "Email(s) sent successfully! Successfully sent 2/2 email(s).")]
    message: String,

    /// Number of recipients the message was delivered to
    #[schema(example = 2)]
    success_count: usize,

    /// Number of recipients in the request
    #[schema(example = 2)]
    total_count: usize,
}

/// Deliver a message to each recipient in the request.
///
/// Individual recipient failures do not fail the request; the aggregate
/// counts are reported either way.
#[utoipa::path(
    post,
    operation_id = "send_mail",
    tag = "Mail",
    path = "/send_email",
    request_body = SendMailBody,
    responses(
        (status = StatusCode::OK, description = "Delivery attempted for every recipient", body = SendMailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Empty or malformed recipient list", body = ErrorResponse, example = json!({"error": "Recipient list is empty or incorrectly formatted"})),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid API key", body = ErrorResponse, example = json!({"error": "Unauthorized: Invalid or missing API key"})),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Markdown source missing or unreadable", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Service transport secret not configured", body = ErrorResponse),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    headers: HeaderMap,
    request: Result<Json<SendMailBody>, JsonRejection>,
) -> Result<Json<SendMailResponse>, ApiError> {
    auth::require_api_key(&state.config, &headers)?;

    let Json(body) = request?;

    let Some(mailer) = state.mailer.clone() else {
        error!("EMAIL_PASS environment variable not set");
        return Err(ApiError::new_500(
            "Server not configured correctly: EMAIL_PASS environment variable missing",
        ));
    };

    let request = DeliveryRequest::new(
        state.config.sender.clone(),
        body.to,
        body.subject,
        Vec::new(),
    )?;

    let content = content::resolve(
        &ContentSpec {
            text: body.message,
            html: body.html,
            markdown_file: body.markdown_file,
        },
        markdown::render,
    )?;

    let total = request.recipients().len();

    info!(recipients = total, subject = %request.subject(), "dispatching message");

    let pipeline = DeliveryPipeline::new(mailer, FailurePolicy::AttemptAll);
    let report = pipeline.deliver(&request, &content).await;

    info!(succeeded = report.succeeded(), total, "dispatch finished");

    Ok(Json(SendMailResponse {
        message: format!(
            "Email(s) sent successfully! Successfully sent {}/{} email(s).",
            report.succeeded(),
            total
        ),
        success_count: report.succeeded(),
        total_count: total,
    }))
}
