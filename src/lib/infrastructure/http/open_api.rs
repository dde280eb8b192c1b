//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{errors::ErrorResponse, handlers::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Mail Dispatch"),
    paths(send_mail::handler, health::handler),
    components(schemas(
        send_mail::SendMailBody,
        send_mail::SendMailResponse,
        health::HealthResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
