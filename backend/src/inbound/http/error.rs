//! `ResponseError` for the domain [`Error`].
//!
//! Status codes follow [`ErrorCode`]. Server-side failures (5xx) are logged
//! in full and sent to the client as a generic message; the trace id is always echoed in
//! the `trace-id` header so a client report can be matched to the log line.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Message substituted for internal error details.
pub const REDACTED_MESSAGE: &str = "Internal server error";
/// Message substituted for outage details such as driver or pool errors.
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

pub(crate) fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn is_server_failure(code: ErrorCode) -> bool {
    status_for(code).is_server_error()
}

fn client_view(error: &Error) -> Error {
    let message = match error.code() {
        ErrorCode::InternalError => REDACTED_MESSAGE,
        ErrorCode::ServiceUnavailable => UNAVAILABLE_MESSAGE,
        _ => return error.clone(),
    };
    let redacted = Error::new(error.code(), message);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if is_server_failure(self.code()) {
            error!(
                code = ?self.code(),
                message = self.message(),
                trace_id = self.trace_id(),
                "request failed on the server side"
            );
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_view(self))
    }
}
