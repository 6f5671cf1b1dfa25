//! Wire shape of the combined sign-in/sign-up form and its rejections.
//!
//! A rejected submission answers with `{"fields": ..., "fieldErrors": ...}`
//! so the client can re-render the form. `fields` echoes what the user typed
//! except passwords.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    AuthRequest, Error, FieldErrors, RequestType, SigninRequest, SignupRequest, TRACE_ID_HEADER,
    TraceId,
};

/// Form-level message for a sign-in that does not match an account.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials!";
/// Form-level message for any internal failure.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Something went wrong! Try again later.";
/// Form-level message for a missing or unknown `requestType`.
pub const MALFORMED_FORM_MESSAGE: &str = "Form not submitted correctly.";

/// URL-encoded body of `POST /auth/signin`.
///
/// Every field is optional on the wire; absent fields read as empty and are
/// reported by validation.
#[derive(Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthForm {
    /// `signin` or `signup`.
    #[serde(default)]
    pub request_type: Option<String>,
    /// Sign-up only.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Sign-up only: password confirmation.
    #[serde(default)]
    pub password2: String,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("request_type", &self.request_type)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Non-secret fields echoed back on rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    pub name: String,
    pub email: String,
}

impl AuthForm {
    /// Fields safe to echo.
    pub fn echo(&self) -> FormFields {
        FormFields {
            request_type: self.request_type.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Typed submission for the declared request type.
    ///
    /// # Errors
    /// Form-level error when `requestType` is missing or unknown.
    pub fn into_request(self) -> Result<AuthRequest, FieldErrors> {
        let Some(Ok(request_type)) = self.request_type.as_deref().map(str::parse::<RequestType>)
        else {
            return Err(FieldErrors::form(MALFORMED_FORM_MESSAGE));
        };
        let password = Zeroizing::new(self.password);
        Ok(match request_type {
            RequestType::Signin => AuthRequest::Signin(SigninRequest {
                email: self.email,
                password,
            }),
            RequestType::Signup => AuthRequest::Signup(SignupRequest {
                name: self.name,
                email: self.email,
                password,
                password2: Zeroizing::new(self.password2),
            }),
        })
    }
}

/// JSON body of a rejected submission.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormErrorBody {
    pub fields: FormFields,
    /// Field name (or `formErrors`) to message.
    #[schema(value_type = Object)]
    pub field_errors: FieldErrors,
}

/// Rejected submission with its status code.
#[derive(Debug, Clone)]
pub struct FormRejection {
    status: StatusCode,
    body: FormErrorBody,
}

impl FormRejection {
    fn new(status: StatusCode, fields: FormFields, field_errors: FieldErrors) -> Self {
        Self {
            status,
            body: FormErrorBody {
                fields,
                field_errors,
            },
        }
    }

    /// `400`: validation failed or credentials did not match.
    pub fn invalid(fields: FormFields, field_errors: FieldErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, fields, field_errors)
    }

    /// `409`: name or email already registered.
    pub fn conflict(fields: FormFields, field_errors: FieldErrors) -> Self {
        Self::new(StatusCode::CONFLICT, fields, field_errors)
    }

    /// `500`: the cause is logged and replaced by a generic message.
    pub fn internal(fields: FormFields, cause: &Error) -> Self {
        error!(
            code = ?cause.code(),
            message = cause.message(),
            trace_id = cause.trace_id(),
            "auth form failed internally"
        );
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            fields,
            FieldErrors::form(INTERNAL_FAILURE_MESSAGE),
        )
    }

    /// Response body.
    pub fn body(&self) -> &FormErrorBody {
        &self.body
    }
}

impl fmt::Display for FormRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auth form rejected with {}", self.status)
    }
}

impl ResponseError for FormRejection {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        if let Some(id) = TraceId::current() {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(&self.body)
    }
}
