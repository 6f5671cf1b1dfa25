//! Domain primitives, services and ports.
//!
//! Purpose: hold the credential and session-free core of sign-in/sign-up.
//! Nothing here knows about HTTP or cookies; inbound adapters translate
//! requests into these types and map [`Error`] back out.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserId, UserName, EmailAddress, PasswordHash, NewUser: records.
//! - AuthRequest and friends: typed form submissions and validated credentials.
//! - validate_request and friends: the field validator.
//! - CredentialService: sign-in verification and sign-up.
//! - AccessGate: current-user resolution for protected views.

pub mod access;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod validation;

pub use self::access::AccessGate;
pub use self::auth::{
    AuthRequest, Credentials, PASSWORD_MIN_CHARS, Password, PasswordValidationError, RequestType,
    SigninCredentials, SigninRequest, SignupCredentials, SignupRequest, UnknownRequestType,
};
pub use self::credentials::{CredentialService, SignupError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, NewUser, PasswordHash, User, UserId, UserName, UserValidationError};
pub use self::validation::{
    Field, FieldErrors, validate_request, validate_signin, validate_signup,
};
