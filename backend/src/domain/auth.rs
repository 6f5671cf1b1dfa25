//! Authentication request kinds and validated credentials.
//!
//! Inbound adapters turn submitted form fields into a [`SigninRequest`] or
//! [`SignupRequest`] (missing fields become empty strings). The validator then
//! converts those into [`SigninCredentials`] / [`SignupCredentials`], which
//! carry only values that satisfied every field rule.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use super::{EmailAddress, UserName};

/// Minimum password length, counted in characters after trimming.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Discriminator submitted with every auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    /// Log into an existing account.
    Signin,
    /// Register a new account.
    Signup,
}

impl RequestType {
    /// Wire value used by the form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Signin => "signin",
            Self::Signup => "signup",
        }
    }
}

impl FromStr for RequestType {
    type Err = UnknownRequestType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "signin" => Ok(Self::Signin),
            "signup" => Ok(Self::Signup),
            other => Err(UnknownRequestType(other.to_owned())),
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a form carries a `requestType` other than `signin`/`signup`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request type: {0}")]
pub struct UnknownRequestType(pub String);

/// Password rule violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    /// No password was supplied.
    #[error("password is required")]
    Required,
    /// Fewer than [`PASSWORD_MIN_CHARS`] characters once trimmed.
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Plain-text password that has met the length rule.
///
/// The buffer is zeroed on drop. Whitespace is kept verbatim; trimming only
/// applies to the length check.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a submitted password.
    ///
    /// # Examples
    /// ```
    /// use authgate::domain::{Password, PasswordValidationError};
    ///
    /// assert!(Password::new("secret1").is_ok());
    /// assert_eq!(
    ///     Password::new("  five ").err(),
    ///     Some(PasswordValidationError::TooShort { min: 6 })
    /// );
    /// ```
    pub fn new(raw: &str) -> Result<Self, PasswordValidationError> {
        if raw.is_empty() {
            return Err(PasswordValidationError::Required);
        }
        if raw.trim().chars().count() < PASSWORD_MIN_CHARS {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_CHARS,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Raw sign-in submission.
#[derive(Clone, PartialEq, Eq)]
pub struct SigninRequest {
    /// Submitted email.
    pub email: String,
    /// Submitted password.
    pub password: Zeroizing<String>,
}

/// Raw sign-up submission.
#[derive(Clone, PartialEq, Eq)]
pub struct SignupRequest {
    /// Submitted user name.
    pub name: String,
    /// Submitted email.
    pub email: String,
    /// Submitted password.
    pub password: Zeroizing<String>,
    /// Password confirmation.
    pub password2: Zeroizing<String>,
}

impl fmt::Debug for SigninRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Typed submission, one variant per [`RequestType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    /// Sign-in form.
    Signin(SigninRequest),
    /// Sign-up form.
    Signup(SignupRequest),
}

impl AuthRequest {
    /// Discriminator of this request.
    pub fn request_type(&self) -> RequestType {
        match self {
            Self::Signin(_) => RequestType::Signin,
            Self::Signup(_) => RequestType::Signup,
        }
    }
}

/// Sign-in credentials that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigninCredentials {
    /// Account email.
    pub email: EmailAddress,
    /// Password to verify.
    pub password: Password,
}

/// Sign-up details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    /// Requested name.
    pub name: UserName,
    /// Requested email.
    pub email: EmailAddress,
    /// Chosen password, already confirmed.
    pub password: Password,
}

/// Validated credentials, one variant per [`RequestType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Valid sign-in.
    Signin(SigninCredentials),
    /// Valid sign-up.
    Signup(SignupCredentials),
}
