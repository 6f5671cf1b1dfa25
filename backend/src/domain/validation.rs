//! Field validation for sign-in and sign-up submissions.
//!
//! Validation is pure and total. Every rule for the request type runs in the
//! fixed order name, email, password, password2, and all failures are
//! reported together.

use std::collections::BTreeMap;

use serde::Serialize;

use super::auth::{
    AuthRequest, Credentials, Password, PasswordValidationError, SigninCredentials,
    SigninRequest, SignupCredentials, SignupRequest,
};
use super::{EmailAddress, UserName, UserValidationError};

/// Message for a missing required field.
pub const REQUIRED_MESSAGE: &str = "This field is required";
/// Message for an email that fails the pattern check.
pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email!";
/// Message for a password shorter than the minimum.
pub const SHORT_PASSWORD_MESSAGE: &str = "Password must be at least six characters!";
/// Message for a confirmation that differs from the password.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords don't match!";

/// Form field that can carry an error; ordering follows evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Field {
    /// `name`
    #[serde(rename = "name")]
    Name,
    /// `email`
    #[serde(rename = "email")]
    Email,
    /// `password`
    #[serde(rename = "password")]
    Password,
    /// `password2`
    #[serde(rename = "password2")]
    Password2,
    /// Form-level messages not attributable to one field.
    #[serde(rename = "formErrors")]
    Form,
}

/// Mapping from field to human-readable message.
///
/// Serialises as a JSON object keyed by the wire field names.
///
/// # Examples
/// ```
/// use authgate::domain::{Field, FieldErrors};
///
/// let mut errors = FieldErrors::default();
/// errors.insert(Field::Email, "Please provide a valid email!");
/// assert_eq!(
///     serde_json::to_string(&errors).unwrap(),
///     r#"{"email":"Please provide a valid email!"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// Single form-level message.
    pub fn form(message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.insert(Field::Form, message);
        errors
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields carrying errors in evaluation order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

fn user_message(error: &UserValidationError) -> &'static str {
    match error {
        UserValidationError::InvalidEmail => INVALID_EMAIL_MESSAGE,
        UserValidationError::Required
        | UserValidationError::EmptyId
        | UserValidationError::InvalidId => REQUIRED_MESSAGE,
    }
}

fn password_message(error: &PasswordValidationError) -> &'static str {
    match error {
        PasswordValidationError::Required => REQUIRED_MESSAGE,
        PasswordValidationError::TooShort { .. } => SHORT_PASSWORD_MESSAGE,
    }
}

fn check<T, E>(
    errors: &mut FieldErrors,
    field: Field,
    result: Result<T, E>,
    message: impl Fn(&E) -> &'static str,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.insert(field, message(&error));
            None
        }
    }
}

/// Validate a sign-in submission.
pub fn validate_signin(request: &SigninRequest) -> Result<SigninCredentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    let email = check(&mut errors, Field::Email, EmailAddress::new(&request.email), user_message);
    let password = check(
        &mut errors,
        Field::Password,
        Password::new(&request.password),
        password_message,
    );

    match (email, password) {
        (Some(email), Some(password)) => Ok(SigninCredentials { email, password }),
        _ => Err(errors),
    }
}

/// Validate a sign-up submission.
///
/// # Examples
/// ```
/// use authgate::domain::{validate_signup, Field, SignupRequest};
/// use zeroize::Zeroizing;
///
/// let errors = validate_signup(&SignupRequest {
///     name: String::new(),
///     email: "nope".into(),
///     password: Zeroizing::new("secret1".into()),
///     password2: Zeroizing::new("secret2".into()),
/// })
/// .unwrap_err();
/// let fields: Vec<Field> = errors.fields().collect();
/// assert_eq!(fields, vec![Field::Name, Field::Email, Field::Password2]);
/// ```
pub fn validate_signup(request: &SignupRequest) -> Result<SignupCredentials, FieldErrors> {
    let mut errors = FieldErrors::default();
    let name = check(&mut errors, Field::Name, UserName::new(&request.name), user_message);
    let email = check(&mut errors, Field::Email, EmailAddress::new(&request.email), user_message);
    let password = check(
        &mut errors,
        Field::Password,
        Password::new(&request.password),
        password_message,
    );

    if request.password2.is_empty() {
        errors.insert(Field::Password2, REQUIRED_MESSAGE);
    } else if request.password2.as_str() != request.password.as_str() {
        errors.insert(Field::Password2, PASSWORD_MISMATCH_MESSAGE);
    }

    match (name, email, password) {
        (Some(name), Some(email), Some(password)) if errors.is_empty() => {
            Ok(SignupCredentials {
                name,
                email,
                password,
            })
        }
        _ => Err(errors),
    }
}

/// Validate either request kind into typed credentials.
pub fn validate_request(request: &AuthRequest) -> Result<Credentials, FieldErrors> {
    match request {
        AuthRequest::Signin(signin) => validate_signin(signin).map(Credentials::Signin),
        AuthRequest::Signup(signup) => validate_signup(signup).map(Credentials::Signup),
    }
}

#[cfg(test)]
mod tests;
