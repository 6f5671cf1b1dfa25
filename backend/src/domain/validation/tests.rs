//! Tests for sign-in and sign-up field validation.

use super::*;
use rstest::rstest;
use zeroize::Zeroizing;

fn signin(email: &str, password: &str) -> SigninRequest {
    SigninRequest {
        email: email.to_owned(),
        password: Zeroizing::new(password.to_owned()),
    }
}

fn signup(name: &str, email: &str, password: &str, password2: &str) -> SignupRequest {
    SignupRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: Zeroizing::new(password.to_owned()),
        password2: Zeroizing::new(password2.to_owned()),
    }
}

fn errors_for(request: &AuthRequest) -> FieldErrors {
    validate_request(request).err().unwrap_or_default()
}

#[rstest]
fn valid_signin_yields_credentials() {
    let credentials = validate_signin(&signin("a@b.com", "secret1")).expect("valid signin");
    assert_eq!(credentials.email.as_ref(), "a@b.com");
    assert_eq!(credentials.password.expose(), "secret1");
}

#[rstest]
fn valid_signup_yields_credentials() {
    let credentials =
        validate_signup(&signup(" alice ", "a@b.com", "secret1", "secret1")).expect("valid");
    assert_eq!(credentials.name.as_ref(), "alice");
    assert_eq!(credentials.email.as_ref(), "a@b.com");
}

#[rstest]
#[case("a@b.com")]
#[case("not-an-email")]
#[case("")]
fn five_character_password_is_rejected_for_any_email(#[case] email: &str) {
    let errors = errors_for(&AuthRequest::Signin(signin(email, "12345")));
    assert_eq!(errors.get(Field::Password), Some(SHORT_PASSWORD_MESSAGE));
}

#[rstest]
#[case("plainaddress")]
#[case("a@b")]
#[case("a@b.c")]
#[case("@b.com")]
fn malformed_email_is_reported_for_both_request_types(#[case] email: &str) {
    let signin_errors = errors_for(&AuthRequest::Signin(signin(email, "secret1")));
    let signup_errors = errors_for(&AuthRequest::Signup(signup("alice", email, "secret1", "secret1")));

    assert_eq!(signin_errors.get(Field::Email), Some(INVALID_EMAIL_MESSAGE));
    assert_eq!(signup_errors.get(Field::Email), Some(INVALID_EMAIL_MESSAGE));
}

#[rstest]
#[case("secret1", "secret2")]
#[case("secret1", "secret1 ")]
#[case("abc", "abd")]
fn mismatched_confirmation_reports_password2(#[case] password: &str, #[case] password2: &str) {
    let errors = errors_for(&AuthRequest::Signup(signup("alice", "a@b.com", password, password2)));
    assert_eq!(errors.get(Field::Password2), Some(PASSWORD_MISMATCH_MESSAGE));
}

#[rstest]
fn mismatch_message_wording_is_stable() {
    assert_eq!(PASSWORD_MISMATCH_MESSAGE, "Passwords don't match!");
}

#[rstest]
fn missing_confirmation_is_required() {
    let errors = errors_for(&AuthRequest::Signup(signup("alice", "a@b.com", "secret1", "")));
    assert_eq!(errors.get(Field::Password2), Some(REQUIRED_MESSAGE));
}

#[rstest]
fn empty_signup_reports_every_field_at_once() {
    let errors = errors_for(&AuthRequest::Signup(signup("", "", "", "")));
    let fields: Vec<Field> = errors.fields().collect();

    assert_eq!(
        fields,
        vec![Field::Name, Field::Email, Field::Password, Field::Password2]
    );
    for field in fields {
        assert_eq!(errors.get(field), Some(REQUIRED_MESSAGE));
    }
}

#[rstest]
fn empty_signin_reports_email_and_password_only() {
    let errors = errors_for(&AuthRequest::Signin(signin("", "")));
    let fields: Vec<Field> = errors.fields().collect();
    assert_eq!(fields, vec![Field::Email, Field::Password]);
}

#[rstest]
fn valid_requests_produce_no_errors() {
    assert!(errors_for(&AuthRequest::Signin(signin("a@b.com", "secret1"))).is_empty());
    assert!(
        errors_for(&AuthRequest::Signup(signup("alice", "a@b.com", "secret1", "secret1"))).is_empty()
    );
}

#[rstest]
fn field_errors_serialise_with_wire_names() {
    let mut errors = FieldErrors::form("Invalid credentials!");
    errors.insert(Field::Password2, PASSWORD_MISMATCH_MESSAGE);

    let value = serde_json::to_value(&errors).expect("serialise errors");
    assert_eq!(
        value,
        serde_json::json!({
            "password2": PASSWORD_MISMATCH_MESSAGE,
            "formErrors": "Invalid credentials!",
        })
    );
}

