//! Sign-in, sign-up and sign-out handlers.
//!
//! ```text
//! GET  /auth/signin    form description, or 303 /profile when signed in
//! POST /auth/signin    requestType=signin|signup&email=..&password=..
//! POST /auth/signout   303 /auth/signout, clears the session cookie
//! GET  /auth/signout   303 /auth/signin
//! ```

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Credentials, FieldErrors, RequestType, SigninCredentials, SignupCredentials, SignupError, User,
    validate_request,
};

use super::current_user::{SIGNIN_PATH, SessionUser};
use super::forms::{
    AuthForm, FormErrorBody, FormFields, FormRejection, INVALID_CREDENTIALS_MESSAGE,
};
use super::state::HttpState;

/// Landing page after a successful sign-in or sign-up.
pub const PROFILE_PATH: &str = "/profile";
/// Signed-out landing page.
pub const SIGNOUT_PATH: &str = "/auth/signout";

/// Description of the auth form for anonymous visitors.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SigninPage {
    /// Accepted `requestType` values.
    pub request_types: Vec<String>,
}

fn see_other(location: &'static str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// Show the auth form, or skip it when already signed in.
#[utoipa::path(
    get,
    path = "/auth/signin",
    responses(
        (status = 200, description = "Form description", body = SigninPage),
        (status = 303, description = "Already signed in; redirect to /profile"),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "signinPage"
)]
#[get("/signin")]
pub async fn signin_page(session: SessionUser) -> HttpResponse {
    if session.0.is_some() {
        return see_other(PROFILE_PATH);
    }
    HttpResponse::Ok().json(SigninPage {
        request_types: [RequestType::Signin, RequestType::Signup]
            .iter()
            .map(|kind| kind.as_str().to_owned())
            .collect(),
    })
}

/// Sign in or sign up, depending on `requestType`.
#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body(content = AuthForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in; redirect to /profile",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid fields or credentials", body = FormErrorBody),
        (status = 409, description = "Name or email already registered", body = FormErrorBody),
        (status = 500, description = "Internal failure", body = FormErrorBody)
    ),
    tags = ["auth"],
    operation_id = "submitAuthForm"
)]
#[post("/signin")]
pub async fn submit_auth_form(
    state: web::Data<HttpState>,
    form: web::Form<AuthForm>,
) -> Result<HttpResponse, FormRejection> {
    let form = form.into_inner();
    let fields = form.echo();
    let request = form
        .into_request()
        .map_err(|errors| FormRejection::invalid(fields.clone(), errors))?;
    let credentials = validate_request(&request)
        .map_err(|errors| FormRejection::invalid(fields.clone(), errors))?;

    let user = match credentials {
        Credentials::Signin(credentials) => signin(&state, &credentials, &fields).await?,
        Credentials::Signup(credentials) => signup(&state, &credentials, &fields).await?,
    };

    let cookie = state
        .sessions
        .create_session(user.id())
        .map_err(|err| FormRejection::internal(fields.clone(), &err))?;
    info!(user_id = %user.id(), request_type = %request.request_type(), "session started");
    Ok(HttpResponse::SeeOther()
        .insert_header((LOCATION, PROFILE_PATH))
        .cookie(cookie)
        .finish())
}

async fn signin(
    state: &HttpState,
    credentials: &SigninCredentials,
    fields: &FormFields,
) -> Result<User, FormRejection> {
    match state.credentials.signin(credentials).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(FormRejection::invalid(
            fields.clone(),
            FieldErrors::form(INVALID_CREDENTIALS_MESSAGE),
        )),
        Err(err) => Err(FormRejection::internal(fields.clone(), &err)),
    }
}

async fn signup(
    state: &HttpState,
    credentials: &SignupCredentials,
    fields: &FormFields,
) -> Result<User, FormRejection> {
    state
        .credentials
        .register(credentials)
        .await
        .map_err(|err| match err {
            SignupError::Conflict(errors) => FormRejection::conflict(fields.clone(), errors),
            SignupError::Internal(cause) => FormRejection::internal(fields.clone(), &cause),
        })
}

/// End the session.
#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 303, description = "Session cleared; redirect to /auth/signout",
            headers(("Set-Cookie" = String, description = "Expired session cookie")))
    ),
    tags = ["auth"],
    operation_id = "signout"
)]
#[post("/signout")]
pub async fn signout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, SIGNOUT_PATH))
        .cookie(state.sessions.destroy_session())
        .finish()
}

/// Signed-out landing; sends the visitor back to the sign-in page.
#[utoipa::path(
    get,
    path = "/auth/signout",
    responses((status = 303, description = "Redirect to /auth/signin")),
    tags = ["auth"],
    operation_id = "signedOut"
)]
#[get("/signout")]
pub async fn signed_out() -> HttpResponse {
    see_other(SIGNIN_PATH)
}
