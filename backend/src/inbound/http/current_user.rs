//! Extractors resolving the signed-in user from the session cookie.
//!
//! [`SessionUser`] never rejects an anonymous request; [`CurrentUser`]
//! answers one with `303 See Other` to the sign-in page.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

use super::state::HttpState;

/// Sign-in page anonymous visitors are sent to.
pub const SIGNIN_PATH: &str = "/auth/signin";

/// The session's user, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Option<User>);

/// The session's user; anonymous requests are redirected to sign in.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Rejection for protected views reached without a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SigninRedirect;

impl fmt::Display for SigninRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("sign-in required")
    }
}

impl ResponseError for SigninRedirect {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((LOCATION, SIGNIN_PATH))
            .finish()
    }
}

async fn resolve(req: HttpRequest) -> Result<Option<User>, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let user_id = state.sessions.read_session(&req);
    state.gate.resolve_current_user(user_id.as_ref()).await
}

impl FromRequest for SessionUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve(req).await.map(SessionUser) })
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match resolve(req).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => Err(SigninRedirect.into()),
            }
        })
    }
}
