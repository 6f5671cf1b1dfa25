//! Cookie-backed session manager.
//!
//! A session is a single `user_auth` cookie whose value is the private-jar
//! (encrypted and authenticated) encoding of `{"userId": ..., "exp": ...}`.
//! Nothing is stored server side; expiry is re-checked on every read against
//! the injected clock, so a cookie kept past `Max-Age` is still refused.

use std::sync::Arc;

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, CookieJar};
use chrono::TimeDelta;
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::session_config::SessionSettings;
use crate::domain::{Error, UserId};

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "user_auth";
/// Session lifetime in days.
pub const SESSION_TTL_DAYS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    user_id: String,
    exp: i64,
}

/// Issues, reads and clears session cookies.
#[derive(Clone)]
pub struct SessionManager {
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Create a manager using `settings` for the key and cookie attributes.
    pub fn new(settings: SessionSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// Cookie binding the client to `user_id` for [`SESSION_TTL_DAYS`].
    ///
    /// # Errors
    /// Internal error if the payload cannot be serialised.
    pub fn create_session(&self, user_id: &UserId) -> Result<Cookie<'static>, Error> {
        let expires_at = self.clock.utc() + TimeDelta::days(SESSION_TTL_DAYS);
        let payload = serde_json::to_string(&SessionPayload {
            user_id: user_id.to_string(),
            exp: expires_at.timestamp(),
        })
        .map_err(|err| Error::internal(format!("failed to encode session: {err}")))?;

        let cookie = self
            .cookie_template(payload)
            .max_age(CookieDuration::days(SESSION_TTL_DAYS))
            .finish();
        let mut jar = CookieJar::new();
        jar.private_mut(&self.settings.key).add(cookie);
        jar.get(SESSION_COOKIE_NAME)
            .cloned()
            .ok_or_else(|| Error::internal("session cookie missing after encryption"))
    }

    /// User id carried by the request's session cookie.
    pub fn read_session(&self, req: &HttpRequest) -> Option<UserId> {
        let Some(cookie) = req.cookie(SESSION_COOKIE_NAME) else {
            debug!("no session cookie");
            return None;
        };
        self.read_cookie(cookie)
    }

    /// User id carried by `cookie`, or `None` if it fails authentication,
    /// does not parse, or has expired.
    pub fn read_cookie(&self, cookie: Cookie<'static>) -> Option<UserId> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        let Some(opened) = jar.private(&self.settings.key).get(SESSION_COOKIE_NAME) else {
            debug!("session cookie failed authentication");
            return None;
        };
        let payload: SessionPayload = match serde_json::from_str(opened.value()) {
            Ok(payload) => payload,
            Err(error) => {
                debug!(%error, "session payload malformed");
                return None;
            }
        };
        if payload.exp <= self.clock.utc().timestamp() {
            debug!(exp = payload.exp, "session expired");
            return None;
        }
        match Uuid::parse_str(&payload.user_id) {
            Ok(id) => Some(UserId::from_uuid(id)),
            Err(error) => {
                debug!(%error, "session user id malformed");
                None
            }
        }
    }

    /// Removal cookie: empty value, expired, same name and path.
    pub fn destroy_session(&self) -> Cookie<'static> {
        let mut cookie = self.cookie_template(String::new()).finish();
        cookie.make_removal();
        cookie
    }

    fn cookie_template(&self, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(SESSION_COOKIE_NAME, value)
            .path("/")
            .http_only(true)
            .secure(self.settings.cookie_secure)
            .same_site(self.settings.same_site)
    }
}
