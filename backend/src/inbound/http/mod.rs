//! HTTP inbound adapter: auth form, sign-out and protected views.
//!
//! [`configure`] registers every route; callers supply the
//! [`state::HttpState`] as `web::Data` and wrap the app in
//! [`crate::Trace`].

use actix_web::web;

pub mod auth;
pub mod current_user;
pub mod error;
pub mod forms;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

/// Register the auth and user routes.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use authgate::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signin_page)
            .service(auth::submit_auth_form)
            .service(auth::signout)
            .service(auth::signed_out),
    )
    .service(users::home)
    .service(users::profile);
}
