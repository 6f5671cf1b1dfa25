//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::SigninPage;
use crate::inbound::http::forms::{AuthForm, FormErrorBody, FormFields};
use crate::inbound::http::session::SESSION_COOKIE_NAME;
use crate::inbound::http::users::UserResponse;

/// Registers the session cookie security scheme.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /auth/signin.",
            ))),
        );
    }
}

/// OpenAPI document for the service.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "authgate",
        description = "Sign-in, sign-up and cookie sessions."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::auth::signin_page,
        crate::inbound::http::auth::submit_auth_form,
        crate::inbound::http::auth::signout,
        crate::inbound::http::auth::signed_out,
        crate::inbound::http::users::home,
        crate::inbound::http::users::profile,
    ),
    components(schemas(
        AuthForm,
        Error,
        ErrorCode,
        FormErrorBody,
        FormFields,
        SigninPage,
        UserResponse
    )),
    tags(
        (name = "auth", description = "Sign-in, sign-up and sign-out"),
        (name = "users", description = "Views of the signed-in user")
    )
)]
pub struct ApiDoc;
