//! Protected views returning the signed-in user.
//!
//! ```text
//! GET /          {"id": "...", "name": "alice", "email": "a@b.com"}
//! GET /profile   same contract
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

use super::current_user::CurrentUser;

/// Public view of a user; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
        }
    }
}

/// Home page for the signed-in user.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Signed-in user", body = UserResponse),
        (status = 303, description = "No session; redirect to /auth/signin"),
        (status = 503, description = "User store unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "home"
)]
#[get("/")]
pub async fn home(user: CurrentUser) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(&user.0))
}

/// Profile page for the signed-in user.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Signed-in user", body = UserResponse),
        (status = 303, description = "No session; redirect to /auth/signin"),
        (status = 503, description = "User store unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "profile"
)]
#[get("/profile")]
pub async fn profile(user: CurrentUser) -> web::Json<UserResponse> {
    web::Json(UserResponse::from(&user.0))
}
