//! Sign-in/sign-up credential handling and cookie sessions.
//!
//! - [`domain`]: validation, credential service and access gate.
//! - [`inbound::http`]: actix-web handlers, session cookies and extractors.
//! - [`outbound`]: bcrypt hashing and user repositories.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// OpenAPI surface used by Swagger UI.
pub use doc::ApiDoc;
pub use middleware::Trace;
