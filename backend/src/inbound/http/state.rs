//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only reach the domain via
//! the services it bundles, so they can be exercised with in-memory ports.

use std::sync::Arc;

use crate::domain::{AccessGate, CredentialService};

use super::session::SessionManager;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-in verification and sign-up.
    pub credentials: Arc<CredentialService>,
    /// Current-user resolution for protected views.
    pub gate: AccessGate,
    /// Session cookie issue and verification.
    pub sessions: SessionManager,
}

impl HttpState {
    /// Bundle the services handlers depend on.
    pub fn new(credentials: CredentialService, gate: AccessGate, sessions: SessionManager) -> Self {
        Self {
            credentials: Arc::new(credentials),
            gate,
            sessions,
        }
    }
}
