//! HTTP server configuration object.

use std::net::SocketAddr;

use authgate::inbound::http::state::HttpState;

/// Everything the server factory needs to build each worker's app.
pub struct ServerConfig {
    pub(crate) state: HttpState,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Serve `state` on `bind_addr`.
    #[must_use]
    pub fn new(state: HttpState, bind_addr: SocketAddr) -> Self {
        Self { state, bind_addr }
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
