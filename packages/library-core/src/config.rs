//! Server configuration.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Serve the GraphiQL explorer on `GET /graphql` for browser clients
    pub graphiql: bool,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Returns the `host:port` pair the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            graphiql: true,
            request_timeout_ms: 5000,   // 5 seconds default
            max_body_bytes: 1024 * 1024, // 1 MiB
        }
    }
}
