use serde::{Deserialize, Serialize};

/// Secret used when neither the config file nor `SMILE_SECRET` provides one.
pub const DEFAULT_SECRET_KEY: &str = "smile-secret-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server port (default: 5000)
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Server host (default: 127.0.0.1)
    #[serde(default = "default_server_host")]
    pub host: String,
    /// Allow binding to non-localhost addresses (default: false)
    #[serde(default)]
    pub allow_public_bind: bool,
    /// HMAC key for the session cookie
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Idle sessions are forgotten after this many seconds
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Whole-request timeout; must exceed the image generation timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_port() -> u16 {
    5000
}

fn default_server_host() -> String {
    "127.0.0.1".into()
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.into()
}

fn default_session_ttl_secs() -> u64 {
    3_600
}

fn default_request_timeout_secs() -> u64 {
    180
}

impl ServerConfig {
    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
            allow_public_bind: false,
            secret_key: default_secret_key(),
            session_ttl_secs: default_session_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
