use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Per-attempt timeout applied to every outbound strategy request.
    pub scraper_request_timeout_secs: u64,
    /// Lower bound of the jittered delay before each attempt.
    pub scraper_min_delay_ms: u64,
    /// Upper bound (inclusive) of the jittered delay before each attempt.
    pub scraper_max_delay_ms: u64,
    /// Pins a single user agent instead of rotating the built-in pool.
    pub scraper_user_agent: Option<String>,
}
