//! The extraction strategy contract.
//!
//! A [`Strategy`] is one technique for reading a platform's numbers: it
//! describes a single request and parses a single response shape. It does no
//! I/O itself, so every parser is unit-testable against a fixture body.

/// The request a strategy wants sent. The user agent is added per attempt
/// by the [`IdentityPolicy`](crate::IdentityPolicy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl StrategyRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Shorthand for the `accept` header of an HTML page.
    #[must_use]
    pub fn accept_html(self) -> Self {
        self.header("accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .header("accept-language", "en-US,en;q=0.9,ko;q=0.8")
    }

    /// Shorthand for the `accept` header of a JSON endpoint.
    #[must_use]
    pub fn accept_json(self) -> Self {
        self.header("accept", "application/json,text/plain;q=0.9,*/*;q=0.8")
    }
}

/// The fields a successful strategy extracted. `followers` is mandatory;
/// everything else is reported only when the response contained it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialStats {
    pub followers: u64,
    pub following: Option<u64>,
    pub posts: Option<u64>,
    pub today_visitors: Option<u64>,
}

impl PartialStats {
    #[must_use]
    pub fn followers(followers: u64) -> Self {
        Self {
            followers,
            ..Self::default()
        }
    }
}

/// How one strategy attempt settled. Only `Success` ends a platform's chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Success(PartialStats),
    /// The response was readable but held no follower count.
    Miss,
    /// Connection error, body read error or per-attempt timeout.
    NetworkFailure(String),
    HttpFailure { status: u16 },
    /// A structured response could not be decoded.
    ParseFailure(String),
}

impl StrategyOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, StrategyOutcome::Success(_))
    }

    /// Short machine-friendly tag used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StrategyOutcome::Success(_) => "success",
            StrategyOutcome::Miss => "miss",
            StrategyOutcome::NetworkFailure(_) => "network_failure",
            StrategyOutcome::HttpFailure { .. } => "http_failure",
            StrategyOutcome::ParseFailure(_) => "parse_failure",
        }
    }

    /// Human-readable summary used in the fallback `error` text.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            StrategyOutcome::Success(stats) => format!("success ({} followers)", stats.followers),
            StrategyOutcome::Miss => "no count found".to_string(),
            StrategyOutcome::NetworkFailure(message) => format!("network failure: {message}"),
            StrategyOutcome::HttpFailure { status } => format!("HTTP {status}"),
            StrategyOutcome::ParseFailure(message) => format!("parse failure: {message}"),
        }
    }
}

/// One concrete extraction technique for one platform.
pub trait Strategy: Send + Sync {
    /// Stable identifier, reported as `SocialStats::source` on success.
    fn name(&self) -> &'static str;

    /// Builds the request for a canonical username.
    fn request(&self, username: &str) -> StrategyRequest;

    /// Parses a 2xx response body.
    fn parse(&self, body: &str) -> StrategyOutcome;
}
