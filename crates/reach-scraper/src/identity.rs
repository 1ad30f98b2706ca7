//! Outbound client identity and pre-request jitter.
//!
//! Every strategy attempt asks the [`IdentityPolicy`] for a user agent and a
//! delay to sleep before sending. [`RotatingIdentity`] is the production
//! policy; [`FixedIdentity`] keeps tests and one-off CLI runs deterministic.

use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::ScraperError;

/// Desktop, mobile and tablet browsers. Read-only and shared by every lane.
pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.51",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Mobile Safari/537.36",
    "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; SM-X710) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.6367.82 Safari/537.36",
];

/// The identity a single attempt presents to the target site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_agent: String,
    /// How long to wait before sending the request.
    pub delay: Duration,
}

/// Supplies one [`Identity`] per strategy attempt.
pub trait IdentityPolicy: Send + Sync {
    fn next_identity(&self) -> Identity;
}

/// Picks a user agent uniformly from a pool and a delay uniformly from
/// `min_delay_ms..=max_delay_ms`.
#[derive(Debug, Clone)]
pub struct RotatingIdentity {
    pool: Vec<String>,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl RotatingIdentity {
    /// Rotates over [`USER_AGENT_POOL`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidDelayRange`] if `min_delay_ms > max_delay_ms`.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Result<Self, ScraperError> {
        let pool = USER_AGENT_POOL.iter().map(|ua| (*ua).to_string()).collect();
        Self::with_pool(pool, min_delay_ms, max_delay_ms)
    }

    /// Rotates over a caller-supplied pool.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::EmptyIdentityPool`] for an empty pool and
    /// [`ScraperError::InvalidDelayRange`] if `min_delay_ms > max_delay_ms`.
    pub fn with_pool(
        pool: Vec<String>,
        min_delay_ms: u64,
        max_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        if pool.is_empty() {
            return Err(ScraperError::EmptyIdentityPool);
        }
        if min_delay_ms > max_delay_ms {
            return Err(ScraperError::InvalidDelayRange {
                min_ms: min_delay_ms,
                max_ms: max_delay_ms,
            });
        }
        Ok(Self {
            pool,
            min_delay_ms,
            max_delay_ms,
        })
    }
}

impl IdentityPolicy for RotatingIdentity {
    fn next_identity(&self) -> Identity {
        let mut rng = rand::rng();
        let user_agent = self
            .pool
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| USER_AGENT_POOL[0].to_string());
        let delay_ms = rng.random_range(self.min_delay_ms..=self.max_delay_ms);
        Identity {
            user_agent,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Always the same user agent and delay. Zero delay unless configured.
#[derive(Debug, Clone)]
pub struct FixedIdentity {
    identity: Identity,
}

impl FixedIdentity {
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self::with_delay(user_agent, Duration::ZERO)
    }

    #[must_use]
    pub fn with_delay(user_agent: impl Into<String>, delay: Duration) -> Self {
        Self {
            identity: Identity {
                user_agent: user_agent.into(),
                delay,
            },
        }
    }
}

impl IdentityPolicy for FixedIdentity {
    fn next_identity(&self) -> Identity {
        self.identity.clone()
    }
}
