use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use reach_core::{Platform, SocialStats};

use crate::canonical::canonicalize;
use crate::identity::IdentityPolicy;
use crate::platforms::strategies_for;
use crate::strategy::{PartialStats, Strategy, StrategyOutcome};
use crate::transport::{FetchRequest, Transport, TransportError};

/// Error text of the fallback produced for a handle that canonicalizes to
/// nothing.
pub const INVALID_HANDLE: &str = "invalid handle";

/// Failure text recorded for an attempt that panicked instead of returning.
pub const STRATEGY_PANICKED: &str = "strategy panicked";

/// Per-attempt timeout used when none is configured.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one platform's strategy list for a single handle.
///
/// Strategies are tried strictly in order. Each attempt draws a fresh
/// identity, waits out its delay, and sends the strategy's request through
/// the [`Transport`] under a fixed timeout. The first
/// [`StrategyOutcome::Success`] is returned; every other outcome advances to
/// the next strategy. When the list is exhausted the result is
/// [`SocialStats::fallback`] with an `error` summarizing each attempt.
///
/// [`Self::extract`] never returns an error. A panic inside one attempt
/// (request building, transport or parsing) is caught and recorded as a
/// parse failure, and the chain moves on.
pub struct PlatformExtractor {
    platform: Platform,
    strategies: Vec<Box<dyn Strategy>>,
    transport: Arc<dyn Transport>,
    identity: Arc<dyn IdentityPolicy>,
    attempt_timeout: Duration,
}

impl PlatformExtractor {
    /// Creates an extractor using the built-in strategy list for `platform`.
    #[must_use]
    pub fn new(
        platform: Platform,
        transport: Arc<dyn Transport>,
        identity: Arc<dyn IdentityPolicy>,
        attempt_timeout: Duration,
    ) -> Self {
        Self::with_strategies(
            platform,
            strategies_for(platform),
            transport,
            identity,
            attempt_timeout,
        )
    }

    /// Creates an extractor with an explicit strategy list, tried in the
    /// order given.
    #[must_use]
    pub fn with_strategies(
        platform: Platform,
        strategies: Vec<Box<dyn Strategy>>,
        transport: Arc<dyn Transport>,
        identity: Arc<dyn IdentityPolicy>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            platform,
            strategies,
            transport,
            identity,
            attempt_timeout,
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Names of the configured strategies in priority order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }

    /// Extracts stats for a raw, user-typed handle or profile URL.
    pub async fn extract(&self, raw: &str) -> SocialStats {
        let platform = self.platform;
        let username = canonicalize(platform, raw);
        if username.is_empty() {
            tracing::warn!(%platform, raw, "handle canonicalized to nothing");
            return SocialStats::fallback(platform, username, INVALID_HANDLE);
        }

        let mut failures: Vec<String> = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let outcome = match AssertUnwindSafe(self.attempt(strategy.as_ref(), &username))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::warn!(
                        %platform,
                        %username,
                        strategy = strategy.name(),
                        "strategy attempt panicked"
                    );
                    StrategyOutcome::ParseFailure(STRATEGY_PANICKED.to_string())
                }
            };
            tracing::debug!(
                %platform,
                %username,
                strategy = strategy.name(),
                outcome = outcome.label(),
                "strategy attempt settled"
            );
            match outcome {
                StrategyOutcome::Success(partial) => {
                    tracing::info!(
                        %platform,
                        %username,
                        followers = partial.followers,
                        source = strategy.name(),
                        "extracted social stats"
                    );
                    return success_stats(platform, username, strategy.name(), partial);
                }
                other => failures.push(format!("{}: {}", strategy.name(), other.describe())),
            }
        }

        let error = if failures.is_empty() {
            "no extraction strategies configured".to_string()
        } else {
            format!("all strategies failed ({})", failures.join("; "))
        };
        tracing::warn!(%platform, %username, %error, "falling back to placeholder stats");
        SocialStats::fallback(platform, username, error)
    }

    async fn attempt(&self, strategy: &dyn Strategy, username: &str) -> StrategyOutcome {
        let identity = self.identity.next_identity();
        if !identity.delay.is_zero() {
            tokio::time::sleep(identity.delay).await;
        }

        let spec = strategy.request(username);
        let request = FetchRequest {
            url: spec.url,
            user_agent: identity.user_agent,
            headers: spec.headers,
        };

        let response =
            match tokio::time::timeout(self.attempt_timeout, self.transport.get(&request)).await {
                Err(_) => {
                    return StrategyOutcome::NetworkFailure(
                        TransportError::Timeout { url: request.url }.to_string(),
                    )
                }
                Ok(Err(e)) => return StrategyOutcome::NetworkFailure(e.to_string()),
                Ok(Ok(response)) => response,
            };

        if !response.is_success() {
            return StrategyOutcome::HttpFailure {
                status: response.status,
            };
        }
        strategy.parse(&response.body)
    }
}

fn success_stats(
    platform: Platform,
    username: String,
    source: &str,
    partial: PartialStats,
) -> SocialStats {
    SocialStats {
        platform,
        username,
        followers: partial.followers,
        following: partial.following,
        posts: partial.posts,
        today_visitors: partial.today_visitors,
        last_updated: Utc::now(),
        error: None,
        source: Some(source.to_string()),
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
