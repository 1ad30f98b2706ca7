//! Concurrent fan-out of per-platform extraction.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use reach_core::{AppConfig, Platform, SocialHandles, SocialStats, SocialStatsReport};

use crate::error::ScraperError;
use crate::extractor::PlatformExtractor;
use crate::identity::{FixedIdentity, IdentityPolicy, RotatingIdentity};
use crate::transport::{ReqwestTransport, Transport};

/// Runs one [`PlatformExtractor`] per requested platform concurrently and
/// assembles a [`SocialStatsReport`].
///
/// Every lane is a separate `tokio` task, so a lane that panics cannot take
/// the others down with it: its slot in the report is filled with the
/// platform's fallback stats. Requested platforms always map to `Some`,
/// unrequested ones to `None`. There is no retry logic at this level.
#[derive(Clone)]
pub struct RequestCoordinator {
    instagram: Arc<PlatformExtractor>,
    youtube: Arc<PlatformExtractor>,
    tiktok: Arc<PlatformExtractor>,
    naver_blog: Arc<PlatformExtractor>,
}

impl RequestCoordinator {
    /// Builds extractors with the built-in strategy lists, sharing one
    /// transport and one identity policy.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        identity: Arc<dyn IdentityPolicy>,
        attempt_timeout: Duration,
    ) -> Self {
        let build = |platform| {
            Arc::new(PlatformExtractor::new(
                platform,
                Arc::clone(&transport),
                Arc::clone(&identity),
                attempt_timeout,
            ))
        };
        Self {
            instagram: build(Platform::Instagram),
            youtube: build(Platform::Youtube),
            tiktok: build(Platform::Tiktok),
            naver_blog: build(Platform::NaverBlog),
        }
    }

    /// Builds the production coordinator from application config.
    ///
    /// A pinned `scraper_user_agent` replaces identity rotation with a fixed
    /// identity that still honours the configured minimum delay.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if the HTTP client cannot be constructed.
    /// - [`ScraperError::InvalidDelayRange`] if min delay exceeds max delay.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let transport = ReqwestTransport::new(config.scraper_request_timeout_secs)?;
        let identity: Arc<dyn IdentityPolicy> = match &config.scraper_user_agent {
            Some(user_agent) => Arc::new(FixedIdentity::with_delay(
                user_agent.clone(),
                Duration::from_millis(config.scraper_min_delay_ms),
            )),
            None => Arc::new(RotatingIdentity::new(
                config.scraper_min_delay_ms,
                config.scraper_max_delay_ms,
            )?),
        };
        Ok(Self::new(
            Arc::new(transport),
            identity,
            Duration::from_secs(config.scraper_request_timeout_secs),
        ))
    }

    /// Assembles a coordinator from prebuilt extractors, one per platform.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::ExtractorMismatch`] when an extractor was
    /// built for a different platform than the slot it is passed in.
    pub fn with_extractors(
        instagram: PlatformExtractor,
        youtube: PlatformExtractor,
        tiktok: PlatformExtractor,
        naver_blog: PlatformExtractor,
    ) -> Result<Self, ScraperError> {
        for (expected, extractor) in [
            (Platform::Instagram, &instagram),
            (Platform::Youtube, &youtube),
            (Platform::Tiktok, &tiktok),
            (Platform::NaverBlog, &naver_blog),
        ] {
            if extractor.platform() != expected {
                return Err(ScraperError::ExtractorMismatch {
                    expected,
                    actual: extractor.platform(),
                });
            }
        }
        Ok(Self {
            instagram: Arc::new(instagram),
            youtube: Arc::new(youtube),
            tiktok: Arc::new(tiktok),
            naver_blog: Arc::new(naver_blog),
        })
    }

    fn extractor(&self, platform: Platform) -> &Arc<PlatformExtractor> {
        match platform {
            Platform::Instagram => &self.instagram,
            Platform::Youtube => &self.youtube,
            Platform::Tiktok => &self.tiktok,
            Platform::NaverBlog => &self.naver_blog,
        }
    }

    /// Extracts every requested platform concurrently and waits for all of
    /// them to settle.
    pub async fn collect(&self, handles: &SocialHandles) -> SocialStatsReport {
        let mut lanes = Vec::new();
        let mut tasks = Vec::new();
        for (platform, raw) in handles.requested() {
            let extractor = Arc::clone(self.extractor(platform));
            let owned = raw.to_string();
            tasks.push(tokio::spawn(async move { extractor.extract(&owned).await }));
            lanes.push((platform, raw.to_string()));
        }
        let settled = join_all(tasks).await;

        let mut report = SocialStatsReport::default();
        for ((platform, raw), result) in lanes.into_iter().zip(settled) {
            let stats = match result {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::warn!(%platform, %raw, error = %e, "extraction lane did not complete");
                    lane_failure(platform, &raw, &e)
                }
            };
            report.insert(stats);
        }
        report
    }
}

fn lane_failure(platform: Platform, raw: &str, error: &tokio::task::JoinError) -> SocialStats {
    let reason = if error.is_panic() {
        "extraction panicked"
    } else {
        "extraction cancelled"
    };
    SocialStats::fallback(platform, crate::canonicalize(platform, raw), reason)
}
