//! Request and result records exchanged with callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Follower count reported when every extraction attempt for a platform
/// failed. Paired with a non-empty `error` so callers can tell it apart from
/// a genuine one-follower account.
pub const FALLBACK_FOLLOWERS: u64 = 1;

/// Best-effort statistics for one platform handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStats {
    pub platform: Platform,
    /// Canonical username or blog id the requests were built from.
    pub username: String,
    pub followers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<u64>,
    /// Naver Blog only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today_visitors: Option<u64>,
    pub last_updated: DateTime<Utc>,
    /// Set when the result is a low-confidence fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the extraction strategy that produced the numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SocialStats {
    /// The degraded result used when no strategy produced a follower count.
    #[must_use]
    pub fn fallback(
        platform: Platform,
        username: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            username: username.into(),
            followers: FALLBACK_FOLLOWERS,
            following: None,
            posts: None,
            today_visitors: None,
            last_updated: Utc::now(),
            error: Some(error.into()),
            source: None,
        }
    }

    /// `true` when the numbers should not be treated as authoritative.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Raw, user-typed handles or profile URLs, one optional entry per platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialHandles {
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub naver_blog: Option<String>,
}

impl SocialHandles {
    /// The trimmed raw handle for `platform`, or `None` when the key is
    /// absent. A present but blank entry is still `Some("")`.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&str> {
        let raw = match platform {
            Platform::Instagram => self.instagram.as_deref(),
            Platform::Youtube => self.youtube.as_deref(),
            Platform::Tiktok => self.tiktok.as_deref(),
            Platform::NaverBlog => self.naver_blog.as_deref(),
        };
        raw.map(str::trim)
    }

    /// Every platform present in the record, in [`Platform::ALL`] order.
    pub fn requested(&self) -> impl Iterator<Item = (Platform, &str)> + '_ {
        Platform::ALL
            .into_iter()
            .filter_map(move |platform| self.get(platform).map(|raw| (platform, raw)))
    }
}

/// One [`SocialStats`] per requested platform; `None` for platforms that
/// were not part of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStatsReport {
    pub instagram: Option<SocialStats>,
    pub youtube: Option<SocialStats>,
    pub tiktok: Option<SocialStats>,
    pub naver_blog: Option<SocialStats>,
}

impl SocialStatsReport {
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<&SocialStats> {
        match platform {
            Platform::Instagram => self.instagram.as_ref(),
            Platform::Youtube => self.youtube.as_ref(),
            Platform::Tiktok => self.tiktok.as_ref(),
            Platform::NaverBlog => self.naver_blog.as_ref(),
        }
    }

    /// Stores `stats` under the key of its own platform.
    pub fn insert(&mut self, stats: SocialStats) {
        let slot = match stats.platform {
            Platform::Instagram => &mut self.instagram,
            Platform::Youtube => &mut self.youtube,
            Platform::Tiktok => &mut self.tiktok,
            Platform::NaverBlog => &mut self.naver_blog,
        };
        *slot = Some(stats);
    }
}
