//! YouTube strategies.
//!
//! The channel page and its `/about` tab both embed `ytInitialData`; the
//! subscriber label lives under `subscriberCountText` in the classic layout
//! and inside page-header metadata rows in the newer one. Social Blade is
//! the last resort.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::encode_handle;
use crate::canonical::is_youtube_channel_id;
use crate::patterns::{compile, count_in_text, find_key, first_count, object_after, text_of};
use crate::strategy::{PartialStats, Strategy, StrategyOutcome, StrategyRequest};

/// Skips the EU consent interstitial that replaces the channel page.
const CONSENT_COOKIE: &str = "CONSENT=YES+cb; SOCS=CAI";

static SUBSCRIBERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""subscriberCountText"\s*:\s*\{[^{}]*?"simpleText"\s*:\s*"([^"]+)""#,
        r#""content"\s*:\s*"([\d.,]+(?:\s*[KMBkmb]\b)?)\s*subscribers?""#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*subscribers",
        r"구독자\s*([\d.,]+\s*[천만억]?)\s*명",
    ])
});

static VIDEOS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""videosCountText"\s*:\s*\{\s*"runs"\s*:\s*\[\s*\{\s*"text"\s*:\s*"([\d.,]+)""#,
        r#""content"\s*:\s*"([\d.,]+(?:\s*[KMBkmb]\b)?)\s*videos?""#,
        r"동영상\s*([\d.,]+\s*[천만억]?)\s*개",
    ])
});

fn channel_url(username: &str) -> String {
    if is_youtube_channel_id(username) {
        format!("https://www.youtube.com/channel/{}", encode_handle(username))
    } else {
        format!("https://www.youtube.com/@{}", encode_handle(username))
    }
}

fn channel_page_request(url: String) -> StrategyRequest {
    StrategyRequest::new(url)
        .accept_html()
        .header("cookie", CONSENT_COOKIE)
}

/// Reads subscriber and video counts from a channel page or its about tab.
fn parse_channel_html(body: &str) -> StrategyOutcome {
    let initial_data = object_after(body, "ytInitialData")
        .and_then(|raw| serde_json::from_str::<Value>(raw).ok());

    let labelled = |key: &str| {
        initial_data
            .as_ref()
            .and_then(|data| find_key(data, key))
            .and_then(text_of)
            .and_then(|text| count_in_text(&text))
    };

    let Some(followers) =
        labelled("subscriberCountText").or_else(|| first_count(&SUBSCRIBERS, body))
    else {
        return StrategyOutcome::Miss;
    };
    StrategyOutcome::Success(PartialStats {
        followers,
        following: None,
        posts: labelled("videosCountText").or_else(|| first_count(&VIDEOS, body)),
        today_visitors: None,
    })
}

pub struct ChannelPage;

impl Strategy for ChannelPage {
    fn name(&self) -> &'static str {
        "youtube_channel_page"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        channel_page_request(channel_url(username))
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        parse_channel_html(body)
    }
}

pub struct AboutPage;

impl Strategy for AboutPage {
    fn name(&self) -> &'static str {
        "youtube_about_page"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        channel_page_request(format!("{}/about", channel_url(username)))
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        parse_channel_html(body)
    }
}

// -----------------------------------------------------------------------
// Social Blade mirror
// -----------------------------------------------------------------------

static MIRROR_SUBSCRIBERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?s)id="youtube-stats-header-subs"[^>]*>\s*([\d.,]+(?:\s*[KMBkmb]\b)?)"#,
        r"(?is)Subscribers\s*</span>\s*<span[^>]*>\s*([\d.,]+(?:\s*[KMB]\b)?)",
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*subscribers",
    ])
});
static MIRROR_UPLOADS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?s)id="youtube-stats-header-uploads"[^>]*>\s*([\d.,]+(?:\s*[KMBkmb]\b)?)"#,
        r"(?is)Uploads\s*</span>\s*<span[^>]*>\s*([\d.,]+)",
    ])
});

pub struct SocialBladeMirror;

impl Strategy for SocialBladeMirror {
    fn name(&self) -> &'static str {
        "youtube_socialblade_mirror"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        let kind = if is_youtube_channel_id(username) {
            "channel"
        } else {
            "handle"
        };
        StrategyRequest::new(format!(
            "https://socialblade.com/youtube/{kind}/{}",
            encode_handle(username)
        ))
        .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let Some(followers) = first_count(&MIRROR_SUBSCRIBERS, body) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: None,
            posts: first_count(&MIRROR_UPLOADS, body),
            today_visitors: None,
        })
    }
}
