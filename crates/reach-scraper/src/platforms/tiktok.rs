//! TikTok strategies.
//!
//! The desktop profile page ships its state as JSON in a `<script>` tag:
//! `__UNIVERSAL_DATA_FOR_REHYDRATION__` today, `SIGI_STATE` on older
//! deployments. The mobile host is scanned with loose patterns, and
//! Urlebird is the mirror of last resort.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::encode_handle;
use crate::patterns::{compile, first_count, first_json_count, script_by_id};
use crate::strategy::{PartialStats, Strategy, StrategyOutcome, StrategyRequest};

const UNIVERSAL_DATA_ID: &str = "__UNIVERSAL_DATA_FOR_REHYDRATION__";
const SIGI_STATE_ID: &str = "SIGI_STATE";

const USER_DETAIL_STATS: &[&str] = &["__DEFAULT_SCOPE__", "webapp.user-detail", "userInfo"];

// -----------------------------------------------------------------------
// rehydration JSON
// -----------------------------------------------------------------------

pub struct RehydrationData;

impl Strategy for RehydrationData {
    fn name(&self) -> &'static str {
        "tiktok_rehydration_data"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://www.tiktok.com/@{}",
            encode_handle(username)
        ))
        .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        if let Some(raw) = script_by_id(body, UNIVERSAL_DATA_ID) {
            return match serde_json::from_str::<Value>(raw) {
                Ok(value) => stats_from_user_info(pointer(&value, USER_DETAIL_STATS)),
                Err(e) => StrategyOutcome::ParseFailure(e.to_string()),
            };
        }
        if let Some(raw) = script_by_id(body, SIGI_STATE_ID) {
            return match serde_json::from_str::<Value>(raw) {
                Ok(value) => stats_from_sigi_state(&value),
                Err(e) => StrategyOutcome::ParseFailure(e.to_string()),
            };
        }
        StrategyOutcome::Miss
    }
}

fn pointer<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, key| node.get(*key))
}

/// `userInfo` carries `stats` (numbers) and, on newer builds, `statsV2`
/// (numeric strings that do not overflow JavaScript).
fn stats_from_user_info(user_info: Option<&Value>) -> StrategyOutcome {
    let Some(user_info) = user_info else {
        return StrategyOutcome::Miss;
    };
    let field = |key: &str| {
        first_json_count(user_info, &[&["statsV2", key], &["stats", key]])
    };
    let Some(followers) = field("followerCount") else {
        return StrategyOutcome::Miss;
    };
    StrategyOutcome::Success(PartialStats {
        followers,
        following: field("followingCount"),
        posts: field("videoCount"),
        today_visitors: None,
    })
}

/// `SIGI_STATE.UserModule.stats` is keyed by username; a profile page only
/// holds the profile owner.
fn stats_from_sigi_state(value: &Value) -> StrategyOutcome {
    let Some(stats) = value
        .pointer("/UserModule/stats")
        .and_then(Value::as_object)
        .and_then(|by_user| by_user.values().next())
    else {
        return StrategyOutcome::Miss;
    };
    let Some(followers) = first_json_count(stats, &[&["followerCount"]]) else {
        return StrategyOutcome::Miss;
    };
    StrategyOutcome::Success(PartialStats {
        followers,
        following: first_json_count(stats, &[&["followingCount"]]),
        posts: first_json_count(stats, &[&["videoCount"]]),
        today_visitors: None,
    })
}

// -----------------------------------------------------------------------
// mobile page markup
// -----------------------------------------------------------------------

static MARKUP_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""followerCount"\s*:\s*"?(\d+)"#,
        r#"data-e2e="followers-count"[^>]*>\s*([^<]+?)\s*<"#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*Followers",
        r"팔로워\s*([\d.,]+\s*[천만억]?)",
    ])
});
static MARKUP_FOLLOWING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""followingCount"\s*:\s*"?(\d+)"#,
        r#"data-e2e="following-count"[^>]*>\s*([^<]+?)\s*<"#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*Following",
    ])
});
static MARKUP_VIDEOS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r#""videoCount"\s*:\s*"?(\d+)"#])
});

pub struct MobileProfilePage;

impl Strategy for MobileProfilePage {
    fn name(&self) -> &'static str {
        "tiktok_mobile_profile_page"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!("https://m.tiktok.com/@{}", encode_handle(username)))
            .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let Some(followers) = first_count(&MARKUP_FOLLOWERS, body) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: first_count(&MARKUP_FOLLOWING, body),
            posts: first_count(&MARKUP_VIDEOS, body),
            today_visitors: None,
        })
    }
}

// -----------------------------------------------------------------------
// Urlebird mirror
// -----------------------------------------------------------------------

static MIRROR_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?is)<b>\s*([\d.,]+(?:\s*[KMB]\b)?)\s*</b>\s*followers",
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*followers",
    ])
});
static MIRROR_FOLLOWING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?is)<b>\s*([\d.,]+(?:\s*[KMB]\b)?)\s*</b>\s*following",
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*following",
    ])
});
static MIRROR_VIDEOS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"(?is)<b>\s*([\d.,]+(?:\s*[KMB]\b)?)\s*</b>\s*videos"])
});

pub struct UrlebirdMirror;

impl Strategy for UrlebirdMirror {
    fn name(&self) -> &'static str {
        "tiktok_urlebird_mirror"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://urlebird.com/user/{}/",
            encode_handle(username)
        ))
        .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let Some(followers) = first_count(&MIRROR_FOLLOWERS, body) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: first_count(&MIRROR_FOLLOWING, body),
            posts: first_count(&MIRROR_VIDEOS, body),
            today_visitors: None,
        })
    }
}
