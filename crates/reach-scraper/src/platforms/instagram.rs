//! Instagram strategies.
//!
//! 1. `web_profile_info`: the JSON endpoint the web app itself calls.
//! 2. The public profile page: embedded JSON counters, then the
//!    `og:description` summary (`1,234 Followers, 56 Following, 78 Posts` or
//!    its Korean rendering).
//! 3. Picuki, a read-only mirror.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::encode_handle;
use crate::patterns::{compile, first_count, first_json_count, meta_content};
use crate::strategy::{PartialStats, Strategy, StrategyOutcome, StrategyRequest};

/// Public app id sent by instagram.com; the endpoint rejects requests without it.
const WEB_APP_ID: &str = "936619743392459";

// -----------------------------------------------------------------------
// web_profile_info JSON
// -----------------------------------------------------------------------

const API_FOLLOWERS: &[&[&str]] = &[&["edge_followed_by", "count"], &["follower_count"]];
const API_FOLLOWING: &[&[&str]] = &[&["edge_follow", "count"], &["following_count"]];
const API_POSTS: &[&[&str]] = &[&["edge_owner_to_timeline_media", "count"], &["media_count"]];

pub struct WebProfileInfo;

impl Strategy for WebProfileInfo {
    fn name(&self) -> &'static str {
        "instagram_web_profile_info"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://i.instagram.com/api/v1/users/web_profile_info/?username={}",
            encode_handle(username)
        ))
        .accept_json()
        .header("x-ig-app-id", WEB_APP_ID)
        .header("referer", "https://www.instagram.com/")
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let value: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => return StrategyOutcome::ParseFailure(e.to_string()),
        };
        let Some(user) = value.pointer("/data/user").or_else(|| value.get("user")) else {
            return StrategyOutcome::Miss;
        };
        let Some(followers) = first_json_count(user, API_FOLLOWERS) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: first_json_count(user, API_FOLLOWING),
            posts: first_json_count(user, API_POSTS),
            today_visitors: None,
        })
    }
}

// -----------------------------------------------------------------------
// profile page markup
// -----------------------------------------------------------------------

static EMBEDDED_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""edge_followed_by"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#,
        r#""follower_count"\s*:\s*(\d+)"#,
    ])
});
static EMBEDDED_FOLLOWING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""edge_follow"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#,
        r#""following_count"\s*:\s*(\d+)"#,
    ])
});
static EMBEDDED_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""edge_owner_to_timeline_media"\s*:\s*\{\s*"count"\s*:\s*(\d+)"#,
        r#""media_count"\s*:\s*(\d+)"#,
    ])
});

static SUMMARY_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s+Followers",
        r"팔로워\s*([\d.,]+\s*[천만억]?)",
    ])
});
static SUMMARY_FOLLOWING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s+Following",
        r"팔로우\s*([\d.,]+\s*[천만억]?)",
    ])
});
static SUMMARY_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s+Posts",
        r"게시물\s*([\d.,]+\s*[천만억]?)",
    ])
});

pub struct ProfilePage;

impl Strategy for ProfilePage {
    fn name(&self) -> &'static str {
        "instagram_profile_page"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://www.instagram.com/{}/",
            encode_handle(username)
        ))
        .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let summary = meta_content(body, "og:description")
            .or_else(|| meta_content(body, "description"))
            .unwrap_or_default();

        let field = |embedded: &[Regex], summarized: &[Regex]| {
            first_count(embedded, body).or_else(|| first_count(summarized, &summary))
        };

        let Some(followers) = field(&EMBEDDED_FOLLOWERS, &SUMMARY_FOLLOWERS) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: field(&EMBEDDED_FOLLOWING, &SUMMARY_FOLLOWING),
            posts: field(&EMBEDDED_POSTS, &SUMMARY_POSTS),
            today_visitors: None,
        })
    }
}

// -----------------------------------------------------------------------
// Picuki mirror
// -----------------------------------------------------------------------

static MIRROR_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?s)class="followed_by"[^>]*>\s*([\d.,]+(?:\s*[KMBkmb]\b)?)"#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*followers",
    ])
});
static MIRROR_FOLLOWING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?s)class="follows"[^>]*>\s*([\d.,]+(?:\s*[KMBkmb]\b)?)"#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*following",
    ])
});
static MIRROR_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?s)class="total_posts"[^>]*>\s*([\d.,]+(?:\s*[KMBkmb]\b)?)"#,
        r"(?i)([\d.,]+(?:\s*[KMB]\b)?)\s*posts",
    ])
});

pub struct PicukiMirror;

impl Strategy for PicukiMirror {
    fn name(&self) -> &'static str {
        "instagram_picuki_mirror"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://www.picuki.com/profile/{}",
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
            posts: first_count(&MIRROR_POSTS, body),
            today_visitors: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(outcome: StrategyOutcome) -> PartialStats {
        match outcome {
            StrategyOutcome::Success(stats) => stats,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn web_profile_info_request_carries_app_id() {
        let request = WebProfileInfo.request("some.user");
        assert_eq!(
            request.url,
            "https://i.instagram.com/api/v1/users/web_profile_info/?username=some.user"
        );
        assert!(request
            .headers
            .contains(&("x-ig-app-id".to_string(), WEB_APP_ID.to_string())));
    }

    #[test]
    fn web_profile_info_reads_edge_counts() {
        let body = r#"{"data":{"user":{
            "username":"someone",
            "edge_followed_by":{"count":48213},
            "edge_follow":{"count":311},
            "edge_owner_to_timeline_media":{"count":902,"edges":[]}
        }},"status":"ok"}"#;
        let stats = success(WebProfileInfo.parse(body));
        assert_eq!(stats.followers, 48_213);
        assert_eq!(stats.following, Some(311));
        assert_eq!(stats.posts, Some(902));
    }

    #[test]
    fn web_profile_info_accepts_flat_counts() {
        let body = r#"{"user":{"follower_count":12,"media_count":3}}"#;
        let stats = success(WebProfileInfo.parse(body));
        assert_eq!(stats.followers, 12);
        assert_eq!(stats.following, None);
        assert_eq!(stats.posts, Some(3));
    }

    #[test]
    fn web_profile_info_misses_on_null_user() {
        let body = r#"{"data":{"user":null},"status":"ok"}"#;
        assert_eq!(WebProfileInfo.parse(body), StrategyOutcome::Miss);
    }

    #[test]
    fn web_profile_info_reports_parse_failure_for_login_wall_html() {
        let outcome = WebProfileInfo.parse("<!DOCTYPE html><html>Login • Instagram</html>");
        assert!(matches!(outcome, StrategyOutcome::ParseFailure(_)));
    }

    #[test]
    fn profile_page_prefers_embedded_json() {
        let body = r#"<html><head>
            <meta property="og:description" content="9 Followers, 9 Following, 9 Posts">
            </head><script>{"edge_followed_by":{"count":1500},"edge_follow":{"count":20}}</script></html>"#;
        let stats = success(ProfilePage.parse(body));
        assert_eq!(stats.followers, 1_500);
        assert_eq!(stats.following, Some(20));
        assert_eq!(stats.posts, Some(9));
    }

    #[test]
    fn profile_page_reads_english_summary() {
        let body = r#"<meta property="og:description" content="1.2M Followers, 1,024 Following, 3,456 Posts - See Instagram photos and videos from Someone (&#064;someone)">"#;
        let stats = success(ProfilePage.parse(body));
        assert_eq!(stats.followers, 1_200_000);
        assert_eq!(stats.following, Some(1_024));
        assert_eq!(stats.posts, Some(3_456));
    }

    #[test]
    fn profile_page_reads_korean_summary() {
        let body = r#"<meta content="팔로워 1.5만명, 팔로우 210명, 게시물 87개 - Someone님의 Instagram 사진 및 동영상 보기" name="description">"#;
        let stats = success(ProfilePage.parse(body));
        assert_eq!(stats.followers, 15_000);
        assert_eq!(stats.following, Some(210));
        assert_eq!(stats.posts, Some(87));
    }

    #[test]
    fn profile_page_without_counts_is_a_miss() {
        let body = "<html><head><title>Instagram</title></head><body>Log in</body></html>";
        assert_eq!(ProfilePage.parse(body), StrategyOutcome::Miss);
    }

    #[test]
    fn picuki_reads_profile_counters() {
        let body = r#"
            <div class="content-title">someone</div>
            <span class="total_posts">1,204</span>
            <span class="followed_by">23.4k</span>
            <span class="follows">512</span>
        "#;
        let stats = success(PicukiMirror.parse(body));
        assert_eq!(stats.followers, 23_400);
        assert_eq!(stats.following, Some(512));
        assert_eq!(stats.posts, Some(1_204));
    }

    #[test]
    fn picuki_falls_back_to_label_text() {
        let stats = success(PicukiMirror.parse("<p>8,765 followers</p>"));
        assert_eq!(stats.followers, 8_765);
        assert_eq!(stats.following, None);
    }
}
