//! Naver Blog strategies.
//!
//! Naver calls followers "이웃" (neighbours). The mobile site exposes a small
//! JSON endpoint behind an anti-XSSI prefix; both the mobile and desktop
//! homes print the same counters in Korean labels.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::encode_handle;
use crate::patterns::{compile, first_count, first_json_count};
use crate::strategy::{PartialStats, Strategy, StrategyOutcome, StrategyRequest};

/// Prefix Naver puts in front of JSON responses.
const XSSI_PREFIX: &str = ")]}',";

// -----------------------------------------------------------------------
// BlogInfo JSON
// -----------------------------------------------------------------------

const API_FOLLOWERS: &[&[&str]] = &[&["subscriberCount"], &["buddyCount"], &["neighborCount"]];
const API_POSTS: &[&[&str]] = &[&["postCount"], &["totalPostCount"]];
const API_TODAY: &[&[&str]] = &[
    &["dayVisitorCount"],
    &["todayVisitorCount"],
    &["visitorCount", "today"],
];

pub struct BlogInfoApi;

impl Strategy for BlogInfoApi {
    fn name(&self) -> &'static str {
        "naver_blog_info_api"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        let id = encode_handle(username);
        StrategyRequest::new(format!(
            "https://m.blog.naver.com/rego/BlogInfo.naver?blogId={id}"
        ))
        .accept_json()
        .header("referer", format!("https://m.blog.naver.com/{id}"))
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let trimmed = body.trim_start();
        let json = trimmed.strip_prefix(XSSI_PREFIX).unwrap_or(trimmed);
        let value: Value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => return StrategyOutcome::ParseFailure(e.to_string()),
        };
        let root = value
            .get("result")
            .or_else(|| value.get("value"))
            .unwrap_or(&value);
        let Some(followers) = first_json_count(root, API_FOLLOWERS) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: None,
            posts: first_json_count(root, API_POSTS),
            today_visitors: first_json_count(root, API_TODAY),
        })
    }
}

// -----------------------------------------------------------------------
// mobile home markup
// -----------------------------------------------------------------------

static MOBILE_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""subscriberCount"\s*:\s*"?(\d+)"#,
        r#""buddyCount"\s*:\s*"?(\d+)"#,
        r"([\d,]+)\s*명의\s*이웃",
        r"(?s)이웃\s*(?:<[^>]*>\s*)*([\d,]+)\s*(?:<[^>]*>\s*)*명",
    ])
});
static MOBILE_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""postCount"\s*:\s*"?(\d+)"#,
        r#""totalPostCount"\s*:\s*"?(\d+)"#,
        r"(?s)전체\s*글\s*(?:<[^>]*>\s*)*\(?([\d,]+)",
    ])
});
static MOBILE_TODAY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#""dayVisitorCount"\s*:\s*"?(\d+)"#,
        r"(?s)오늘\s*(?:<[^>]*>\s*)*([\d,]+)",
    ])
});

pub struct MobileHomePage;

impl Strategy for MobileHomePage {
    fn name(&self) -> &'static str {
        "naver_blog_mobile_home"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!("https://m.blog.naver.com/{}", encode_handle(username)))
            .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let Some(followers) = first_count(&MOBILE_FOLLOWERS, body) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: None,
            posts: first_count(&MOBILE_POSTS, body),
            today_visitors: first_count(&MOBILE_TODAY, body),
        })
    }
}

// -----------------------------------------------------------------------
// desktop post list
// -----------------------------------------------------------------------

static DESKTOP_FOLLOWERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?s)이웃\s*(?:<[^>]*>\s*)*([\d,]+)\s*(?:<[^>]*>\s*)*명",
        r#"(?i)buddy_?cnt["']?\s*[:=]\s*["']?([\d,]+)"#,
        r#""buddyCount"\s*:\s*"?(\d+)"#,
    ])
});
static DESKTOP_POSTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"(?i)post_?cnt["']?\s*[:=]\s*["']?([\d,]+)"#,
        r"(?s)전체보기\s*(?:<[^>]*>\s*)*\(?([\d,]+)",
    ])
});
static DESKTOP_TODAY: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?s)(?:TODAY|Today|오늘)\s*(?:<[^>]*>\s*)*([\d,]+)",
        r#"(?i)day_?visitor_?cnt["']?\s*[:=]\s*["']?([\d,]+)"#,
    ])
});

pub struct DesktopPostList;

impl Strategy for DesktopPostList {
    fn name(&self) -> &'static str {
        "naver_blog_desktop_post_list"
    }

    fn request(&self, username: &str) -> StrategyRequest {
        StrategyRequest::new(format!(
            "https://blog.naver.com/PostList.naver?blogId={}",
            encode_handle(username)
        ))
        .accept_html()
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        let Some(followers) = first_count(&DESKTOP_FOLLOWERS, body) else {
            return StrategyOutcome::Miss;
        };
        StrategyOutcome::Success(PartialStats {
            followers,
            following: None,
            posts: first_count(&DESKTOP_POSTS, body),
            today_visitors: first_count(&DESKTOP_TODAY, body),
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
    fn blog_info_strips_xssi_prefix() {
        let body = r#")]}',
{"isSuccess":true,"result":{"blogId":"cook","subscriberCount":1523,"postCount":880,"dayVisitorCount":64}}"#;
        let stats = success(BlogInfoApi.parse(body));
        assert_eq!(stats.followers, 1_523);
        assert_eq!(stats.posts, Some(880));
        assert_eq!(stats.today_visitors, Some(64));
        assert_eq!(stats.following, None);
    }

    #[test]
    fn blog_info_accepts_unprefixed_alternate_keys() {
        let body = r#"{"buddyCount":"2,048","totalPostCount":12,"visitorCount":{"today":5}}"#;
        let stats = success(BlogInfoApi.parse(body));
        assert_eq!(stats.followers, 2_048);
        assert_eq!(stats.posts, Some(12));
        assert_eq!(stats.today_visitors, Some(5));
    }

    #[test]
    fn blog_info_without_counts_is_a_miss() {
        let body = r#")]}',{"isSuccess":false,"result":null}"#;
        assert_eq!(BlogInfoApi.parse(body), StrategyOutcome::Miss);
    }

    #[test]
    fn blog_info_html_error_page_is_a_parse_failure() {
        assert!(matches!(
            BlogInfoApi.parse("<html>점검 중</html>"),
            StrategyOutcome::ParseFailure(_)
        ));
    }

    #[test]
    fn blog_info_request_carries_referer() {
        let request = BlogInfoApi.request("cook");
        assert_eq!(
            request.url,
            "https://m.blog.naver.com/rego/BlogInfo.naver?blogId=cook"
        );
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "referer" && v == "https://m.blog.naver.com/cook"));
    }

    #[test]
    fn mobile_home_reads_korean_labels() {
        let body = r#"<div class="count"><span>3,210명의 이웃</span></div>
            <div class="visit">오늘 <em>87</em></div>
            <a>전체 글 <span>(455)</span></a>"#;
        let stats = success(MobileHomePage.parse(body));
        assert_eq!(stats.followers, 3_210);
        assert_eq!(stats.today_visitors, Some(87));
        assert_eq!(stats.posts, Some(455));
    }

    #[test]
    fn mobile_home_prefers_embedded_json() {
        let body = r#"<script>var blog = {"subscriberCount":42,"postCount":"7"};</script><span>99명의 이웃</span>"#;
        let stats = success(MobileHomePage.parse(body));
        assert_eq!(stats.followers, 42);
        assert_eq!(stats.posts, Some(7));
    }

    #[test]
    fn mobile_home_without_neighbours_is_a_miss() {
        assert_eq!(
            MobileHomePage.parse("<p>존재하지 않는 블로그입니다</p>"),
            StrategyOutcome::Miss
        );
    }

    #[test]
    fn desktop_post_list_reads_buddy_and_today() {
        let body = r#"<div id="blog-stat">
            <span class="tit">이웃</span> <em>1,004</em>명
            <span>TODAY</span> <strong>12</strong>
            <script>var postCnt = '318';</script>
        </div>"#;
        let stats = success(DesktopPostList.parse(body));
        assert_eq!(stats.followers, 1_004);
        assert_eq!(stats.today_visitors, Some(12));
        assert_eq!(stats.posts, Some(318));
    }

    #[test]
    fn desktop_post_list_falls_back_to_script_variable() {
        let body = r#"<script>var buddyCnt = "560";</script>"#;
        let stats = success(DesktopPostList.parse(body));
        assert_eq!(stats.followers, 560);
    }
}
