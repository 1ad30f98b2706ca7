//! Handle canonicalization.
//!
//! Users paste anything from `@name` to a full profile URL with tracking
//! parameters. [`canonicalize`] reduces that to the bare identifier the
//! strategies build request URLs from. An empty result means the input held
//! no usable identifier.

use reach_core::Platform;
use reqwest::Url;

const INSTAGRAM_HOSTS: &[&str] = &["instagram.com", "instagr.am"];
const TIKTOK_HOSTS: &[&str] = &["tiktok.com"];
const YOUTUBE_HOSTS: &[&str] = &["youtube.com"];
const NAVER_BLOG_HOSTS: &[&str] = &["blog.naver.com", "blog.me"];

/// Reduces a user-supplied handle or profile URL to its canonical form.
#[must_use]
pub fn canonicalize(platform: Platform, raw: &str) -> String {
    let trimmed = raw.trim();
    match platform {
        Platform::Instagram => profile_handle(trimmed, INSTAGRAM_HOSTS),
        Platform::Tiktok => profile_handle(trimmed, TIKTOK_HOSTS),
        Platform::Youtube => youtube_handle(trimmed),
        Platform::NaverBlog => naver_blog_id(trimmed),
    }
}

/// `true` for a `UC…` channel id as opposed to an `@handle`.
#[must_use]
pub fn is_youtube_channel_id(id: &str) -> bool {
    id.len() == 24
        && id.starts_with("UC")
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn profile_handle(raw: &str, hosts: &[&str]) -> String {
    match parse_profile_url(raw, hosts) {
        Some(url) => path_segments(&url)
            .into_iter()
            .next()
            .map(|segment| strip_at(&segment))
            .unwrap_or_default(),
        None => bare_handle(raw),
    }
}

fn youtube_handle(raw: &str) -> String {
    let Some(url) = parse_profile_url(raw, YOUTUBE_HOSTS) else {
        return bare_handle(raw);
    };
    let segments = path_segments(&url);
    match segments.as_slice() {
        [kind, id, ..] if matches!(kind.as_str(), "channel" | "c" | "user") => strip_at(id),
        [first, ..] => strip_at(first),
        [] => String::new(),
    }
}

fn naver_blog_id(raw: &str) -> String {
    let Some(url) = parse_profile_url(raw, NAVER_BLOG_HOSTS) else {
        return bare_handle(raw);
    };

    // PostList.naver?blogId=…, PostView.naver?blogId=…&logNo=…, and the
    // mobile equivalents all carry the id in the query.
    if let Some((_, blog_id)) = url
        .query_pairs()
        .find(|(key, _)| key.eq_ignore_ascii_case("blogId"))
    {
        return blog_id.trim().to_string();
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    // Legacy vanity domains: {id}.blog.me
    if let Some(sub) = host.strip_suffix(".blog.me") {
        return sub.trim_start_matches("www.").to_string();
    }

    match path_segments(&url).into_iter().next() {
        Some(segment)
            if !segment.ends_with(".naver")
                && !segment.ends_with(".nhn")
                && !segment.eq_ignore_ascii_case("profile") =>
        {
            segment
        }
        _ => String::new(),
    }
}

/// Parses `raw` as a URL when it names one of `hosts`, with or without a
/// scheme. Returns `None` for bare handles.
fn parse_profile_url(raw: &str, hosts: &[&str]) -> Option<Url> {
    let lowered = raw.to_ascii_lowercase();
    let candidate = if lowered.starts_with("http://") || lowered.starts_with("https://") {
        raw.to_string()
    } else {
        let host_part = lowered.split(['/', '?', '#']).next().unwrap_or_default();
        if !hosts.iter().any(|h| host_matches(host_part, h)) {
            return None;
        }
        format!("https://{raw}")
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    hosts.iter().any(|h| host_matches(&host, h)).then_some(url)
}

fn host_matches(host: &str, known: &str) -> bool {
    host == known || host.ends_with(&format!(".{known}"))
}

fn path_segments(url: &Url) -> Vec<String> {
    url.path_segments()
        .map(|segments| {
            segments
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn bare_handle(raw: &str) -> String {
    // A URL for some other site is not a handle.
    if raw.contains("://") {
        return String::new();
    }
    let without_query = raw.split(['?', '#']).next().unwrap_or_default();
    let first = without_query
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    strip_at(first)
}

fn strip_at(s: &str) -> String {
    s.trim().trim_start_matches('@').trim().to_string()
}
