//! Shared extraction primitives for strategy parsers.
//!
//! Each field a strategy reads is backed by an ordered list of patterns
//! (regexes or JSON paths). The first one that matches wins, so supporting a
//! new markup variant means appending a pattern, not touching the others.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::normalize::normalize_count;

/// The first displayed number in a label such as `1.2M subscribers` or
/// `구독자 1.2만명`.
static COUNT_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d.,]*(?:\s*[KMBkmb]\b|\s*[천만억])?)").expect("valid regex")
});

static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script>").expect("valid regex")
});

static META_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).expect("valid regex")
});

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});

static META_KEY_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s(?:property|name)\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});

static META_CONTENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\scontent\s*=\s*"([^"]*)""#).expect("valid regex")
});

/// Compiles a fixed pattern list. Patterns are literals in this crate, so a
/// failure is a programming error.
pub(crate) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// Returns the normalized first capture group of the first pattern that
/// matches `haystack` with a capture containing at least one digit.
pub(crate) fn first_count(patterns: &[Regex], haystack: &str) -> Option<u64> {
    patterns.iter().find_map(|re| {
        re.captures_iter(haystack).find_map(|cap| {
            let raw = cap.get(1)?.as_str();
            raw.chars()
                .any(|c| c.is_ascii_digit())
                .then(|| normalize_count(raw))
        })
    })
}

/// Reads the first count printed in a free-text label.
pub(crate) fn count_in_text(text: &str) -> Option<u64> {
    COUNT_IN_TEXT
        .captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| normalize_count(m.as_str()))
}

/// Depth-first search for the first value stored under `key`.
pub(crate) fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// Flattens the text forms YouTube-style payloads use: a plain string,
/// `{"simpleText": ..}`, `{"content": ..}` or `{"runs": [{"text": ..}, ..]}`.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            if let Some(text) = map
                .get("simpleText")
                .or_else(|| map.get("content"))
                .and_then(Value::as_str)
            {
                return Some(text.to_string());
            }
            let runs = map.get("runs")?.as_array()?;
            let joined: String = runs
                .iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect();
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

/// Reads a count at `path`. Numbers are taken as-is; strings go through
/// [`normalize_count`].
pub(crate) fn json_count(value: &Value, path: &[&str]) -> Option<u64> {
    let mut node = value;
    for key in path {
        node = node.get(*key)?;
    }
    match node {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let floored = f.floor() as u64;
                    floored
                })
        }),
        Value::String(s) if s.chars().any(|c| c.is_ascii_digit()) => Some(normalize_count(s)),
        _ => None,
    }
}

/// Tries each path in order and returns the first count found.
pub(crate) fn first_json_count(value: &Value, paths: &[&[&str]]) -> Option<u64> {
    paths.iter().find_map(|path| json_count(value, path))
}

/// Returns the body of the first `<script>` whose `id` attribute is `id`.
pub(crate) fn script_by_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    SCRIPT_TAG
        .captures_iter(html)
        .find(|cap| {
            cap.get(1)
                .and_then(|attrs| attr_value(&ID_ATTR, attrs.as_str()))
                .is_some_and(|value| value == id)
        })
        .and_then(|cap| cap.get(2))
        .map(|m| m.as_str().trim())
}

/// Finds `marker` in `s` and returns the balanced JSON object that follows it.
///
/// Used for inline assignments such as `var ytInitialData = {...};`.
pub(crate) fn object_after<'a>(s: &'a str, marker: &str) -> Option<&'a str> {
    let start = s.find(marker)? + marker.len();
    let rest = &s[start..];
    let brace = rest.find('{')?;
    extract_balanced_object(&rest[brace..])
}

/// Returns the shortest prefix of `s` that forms a complete `{…}` object,
/// respecting string literals and escapes.
pub(crate) fn extract_balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            ']' => depth -= 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Returns the `content` of `<meta property|name="{key}">`, entity-decoded.
pub(crate) fn meta_content(html: &str, key: &str) -> Option<String> {
    META_TAG
        .find_iter(html)
        .map(|tag| tag.as_str())
        .find(|tag| attr_value(&META_KEY_ATTR, tag).is_some_and(|value| value == key))
        .and_then(|tag| attr_value(&META_CONTENT_ATTR, tag))
        .map(decode_entities)
}

/// The first capture of `attr` inside a tag's attribute text.
fn attr_value<'a>(attr: &Regex, attrs: &'a str) -> Option<&'a str> {
    attr.captures(attrs)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Decodes the handful of entities that show up in meta descriptions.
pub(crate) fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#x2c;", ",")
        .replace("&#44;", ",")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
