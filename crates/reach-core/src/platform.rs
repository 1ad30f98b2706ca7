//! Supported social platforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A platform whose public pages the scraper knows how to read.
///
/// Serialized with the same camelCase keys the request/response records use
/// (`"instagram"`, `"youtube"`, `"tiktok"`, `"naverBlog"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
    NaverBlog,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::NaverBlog,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::NaverBlog => "naverBlog",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "youtube" | "yt" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "naverblog" | "naver_blog" | "naver-blog" | "naver" => Ok(Platform::NaverBlog),
            _ => Err(CoreError::UnknownPlatform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("naver-blog".parse::<Platform>().unwrap(), Platform::NaverBlog);
        assert_eq!("naverBlog".parse::<Platform>().unwrap(), Platform::NaverBlog);
        assert!("myspace".parse::<Platform>().is_err());
    }

    #[test]
    fn serializes_with_record_keys() {
        let json = serde_json::to_string(&Platform::NaverBlog).unwrap();
        assert_eq!(json, "\"naverBlog\"");
        for platform in Platform::ALL {
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
    }
}
