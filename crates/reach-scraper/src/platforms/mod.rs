//! Per-platform strategy lists.
//!
//! Each submodule exposes its strategies as unit structs; [`strategies_for`]
//! returns them in priority order: structured endpoints first, markup next,
//! third-party mirrors last.

pub mod instagram;
pub mod naver_blog;
pub mod tiktok;
pub mod youtube;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reach_core::Platform;

use crate::strategy::Strategy;

/// Characters left as-is inside a username path segment or query value.
const HANDLE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

/// The ordered strategy list for `platform`.
#[must_use]
pub fn strategies_for(platform: Platform) -> Vec<Box<dyn Strategy>> {
    match platform {
        Platform::Instagram => vec![
            Box::new(instagram::WebProfileInfo),
            Box::new(instagram::ProfilePage),
            Box::new(instagram::PicukiMirror),
        ],
        Platform::Youtube => vec![
            Box::new(youtube::ChannelPage),
            Box::new(youtube::AboutPage),
            Box::new(youtube::SocialBladeMirror),
        ],
        Platform::Tiktok => vec![
            Box::new(tiktok::RehydrationData),
            Box::new(tiktok::MobileProfilePage),
            Box::new(tiktok::UrlebirdMirror),
        ],
        Platform::NaverBlog => vec![
            Box::new(naver_blog::BlogInfoApi),
            Box::new(naver_blog::MobileHomePage),
            Box::new(naver_blog::DesktopPostList),
        ],
    }
}

/// Percent-encodes a canonical handle for use in a URL.
pub(crate) fn encode_handle(handle: &str) -> String {
    utf8_percent_encode(handle, HANDLE).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_platform_has_three_uniquely_named_strategies() {
        let mut names = HashSet::new();
        for platform in Platform::ALL {
            let strategies = strategies_for(platform);
            assert_eq!(strategies.len(), 3, "{platform}");
            for strategy in &strategies {
                assert!(names.insert(strategy.name()), "duplicate {}", strategy.name());
            }
        }
    }

    #[test]
    fn encode_handle_keeps_common_handle_characters() {
        assert_eq!(encode_handle("john.doe_-1"), "john.doe_-1");
        assert_eq!(encode_handle("a b/c"), "a%20b%2Fc");
    }
}
