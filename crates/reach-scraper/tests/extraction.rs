//! End-to-end extraction through `ReqwestTransport`.
//!
//! Each test stands up a `wiremock` server and rebases the real platform
//! strategies onto it, so request building, header handling, status mapping
//! and parsing all run exactly as in production without leaving localhost.

use std::sync::Arc;
use std::time::Duration;

use reach_core::{Platform, SocialHandles, FALLBACK_FOLLOWERS};
use reach_scraper::platforms::{instagram, naver_blog, tiktok};
use reach_scraper::{
    FetchRequest, FixedIdentity, PlatformExtractor, ReqwestTransport, RequestCoordinator,
    Strategy, StrategyOutcome, StrategyRequest, Transport,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "reach-test/0.1";

/// Sends a wrapped strategy's request to the mock server instead of the
/// real host, keeping path, query and headers.
struct Rebased {
    inner: Box<dyn Strategy>,
    base: String,
}

impl Strategy for Rebased {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn request(&self, username: &str) -> StrategyRequest {
        let original = self.inner.request(username);
        let url = reqwest::Url::parse(&original.url).expect("strategies build absolute URLs");
        let rebased = match url.query() {
            Some(query) => format!("{}{}?{query}", self.base, url.path()),
            None => format!("{}{}", self.base, url.path()),
        };
        StrategyRequest {
            url: rebased,
            headers: original.headers,
        }
    }

    fn parse(&self, body: &str) -> StrategyOutcome {
        self.inner.parse(body)
    }
}

fn rebased(server: &MockServer, inner: impl Strategy + 'static) -> Box<dyn Strategy> {
    Box::new(Rebased {
        inner: Box::new(inner),
        base: server.uri(),
    })
}

fn test_transport() -> Arc<dyn Transport> {
    Arc::new(ReqwestTransport::new(5).expect("failed to build test transport"))
}

fn test_extractor(platform: Platform, strategies: Vec<Box<dyn Strategy>>) -> PlatformExtractor {
    PlatformExtractor::with_strategies(
        platform,
        strategies,
        test_transport(),
        Arc::new(FixedIdentity::new(TEST_AGENT)),
        Duration::from_secs(5),
    )
}

// ---------------------------------------------------------------------------
// transport
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transport_sends_user_agent_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/probe"))
        .and(header("user-agent", TEST_AGENT))
        .and(header("x-probe", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_transport()
        .get(&FetchRequest {
            url: format!("{}/probe", server.uri()),
            user_agent: TEST_AGENT.to_string(),
            headers: vec![("x-probe".to_string(), "1".to_string())],
        })
        .await
        .expect("request succeeds");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn transport_returns_non_success_status_as_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let response = test_transport()
        .get(&FetchRequest {
            url: format!("{}/anything", server.uri()),
            user_agent: TEST_AGENT.to_string(),
            headers: Vec::new(),
        })
        .await
        .expect("429 is a response, not a transport error");

    assert_eq!(response.status, 429);
    assert!(!response.is_success());
}

// ---------------------------------------------------------------------------
// extraction chains
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blocked_api_falls_through_to_profile_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "someone"))
        .and(header("x-ig-app-id", "936619743392459"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/someone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta property="og:description" content="1,234 Followers, 56 Following, 78 Posts - See Instagram photos and videos from Someone (@someone)"></head></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let extractor = test_extractor(
        Platform::Instagram,
        vec![
            rebased(&server, instagram::WebProfileInfo),
            rebased(&server, instagram::ProfilePage),
        ],
    );

    let stats = extractor.extract("https://www.instagram.com/someone/").await;

    assert_eq!(stats.username, "someone");
    assert_eq!(stats.followers, 1_234);
    assert_eq!(stats.following, Some(56));
    assert_eq!(stats.posts, Some(78));
    assert_eq!(stats.source.as_deref(), Some("instagram_profile_page"));
    assert!(!stats.is_degraded());
}

#[tokio::test]
async fn naver_blog_info_endpoint_reads_visitors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rego/BlogInfo.naver"))
        .and(query_param("blogId", "cook"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            ")]}',\n{\"isSuccess\":true,\"result\":{\"subscriberCount\":3210,\"postCount\":455,\"dayVisitorCount\":87}}",
        ))
        .mount(&server)
        .await;

    let extractor = test_extractor(
        Platform::NaverBlog,
        vec![rebased(&server, naver_blog::BlogInfoApi)],
    );

    let stats = extractor.extract("https://blog.naver.com/cook").await;

    assert_eq!(stats.followers, 3_210);
    assert_eq!(stats.posts, Some(455));
    assert_eq!(stats.today_visitors, Some(87));
}

#[tokio::test]
async fn every_strategy_failing_yields_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/@dancer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>captcha</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/dancer/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let extractor = test_extractor(
        Platform::Tiktok,
        vec![
            rebased(&server, tiktok::RehydrationData),
            rebased(&server, tiktok::MobileProfilePage),
            rebased(&server, tiktok::UrlebirdMirror),
        ],
    );

    let stats = extractor.extract("@dancer").await;

    assert_eq!(stats.followers, FALLBACK_FOLLOWERS);
    let error = stats.error.expect("fallback carries an error");
    assert!(error.contains("tiktok_rehydration_data: no count found"), "{error}");
    assert!(error.contains("tiktok_urlebird_mirror: HTTP 503"), "{error}");
}

#[tokio::test]
async fn slow_server_counts_as_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let extractor = PlatformExtractor::with_strategies(
        Platform::NaverBlog,
        vec![rebased(&server, naver_blog::BlogInfoApi)],
        test_transport(),
        Arc::new(FixedIdentity::new(TEST_AGENT)),
        Duration::from_millis(200),
    );

    let stats = extractor.extract("cook").await;

    assert_eq!(stats.followers, FALLBACK_FOLLOWERS);
    let error = stats.error.expect("fallback carries an error");
    assert!(error.contains("network failure"), "{error}");
}

#[tokio::test]
async fn coordinator_with_rebased_lanes_collects_requested_platforms() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rego/BlogInfo.naver"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result":{"subscriberCount":10}}"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"data":{"user":{"edge_followed_by":{"count":20},"edge_follow":{"count":2}}}}"#,
        ))
        .mount(&server)
        .await;

    let coordinator = RequestCoordinator::with_extractors(
        test_extractor(
            Platform::Instagram,
            vec![rebased(&server, instagram::WebProfileInfo)],
        ),
        test_extractor(Platform::Youtube, Vec::new()),
        test_extractor(Platform::Tiktok, Vec::new()),
        test_extractor(
            Platform::NaverBlog,
            vec![rebased(&server, naver_blog::BlogInfoApi)],
        ),
    )
    .expect("platforms line up");

    let report = coordinator
        .collect(&SocialHandles {
            instagram: Some("@someone".to_string()),
            naver_blog: Some("cook".to_string()),
            ..SocialHandles::default()
        })
        .await;

    assert_eq!(report.instagram.map(|s| s.followers), Some(20));
    assert_eq!(report.naver_blog.map(|s| s.followers), Some(10));
    assert!(report.youtube.is_none());
    assert!(report.tiktok.is_none());
}
