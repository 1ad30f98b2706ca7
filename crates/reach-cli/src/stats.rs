//! The `stats` command: one coordinator run, printed as JSON.

use std::sync::Arc;
use std::time::Duration;

use reach_core::{AppConfig, SocialHandles, SocialStatsReport};
use reach_scraper::{FixedIdentity, IdentityPolicy, ReqwestTransport, RequestCoordinator};

/// User agent used by `--no-delay` when none is pinned in config.
const NO_DELAY_USER_AGENT: &str = reach_scraper::identity::USER_AGENT_POOL[0];

/// Runs every requested platform once and prints the report to stdout.
///
/// # Errors
///
/// Returns an error if no handle was given or the coordinator cannot be
/// built from `config`. Extraction failures are reported inside the JSON,
/// not as errors.
pub(crate) async fn run_stats(
    config: &AppConfig,
    handles: &SocialHandles,
    no_delay: bool,
    compact: bool,
) -> anyhow::Result<()> {
    if handles.requested().next().is_none() {
        anyhow::bail!(
            "no handles given; pass at least one of --instagram, --youtube, --tiktok, --naver-blog"
        );
    }

    let coordinator = build_coordinator(config, no_delay)
        .map_err(|e| anyhow::anyhow!("failed to build scraper: {e}"))?;
    let report = coordinator.collect(handles).await;

    let degraded = degraded_count(&report);
    if degraded > 0 {
        tracing::warn!(degraded, "some platforms fell back to placeholder stats");
    }

    println!("{}", render(&report, compact)?);
    Ok(())
}

fn build_coordinator(
    config: &AppConfig,
    no_delay: bool,
) -> Result<RequestCoordinator, reach_scraper::ScraperError> {
    if !no_delay {
        return RequestCoordinator::from_config(config);
    }
    let user_agent = config
        .scraper_user_agent
        .clone()
        .unwrap_or_else(|| NO_DELAY_USER_AGENT.to_string());
    let identity: Arc<dyn IdentityPolicy> = Arc::new(FixedIdentity::new(user_agent));
    let transport = ReqwestTransport::new(config.scraper_request_timeout_secs)?;
    Ok(RequestCoordinator::new(
        Arc::new(transport),
        identity,
        Duration::from_secs(config.scraper_request_timeout_secs),
    ))
}

pub(crate) fn render(report: &SocialStatsReport, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(report)
    } else {
        serde_json::to_string_pretty(report)
    }
}

pub(crate) fn degraded_count(report: &SocialStatsReport) -> usize {
    reach_core::Platform::ALL
        .into_iter()
        .filter_map(|platform| report.get(platform))
        .filter(|stats| stats.is_degraded())
        .count()
}
