use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("REACH_ENV", "development"));
    let bind_addr = parse_addr("REACH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("REACH_LOG_LEVEL", "info");

    let scraper_request_timeout_secs = parse_u64("REACH_SCRAPER_REQUEST_TIMEOUT_SECS", "10")?;
    if scraper_request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "REACH_SCRAPER_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }

    let scraper_min_delay_ms = parse_u64("REACH_SCRAPER_MIN_DELAY_MS", "1000")?;
    let scraper_max_delay_ms = parse_u64("REACH_SCRAPER_MAX_DELAY_MS", "3000")?;
    if scraper_min_delay_ms > scraper_max_delay_ms {
        return Err(ConfigError::InvalidDelayRange {
            min_ms: scraper_min_delay_ms,
            max_ms: scraper_max_delay_ms,
        });
    }

    let scraper_user_agent = lookup("REACH_SCRAPER_USER_AGENT")
        .ok()
        .map(|ua| ua.trim().to_string())
        .filter(|ua| !ua.is_empty());

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        scraper_request_timeout_secs,
        scraper_min_delay_ms,
        scraper_max_delay_ms,
        scraper_user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("staging"), Environment::Development);
    }

    #[test]
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let config = build_app_config(lookup_from_map(&map)).expect("defaults are valid");

        assert_eq!(config.env, Environment::Development);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scraper_request_timeout_secs, 10);
        assert_eq!(config.scraper_min_delay_ms, 1000);
        assert_eq!(config.scraper_max_delay_ms, 3000);
        assert!(config.scraper_user_agent.is_none());
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_ENV", "test");
        map.insert("REACH_BIND_ADDR", "127.0.0.1:8080");
        map.insert("REACH_SCRAPER_REQUEST_TIMEOUT_SECS", "4");
        map.insert("REACH_SCRAPER_MIN_DELAY_MS", "0");
        map.insert("REACH_SCRAPER_MAX_DELAY_MS", "0");
        map.insert("REACH_SCRAPER_USER_AGENT", "  reach-test/1.0 ");

        let config = build_app_config(lookup_from_map(&map)).expect("valid overrides");
        assert_eq!(config.env, Environment::Test);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.scraper_request_timeout_secs, 4);
        assert_eq!(config.scraper_min_delay_ms, 0);
        assert_eq!(config.scraper_max_delay_ms, 0);
        assert_eq!(config.scraper_user_agent.as_deref(), Some("reach-test/1.0"));
    }

    #[test]
    fn blank_user_agent_is_treated_as_unset() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_SCRAPER_USER_AGENT", "   ");
        let config = build_app_config(lookup_from_map(&map)).expect("valid");
        assert!(config.scraper_user_agent.is_none());
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_SCRAPER_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidEnvVar { ref var, .. })
                    if var == "REACH_SCRAPER_REQUEST_TIMEOUT_SECS"
            ),
            "expected InvalidEnvVar, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_timeout() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_SCRAPER_REQUEST_TIMEOUT_SECS", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn build_app_config_rejects_inverted_delay_range() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_SCRAPER_MIN_DELAY_MS", "5000");
        map.insert("REACH_SCRAPER_MAX_DELAY_MS", "100");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(
                result,
                Err(ConfigError::InvalidDelayRange {
                    min_ms: 5000,
                    max_ms: 100
                })
            ),
            "expected InvalidDelayRange, got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_bad_bind_addr() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("REACH_BIND_ADDR", "not-an-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }
}
