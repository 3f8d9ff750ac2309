use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The parsing/validation core is decoupled from the actual environment so it
/// can be tested with a pure `HashMap` lookup, without `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let service_key = require("TOURMAP_SERVICE_KEY")?;
    let base_url = or_default(
        "TOURMAP_BASE_URL",
        "https://apis.data.go.kr/B551011/KorService1",
    );
    let app_name = or_default("TOURMAP_APP_NAME", "tourmap");
    let os_tag = or_default("TOURMAP_OS_TAG", "ETC");
    let log_level = or_default("TOURMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("TOURMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let page_size = parse_u32("TOURMAP_PAGE_SIZE", "12")?;
    let stats_concurrency = parse_usize("TOURMAP_STATS_CONCURRENCY", "4")?;

    Ok(AppConfig {
        service_key,
        base_url,
        app_name,
        os_tag,
        log_level,
        request_timeout_secs,
        page_size,
        stats_concurrency,
    })
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

    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("TOURMAP_SERVICE_KEY", "test-service-key");
        m
    }

    #[test]
    fn fails_without_service_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TOURMAP_SERVICE_KEY"),
            "expected MissingEnvVar(TOURMAP_SERVICE_KEY), got: {result:?}"
        );
    }

    #[test]
    fn succeeds_with_defaults() {
        let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
        assert_eq!(cfg.service_key, "test-service-key");
        assert_eq!(cfg.base_url, "https://apis.data.go.kr/B551011/KorService1");
        assert_eq!(cfg.app_name, "tourmap");
        assert_eq!(cfg.os_tag, "ETC");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.page_size, 12);
        assert_eq!(cfg.stats_concurrency, 4);
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = full_env();
        map.insert("TOURMAP_BASE_URL", "http://localhost:9999");
        map.insert("TOURMAP_PAGE_SIZE", "50");
        map.insert("TOURMAP_STATS_CONCURRENCY", "8");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:9999");
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.stats_concurrency, 8);
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut map = full_env();
        map.insert("TOURMAP_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TOURMAP_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(TOURMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let mut map = full_env();
        map.insert("TOURMAP_PAGE_SIZE", "-3");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn debug_output_redacts_service_key() {
        let cfg = build_app_config(lookup_from_map(&full_env())).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("test-service-key"));
        assert!(debug.contains("[redacted]"));
    }
}
