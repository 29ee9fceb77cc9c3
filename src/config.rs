use chrono::Duration;
use tracing::warn;

use crate::session::types::SessionConfig;

/// Demo environment base URL
pub const DEMO_BASE_URL: &str = "https://demo.tradovateapi.com/v1";

/// Live environment base URL
pub const LIVE_BASE_URL: &str = "https://live.tradovateapi.com/v1";

/// Credentials and endpoint for the upstream brokerage API.
///
/// The app id and secret belong to the proxy operator, never to end users.
#[derive(Clone)]
pub struct TradovateConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    pub app_version: String,
}

impl std::fmt::Debug for TradovateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradovateConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("app_version", &self.app_version)
            .finish_non_exhaustive()
    }
}

impl Default for TradovateConfig {
    fn default() -> Self {
        Self {
            base_url: DEMO_BASE_URL.to_string(),
            app_id: "sample".to_string(),
            app_secret: String::new(),
            app_version: "1.0.0".to_string(),
        }
    }
}

/// Application configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub tradovate: TradovateConfig,
    /// Adds the `Secure` attribute to session cookies
    pub secure_cookies: bool,
    pub session: SessionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            tradovate: TradovateConfig::default(),
            secure_cookies: false,
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Builds the configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let is_live = lookup("TRADOVATE_ENV")
            .map(|v| v.eq_ignore_ascii_case("live"))
            .unwrap_or(false);
        let base_url = lookup("TRADOVATE_BASE_URL").unwrap_or_else(|| {
            if is_live {
                LIVE_BASE_URL.to_string()
            } else {
                DEMO_BASE_URL.to_string()
            }
        });

        let tradovate = TradovateConfig {
            base_url,
            app_id: lookup("TRADOVATE_APP_ID").unwrap_or(defaults.tradovate.app_id),
            app_secret: lookup("TRADOVATE_APP_SECRET").unwrap_or_default(),
            app_version: defaults.tradovate.app_version,
        };

        let secure_cookies = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let session = SessionConfig {
            lifetime: minutes_from(&lookup, "SESSION_LIFETIME_MINUTES", defaults.session.lifetime),
            idle_timeout: minutes_from(
                &lookup,
                "SESSION_IDLE_TIMEOUT_MINUTES",
                defaults.session.idle_timeout,
            ),
            active_threshold: minutes_from(
                &lookup,
                "SESSION_ACTIVE_THRESHOLD_MINUTES",
                defaults.session.active_threshold,
            ),
            sweep_interval: minutes_from(
                &lookup,
                "SESSION_SWEEP_INTERVAL_MINUTES",
                Duration::minutes(10),
            )
            .to_std()
            .unwrap_or(defaults.session.sweep_interval),
        };

        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            tradovate,
            secure_cookies,
            session,
        }
    }
}

/// Upper bound for any session threshold: one year
const MAX_MINUTES: i64 = 365 * 24 * 60;

/// Reads a positive whole number of minutes, keeping the default on bad input
fn minutes_from(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: Duration,
) -> Duration {
    let Some(raw) = lookup(name) else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(minutes) if (1..=MAX_MINUTES).contains(&minutes) => {
            Duration::try_minutes(minutes).unwrap_or(default)
        }
        _ => {
            warn!(variable = name, value = %raw, "Ignoring invalid minutes value, using default");
            default
        }
    }
}
