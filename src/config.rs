//! Provider endpoint configuration, resolved with priority ENV > default.

use chrono::Duration;

const DEFAULT_AUTHORIZE_URL: &str = "https://www.dropbox.com/oauth2/authorize";
const DEFAULT_TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";
const DEFAULT_SCOPES: &str = "account_info.read";
const DEFAULT_STATE_TTL_SECS: i64 = 600;
const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 30;

/// Identity-provider endpoints and flow tuning for one deployment.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Browser-facing authorization endpoint.
    pub authorize_url: String,
    /// Server-to-server token exchange endpoint.
    pub token_url: String,
    /// Scope string applied when a login request omits one.
    pub default_scopes: String,
    /// How long a pending login may wait for its callback.
    pub state_ttl: Duration,
    /// Upper bound on the token exchange round trip.
    pub exchange_timeout: std::time::Duration,
}

impl ProviderConfig {
    /// Resolve configuration from the environment, falling back to
    /// Dropbox-shaped defaults.
    pub fn from_env() -> Self {
        Self {
            authorize_url: env_or("RELAY_AUTHORIZE_URL", DEFAULT_AUTHORIZE_URL),
            token_url: env_or("RELAY_TOKEN_URL", DEFAULT_TOKEN_URL),
            default_scopes: env_or("RELAY_DEFAULT_SCOPES", DEFAULT_SCOPES),
            state_ttl: Duration::seconds(env_or_parse(
                "RELAY_STATE_TTL_SECS",
                DEFAULT_STATE_TTL_SECS,
            )),
            exchange_timeout: std::time::Duration::from_secs(env_or_parse(
                "RELAY_EXCHANGE_TIMEOUT_SECS",
                DEFAULT_EXCHANGE_TIMEOUT_SECS,
            )),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            default_scopes: DEFAULT_SCOPES.to_string(),
            state_ttl: Duration::seconds(DEFAULT_STATE_TTL_SECS),
            exchange_timeout: std::time::Duration::from_secs(DEFAULT_EXCHANGE_TIMEOUT_SECS),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_provider_endpoints() {
        let config = ProviderConfig::default();
        assert!(config.authorize_url.ends_with("/oauth2/authorize"));
        assert!(config.token_url.ends_with("/oauth2/token"));
        assert_eq!(config.default_scopes, "account_info.read");
        assert_eq!(config.state_ttl, Duration::seconds(600));
    }

    #[test]
    fn env_or_parse_defaults_when_unset() {
        // Key absent: default wins
        assert_eq!(env_or_parse("RELAY_TEST_UNSET_KEY", 42i64), 42);
    }

    #[test]
    fn env_overrides_beat_defaults() {
        std::env::set_var("RELAY_TEST_SET_KEY", "7");
        assert_eq!(env_or_parse("RELAY_TEST_SET_KEY", 42i64), 7);

        std::env::set_var("RELAY_TEST_SET_URL", "https://other.example/oauth2/authorize");
        assert_eq!(
            env_or("RELAY_TEST_SET_URL", DEFAULT_AUTHORIZE_URL),
            "https://other.example/oauth2/authorize"
        );

        // Unparseable override falls back to the default
        std::env::set_var("RELAY_TEST_SET_GARBAGE", "not-a-number");
        assert_eq!(env_or_parse("RELAY_TEST_SET_GARBAGE", 42i64), 42);
    }
}
