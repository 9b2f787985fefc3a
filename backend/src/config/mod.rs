//! Configuration module for the Football Lore backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the story JSON document
    pub stories_path: PathBuf,
    /// Path to the vote credit ledger JSON document
    pub credits_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Base URL of the frontend, used to build checkout redirect URLs
    pub frontend_url: Url,
    /// Stripe secret key; checkout is disabled when unset
    pub stripe_secret_key: Option<String>,
    pub stripe_api_base: Url,
    /// ISO currency code used for every checkout session
    pub currency: String,
    /// Price of a priority story boost in the smallest currency unit
    pub boost_price_cents: u64,
    /// Timeout applied to payment provider requests
    pub payment_timeout: Duration,
}

/// Invalid configuration value.
#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let stories_path = var("LORE_STORIES_PATH", "./data/stories.json").into();
        let credits_path = var("LORE_CREDITS_PATH", "./data/vote_credits.json").into();

        let bind_addr = parse("LORE_BIND_ADDR", &var("LORE_BIND_ADDR", "127.0.0.1:5000"))?;

        let log_level = var("LORE_LOG_LEVEL", "info");
        let log_format = match var("LORE_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError {
                    key: "LORE_LOG_FORMAT",
                    message: format!("expected 'pretty' or 'json', got '{}'", other),
                })
            }
        };

        let frontend_url = parse_url(
            "LORE_FRONTEND_URL",
            &var("LORE_FRONTEND_URL", "http://localhost:5173"),
        )?;
        let stripe_api_base = parse_url(
            "LORE_STRIPE_API_BASE",
            &var("LORE_STRIPE_API_BASE", "https://api.stripe.com"),
        )?;

        let stripe_secret_key = lookup("STRIPE_SECRET_KEY").filter(|key| !key.trim().is_empty());
        let currency = var("LORE_CURRENCY", "usd").to_lowercase();
        let boost_price_cents = parse(
            "LORE_BOOST_PRICE_CENTS",
            &var("LORE_BOOST_PRICE_CENTS", "500"),
        )?;
        let timeout_secs: u64 = parse(
            "LORE_PAYMENT_TIMEOUT_SECS",
            &var("LORE_PAYMENT_TIMEOUT_SECS", "10"),
        )?;

        Ok(Self {
            stories_path,
            credits_path,
            bind_addr,
            log_level,
            log_format,
            frontend_url,
            stripe_secret_key,
            stripe_api_base,
            currency,
            boost_price_cents,
            payment_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        message: format!("'{}': {}", raw, e),
    })
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError {
        key,
        message: format!("'{}': {}", raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_with(&[]).unwrap();

        assert_eq!(config.stories_path, PathBuf::from("./data/stories.json"));
        assert_eq!(
            config.credits_path,
            PathBuf::from("./data/vote_credits.json")
        );
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.frontend_url.as_str(), "http://localhost:5173/");
        assert!(config.stripe_secret_key.is_none());
        assert_eq!(config.currency, "usd");
        assert_eq!(config.boost_price_cents, 500);
        assert_eq!(config.payment_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("LORE_BIND_ADDR", "0.0.0.0:8080"),
            ("LORE_LOG_FORMAT", "json"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("LORE_CURRENCY", "EUR"),
            ("LORE_BOOST_PRICE_CENTS", "750"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_123"));
        assert_eq!(config.currency, "eur");
        assert_eq!(config.boost_price_cents, 750);
    }

    #[test]
    fn test_blank_secret_key_is_unset() {
        let config = config_with(&[("STRIPE_SECRET_KEY", "  ")]).unwrap();
        assert!(config.stripe_secret_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_with(&[("LORE_BIND_ADDR", "not-an-address")]).unwrap_err();
        assert_eq!(err.key, "LORE_BIND_ADDR");

        let err = config_with(&[("LORE_BOOST_PRICE_CENTS", "-5")]).unwrap_err();
        assert_eq!(err.key, "LORE_BOOST_PRICE_CENTS");

        let err = config_with(&[("LORE_LOG_FORMAT", "xml")]).unwrap_err();
        assert_eq!(err.key, "LORE_LOG_FORMAT");

        let err = config_with(&[("LORE_FRONTEND_URL", "localhost")]).unwrap_err();
        assert_eq!(err.key, "LORE_FRONTEND_URL");
    }
}
