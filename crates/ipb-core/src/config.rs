use std::{env, path::PathBuf, time::Duration};

use crate::{errors::Error, Result};

const DEFAULT_INSTAGRAM_BASE_URL: &str = "https://i.instagram.com";
const DEFAULT_INSTAGRAM_APP_ID: &str = "936619743392459";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // Profile lookups
    pub cache_ttl: Duration,
    pub provider_timeout: Duration,
    pub instagram_base_url: String,
    pub instagram_app_id: String,
    pub instagram_user_agent: String,

    // Telegram
    pub inline_cache_time: Duration,

    // Translations
    pub translations_dir: Option<PathBuf>,

    // Logging
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    ///
    /// Values already present in the environment are never overridden by `.env`.
    pub fn load() -> Result<Self> {
        // A missing .env is normal in production.
        let _ = dotenvy::dotenv();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (environment, map in tests).
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let str_of = |key: &str| get(key).and_then(non_empty);
        let secs_of = |key: &str, default: u64| {
            str_of(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(default))
        };

        // Required
        let telegram_bot_token = str_of("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;

        // Profile lookups
        let cache_ttl = secs_of("PROFILE_CACHE_TTL_SECS", 300);
        let provider_timeout = secs_of("PROVIDER_TIMEOUT_SECS", 10);
        if provider_timeout.is_zero() {
            return Err(Error::Config(
                "PROVIDER_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        let instagram_base_url = str_of("INSTAGRAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_INSTAGRAM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let instagram_app_id =
            str_of("INSTAGRAM_APP_ID").unwrap_or_else(|| DEFAULT_INSTAGRAM_APP_ID.to_string());
        let instagram_user_agent =
            str_of("INSTAGRAM_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let inline_cache_time = secs_of("INLINE_CACHE_SECS", 60);

        let translations_dir = str_of("TRANSLATIONS_DIR").map(PathBuf::from);

        let log_level = str_of("LOG_LEVEL")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| "info".to_string());
        let log_file = str_of("LOG_FILE").map(PathBuf::from);

        Ok(Self {
            telegram_bot_token,
            cache_ttl,
            provider_timeout,
            instagram_base_url,
            instagram_app_id,
            instagram_user_agent,
            inline_cache_time,
            translations_dir,
            log_level,
            log_file,
        })
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
