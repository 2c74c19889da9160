pub mod toml_config;

use crate::core::retry::RetryPolicy;
use crate::core::ConfigProvider;
use crate::utils::error::{BotError, Result};
use crate::utils::validation::{self, mask_secret, Validate};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Clone, Parser)]
#[command(name = "burnthedev-bot")]
#[command(about = "Telegram bot reporting BurnTheDev achievements, global stats and leaderboard")]
pub struct BotConfig {
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    #[arg(long, env = "TELEGRAM_API_URL", default_value = DEFAULT_TELEGRAM_API_URL)]
    pub telegram_api_url: String,

    /// Long-poll timeout passed to getUpdates
    #[arg(long, env = "POLL_TIMEOUT_SECS", default_value_t = 30)]
    pub poll_timeout_secs: u64,

    /// HTTP timeout for every outgoing request, must exceed the poll timeout
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 40)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "RETRY_ATTEMPTS", default_value_t = 3)]
    pub retry_attempts: u32,

    #[arg(long, env = "RETRY_MIN_DELAY_SECS", default_value_t = 4)]
    pub retry_min_delay_secs: u64,

    #[arg(long, env = "RETRY_MAX_DELAY_SECS", default_value_t = 10)]
    pub retry_max_delay_secs: u64,

    #[arg(long, env = "LEADERBOARD_LIMIT", default_value_t = 10)]
    pub leaderboard_limit: usize,

    /// Optional TOML file, its values override flags and environment
    #[arg(short, long, env = "BOT_CONFIG")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "JSON_LOGS", help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            supabase_url: None,
            supabase_key: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            poll_timeout_secs: 30,
            request_timeout_secs: 40,
            retry_attempts: 3,
            retry_min_delay_secs: 4,
            retry_max_delay_secs: 10,
            leaderboard_limit: 10,
            config: None,
            verbose: false,
            json_logs: false,
        }
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &self.bot_token.as_deref().map(mask_secret))
            .field("supabase_url", &self.supabase_url)
            .field("supabase_key", &self.supabase_key.as_deref().map(mask_secret))
            .field("telegram_api_url", &self.telegram_api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_min_delay_secs", &self.retry_min_delay_secs)
            .field("retry_max_delay_secs", &self.retry_max_delay_secs)
            .field("leaderboard_limit", &self.leaderboard_limit)
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl BotConfig {
    /// 以必要的三個憑證建立設定，其餘使用預設值
    pub fn with_credentials(
        bot_token: impl Into<String>,
        supabase_url: impl Into<String>,
        supabase_key: impl Into<String>,
    ) -> Self {
        Self {
            bot_token: Some(bot_token.into()),
            supabase_url: Some(supabase_url.into()),
            supabase_key: Some(supabase_key.into()),
            ..Self::default()
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_secs(self.retry_min_delay_secs),
            Duration::from_secs(self.retry_max_delay_secs),
        )
    }
}

impl ConfigProvider for BotConfig {
    fn bot_token(&self) -> &str {
        self.bot_token.as_deref().unwrap_or_default()
    }

    fn telegram_api_url(&self) -> &str {
        self.telegram_api_url.trim_end_matches('/')
    }

    fn supabase_url(&self) -> &str {
        self.supabase_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    fn supabase_key(&self) -> &str {
        self.supabase_key.as_deref().unwrap_or_default()
    }

    fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn leaderboard_limit(&self) -> usize {
        self.leaderboard_limit
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_required_field("BOT_TOKEN", &self.bot_token)?;
        let supabase_url = validation::validate_required_field("SUPABASE_URL", &self.supabase_url)?;
        validation::validate_required_field("SUPABASE_KEY", &self.supabase_key)?;

        validation::validate_url("SUPABASE_URL", supabase_url)?;
        validation::validate_url("TELEGRAM_API_URL", &self.telegram_api_url)?;

        validation::validate_positive_number("retry_attempts", self.retry_attempts as usize, 1)?;
        if self.retry_min_delay_secs > self.retry_max_delay_secs {
            return Err(BotError::ConfigValidationError {
                field: "retry_min_delay_secs".to_string(),
                message: format!(
                    "minimum delay {}s exceeds maximum delay {}s",
                    self.retry_min_delay_secs, self.retry_max_delay_secs
                ),
            });
        }

        validation::validate_range("leaderboard_limit", self.leaderboard_limit, 1, 100)?;

        // Telegram caps long polling at 50 seconds
        validation::validate_range("poll_timeout_secs", self.poll_timeout_secs, 0, 50)?;
        if self.request_timeout_secs <= self.poll_timeout_secs {
            return Err(BotError::ConfigValidationError {
                field: "request_timeout_secs".to_string(),
                message: format!(
                    "request timeout {}s must be longer than poll timeout {}s",
                    self.request_timeout_secs, self.poll_timeout_secs
                ),
            });
        }

        Ok(())
    }
}
