use crate::config::BotConfig;
use crate::utils::error::{BotError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub telegram: Option<TelegramSection>,
    pub supabase: Option<SupabaseSection>,
    pub retry: Option<RetrySection>,
    pub leaderboard: Option<LeaderboardSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramSection {
    pub bot_token: Option<String>,
    pub api_url: Option<String>,
    pub poll_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseSection {
    pub url: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrySection {
    pub attempts: Option<u32>,
    pub min_delay_secs: Option<u64>,
    pub max_delay_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardSection {
    pub limit: Option<usize>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BotError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BotError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BOT_TOKEN})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        placeholder_regex()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply_to(&self, config: &mut BotConfig) {
        if let Some(telegram) = &self.telegram {
            if let Some(token) = resolved(&telegram.bot_token, "telegram.bot_token") {
                config.bot_token = Some(token);
            }
            if let Some(api_url) = resolved(&telegram.api_url, "telegram.api_url") {
                config.telegram_api_url = api_url;
            }
            if let Some(timeout) = telegram.poll_timeout_secs {
                config.poll_timeout_secs = timeout;
            }
            if let Some(timeout) = telegram.request_timeout_secs {
                config.request_timeout_secs = timeout;
            }
        }

        if let Some(supabase) = &self.supabase {
            if let Some(url) = resolved(&supabase.url, "supabase.url") {
                config.supabase_url = Some(url);
            }
            if let Some(key) = resolved(&supabase.key, "supabase.key") {
                config.supabase_key = Some(key);
            }
        }

        if let Some(retry) = &self.retry {
            if let Some(attempts) = retry.attempts {
                config.retry_attempts = attempts;
            }
            if let Some(min) = retry.min_delay_secs {
                config.retry_min_delay_secs = min;
            }
            if let Some(max) = retry.max_delay_secs {
                config.retry_max_delay_secs = max;
            }
        }

        if let Some(limit) = self.leaderboard.as_ref().and_then(|l| l.limit) {
            config.leaderboard_limit = limit;
        }
    }
}

/// A value still containing `${VAR}` came from an unset variable and is skipped.
fn resolved(value: &Option<String>, field: &str) -> Option<String> {
    let value = value.as_ref()?;
    if placeholder_regex().is_match(value) {
        tracing::warn!("⚠️ {} references an unset environment variable, ignoring", field);
        return None;
    }
    Some(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[telegram]
bot_token = "42:secret"
api_url = "http://localhost:8081"
poll_timeout_secs = 10
request_timeout_secs = 20

[supabase]
url = "https://project.supabase.co"
key = "service-key"

[retry]
attempts = 5
min_delay_secs = 1
max_delay_secs = 2

[leaderboard]
limit = 3
"#;

        let file = FileConfig::from_toml_str(toml_content).unwrap();
        let mut config = BotConfig::default();
        file.apply_to(&mut config);

        assert_eq!(config.bot_token.as_deref(), Some("42:secret"));
        assert_eq!(config.telegram_api_url, "http://localhost:8081");
        assert_eq!(config.poll_timeout_secs, 10);
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.supabase_url.as_deref(), Some("https://project.supabase.co"));
        assert_eq!(config.supabase_key.as_deref(), Some("service-key"));
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_min_delay_secs, 1);
        assert_eq!(config.retry_max_delay_secs, 2);
        assert_eq!(config.leaderboard_limit, 3);
    }

    #[test]
    fn test_partial_file_keeps_existing_values() {
        let file = FileConfig::from_toml_str("[leaderboard]\nlimit = 20\n").unwrap();
        let mut config = BotConfig::with_credentials("t", "https://db.example.com", "k");
        file.apply_to(&mut config);

        assert_eq!(config.leaderboard_limit, 20);
        assert_eq!(config.bot_token.as_deref(), Some("t"));
        assert_eq!(config.retry_attempts, 3);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BURNTHEDEV_TEST_SUPABASE_KEY", "from-env");

        let toml_content = r#"
[supabase]
key = "${BURNTHEDEV_TEST_SUPABASE_KEY}"
url = "${BURNTHEDEV_TEST_UNSET_URL}"
"#;

        let file = FileConfig::from_toml_str(toml_content).unwrap();
        let supabase = file.supabase.clone().unwrap();
        assert_eq!(supabase.key.as_deref(), Some("from-env"));
        assert_eq!(supabase.url.as_deref(), Some("${BURNTHEDEV_TEST_UNSET_URL}"));

        let mut config = BotConfig::default();
        file.apply_to(&mut config);
        assert_eq!(config.supabase_key.as_deref(), Some("from-env"));
        assert!(config.supabase_url.is_none());

        std::env::remove_var("BURNTHEDEV_TEST_SUPABASE_KEY");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = FileConfig::from_toml_str("[retry]\nattempts = \"many\"\n");
        assert!(matches!(result, Err(BotError::ConfigValidationError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[telegram]\nbot_token = \"7:file\"\n")
            .unwrap();

        let file = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            file.telegram.unwrap().bot_token.as_deref(),
            Some("7:file")
        );
    }

    #[test]
    fn test_bundled_example_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/bot.example.toml");
        let file = FileConfig::from_file(path).unwrap();

        let mut config = BotConfig::default();
        file.apply_to(&mut config);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.leaderboard_limit, 10);
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FileConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(BotError::IoError(_))));
    }
}
