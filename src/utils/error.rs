use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Telegram API error ({code}): {description}")]
    TelegramApiError { code: i64, description: String },

    #[error("Database request failed with status {status}: {message}")]
    DatabaseError { status: u16, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Telegram,
    Database,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::HttpError(_) => ErrorCategory::Network,
            BotError::TelegramApiError { .. } => ErrorCategory::Telegram,
            BotError::DatabaseError { .. } => ErrorCategory::Database,
            BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BotError::SerializationError(_) => ErrorCategory::Data,
            BotError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BotError::HttpError(_) => ErrorSeverity::Medium,
            BotError::DatabaseError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            BotError::DatabaseError { .. } => ErrorSeverity::High,
            // 401 / 404 from Telegram mean the token is wrong, polling can never recover
            BotError::TelegramApiError { code: 401 | 404, .. } => ErrorSeverity::Critical,
            BotError::TelegramApiError { .. } => ErrorSeverity::Medium,
            BotError::SerializationError(_) => ErrorSeverity::High,
            BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::ConfigValidationError { .. } => ErrorSeverity::Critical,
            BotError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BotError::HttpError(_) => "Could not reach a remote service".to_string(),
            BotError::TelegramApiError { description, .. } => {
                format!("Telegram rejected the request: {}", description)
            }
            BotError::DatabaseError { status, .. } => {
                format!("The statistics database returned HTTP {}", status)
            }
            BotError::MissingConfigError { field } => {
                format!("Missing required environment variables ({})", field)
            }
            BotError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting {}: {}", field, reason)
            }
            BotError::ConfigValidationError { field, message } => {
                format!("Invalid configuration {}: {}", field, message)
            }
            BotError::SerializationError(_) => "Received malformed data".to_string(),
            BotError::IoError(e) => format!("System error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and try again",
            ErrorCategory::Telegram => "Verify BOT_TOKEN with @BotFather",
            ErrorCategory::Database => "Verify SUPABASE_URL, SUPABASE_KEY and table permissions",
            ErrorCategory::Configuration => {
                "Set BOT_TOKEN, SUPABASE_URL and SUPABASE_KEY in the environment or a .env file"
            }
            ErrorCategory::Data => "Check that the database schema matches the expected columns",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = BotError::MissingConfigError {
            field: "BOT_TOKEN".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("BOT_TOKEN"));
    }

    #[test]
    fn test_database_severity_depends_on_status() {
        let server_side = BotError::DatabaseError {
            status: 503,
            message: "unavailable".to_string(),
        };
        let client_side = BotError::DatabaseError {
            status: 400,
            message: "bad column".to_string(),
        };
        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_unauthorized_telegram_is_critical() {
        let err = BotError::TelegramApiError {
            code: 401,
            description: "Unauthorized".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);

        let flood = BotError::TelegramApiError {
            code: 429,
            description: "Too Many Requests".to_string(),
        };
        assert_eq!(flood.severity(), ErrorSeverity::Medium);
    }
}
