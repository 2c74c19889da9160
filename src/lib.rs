pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{SupabaseClient, TelegramClient};
pub use crate::config::{toml_config::FileConfig, BotConfig};
pub use crate::core::{bot::BotEngine, handlers::CommandHandler, retry::RetryPolicy};
pub use crate::domain::model::ACHIEVEMENTS;
pub use crate::utils::error::{BotError, Result};
