use crate::domain::model::{BotIdentity, GlobalStats, Player, Update};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn bot_token(&self) -> &str;
    fn telegram_api_url(&self) -> &str;
    fn supabase_url(&self) -> &str;
    fn supabase_key(&self) -> &str;
    fn poll_timeout(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
    fn leaderboard_limit(&self) -> usize;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn fetch_global_stats(&self) -> Result<GlobalStats>;
    async fn fetch_leaderboard(&self, limit: usize) -> Result<Vec<Player>>;
    async fn find_player(&self, name: &str) -> Result<Option<Player>>;
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn get_me(&self) -> Result<BotIdentity>;
    /// Removes any webhook so that getUpdates is allowed. Pending updates are kept.
    async fn delete_webhook(&self) -> Result<()>;
    async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>>;
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}
