use crate::core::achievements::AchievementProgress;
use crate::core::replies;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{Command, Message};
use crate::domain::ports::StatsRepository;

/// Builds the reply text for each command. Repository failures are turned
/// into the command-specific error reply, so `handle` never fails.
pub struct CommandHandler<R: StatsRepository> {
    repository: R,
    retry: RetryPolicy,
    leaderboard_limit: usize,
}

impl<R: StatsRepository> CommandHandler<R> {
    pub fn new(repository: R, retry: RetryPolicy, leaderboard_limit: usize) -> Self {
        Self {
            repository,
            retry,
            leaderboard_limit,
        }
    }

    pub async fn handle(&self, command: Command, message: &Message) -> String {
        match command {
            Command::Start => replies::welcome_message().to_string(),
            Command::Help => replies::help_message().to_string(),
            Command::Progress => self.progress(message).await,
            Command::Global => self.global_stats().await,
            Command::Leaderboard => self.leaderboard().await,
        }
    }

    async fn progress(&self, message: &Message) -> String {
        let username = message.from.as_ref().and_then(|user| user.username.as_deref());

        let points = match username {
            Some(name) => {
                match self
                    .retry
                    .run("find player", || self.repository.find_player(name))
                    .await
                {
                    Ok(player) => player.map(|p| p.points).unwrap_or(0),
                    Err(e) => {
                        tracing::error!("Error in progress command: {}", e);
                        return replies::PROGRESS_ERROR.to_string();
                    }
                }
            }
            None => {
                tracing::debug!("Sender has no username, reporting empty progress");
                0
            }
        };

        replies::progress_message(&AchievementProgress::evaluate(points))
    }

    async fn global_stats(&self) -> String {
        match self
            .retry
            .run("fetch global stats", || self.repository.fetch_global_stats())
            .await
        {
            Ok(stats) => replies::global_stats_message(&stats),
            Err(e) => {
                tracing::error!("Error in global stats command: {}", e);
                replies::GLOBAL_STATS_ERROR.to_string()
            }
        }
    }

    async fn leaderboard(&self) -> String {
        let limit = self.leaderboard_limit;
        match self
            .retry
            .run("fetch leaderboard", || self.repository.fetch_leaderboard(limit))
            .await
        {
            Ok(players) => replies::leaderboard_message(&players),
            Err(e) => {
                tracing::error!("Error in leaderboard command: {}", e);
                replies::LEADERBOARD_ERROR.to_string()
            }
        }
    }
}
