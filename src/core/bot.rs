use crate::core::handlers::CommandHandler;
use crate::core::replies;
use crate::domain::model::{BotIdentity, Command, Update};
use crate::domain::ports::{ChatApi, StatsRepository};
use crate::utils::error::{BotError, ErrorSeverity, Result};
use std::future::Future;
use std::time::Duration;

const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(1);
const MAX_ERROR_BACKOFF: Duration = Duration::from_secs(30);
const ERROR_BACKOFF_FACTOR: f64 = 1.5;

/// 連續失敗時的下一次等待時間 (1.5 倍，上限 30 秒)
fn next_backoff(current: Duration) -> Duration {
    current.mul_f64(ERROR_BACKOFF_FACTOR).min(MAX_ERROR_BACKOFF)
}

/// getUpdates is refused with 409 while a webhook is set.
fn is_webhook_conflict(error: &BotError) -> bool {
    matches!(error, BotError::TelegramApiError { code: 409, .. })
}

/// Long-polling loop: fetches updates, dispatches commands and replies.
pub struct BotEngine<C: ChatApi, R: StatsRepository> {
    chat: C,
    handler: CommandHandler<R>,
    poll_timeout: Duration,
    error_backoff: Duration,
    bot_username: Option<String>,
}

impl<C: ChatApi, R: StatsRepository> BotEngine<C, R> {
    pub fn new(chat: C, handler: CommandHandler<R>, poll_timeout: Duration) -> Self {
        Self {
            chat,
            handler,
            poll_timeout,
            error_backoff: DEFAULT_ERROR_BACKOFF,
            bot_username: None,
        }
    }

    /// Pause after the first failed getUpdates call. Each further consecutive
    /// failure waits 1.5 times longer, up to 30 seconds.
    pub fn with_error_backoff(mut self, backoff: Duration) -> Self {
        self.error_backoff = backoff;
        self
    }

    pub fn bot_username(&self) -> Option<&str> {
        self.bot_username.as_deref()
    }

    /// Resolves the bot's own username so addressed commands can be matched,
    /// then clears any webhook left on the token so long polling is accepted.
    pub async fn start(&mut self) -> Result<BotIdentity> {
        let me = self.chat.get_me().await?;
        tracing::info!(
            "🤖 Authorized as @{} (id {})",
            me.username.as_deref().unwrap_or("<unnamed>"),
            me.id
        );
        self.bot_username = me.username.clone();

        self.chat.delete_webhook().await?;
        tracing::debug!("Webhook cleared, using getUpdates");
        Ok(me)
    }

    /// Handles one update; returns the command that was answered, if any.
    pub async fn process_update(&self, update: &Update) -> Option<Command> {
        let message = update.message.as_ref()?;
        let text = message.text.as_deref()?;
        let command = Command::parse(text, self.bot_username.as_deref())?;

        tracing::debug!(
            "📨 Update {} /{} from chat {} (sent {})",
            update.update_id,
            command.name(),
            message.chat.id,
            message
                .sent_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string())
        );

        let reply = self.handler.handle(command, message).await;
        if let Err(e) = self.chat.send_message(message.chat.id, &reply).await {
            // 指令專屬的錯誤訊息優先，送不出去才交給全域錯誤處理
            match replies::error_reply(command).filter(|fallback| *fallback != reply) {
                Some(fallback) => {
                    tracing::error!("Error in /{} command: {}", command.name(), e);
                    if let Err(e) = self.chat.send_message(message.chat.id, fallback).await {
                        self.handle_error(update, &e).await;
                    }
                }
                None => self.handle_error(update, &e).await,
            }
        }

        Some(command)
    }

    async fn handle_error(&self, update: &Update, error: &BotError) {
        tracing::error!("Update {} caused error {}", update.update_id, error);

        if let Some(message) = &update.message {
            if let Err(e) = self
                .chat
                .send_message(message.chat.id, replies::GENERIC_ERROR)
                .await
            {
                tracing::warn!(
                    "Could not deliver error notice for update {}: {}",
                    update.update_id,
                    e
                );
            }
        }
    }

    /// One getUpdates round trip. Returns the offset for the next call.
    pub async fn poll_once(&self, offset: Option<i64>) -> Result<Option<i64>> {
        let updates = self.chat.get_updates(offset, self.poll_timeout).await?;
        if !updates.is_empty() {
            tracing::debug!("Received {} update(s)", updates.len());
        }

        let mut next_offset = offset;
        for update in &updates {
            self.process_update(update).await;
            next_offset = Some(next_offset.map_or(update.update_id + 1, |current| {
                current.max(update.update_id + 1)
            }));
        }

        Ok(next_offset)
    }

    /// Polls until `shutdown` completes. Only errors that can never recover
    /// (such as a revoked token) stop the loop.
    pub async fn run<S>(&mut self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if self.bot_username.is_none() {
            self.start().await?;
        }

        tracing::info!("Starting bot...");
        let mut offset = None;
        let mut backoff = self.error_backoff;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested, stopping polling");
                    return Ok(());
                }
                result = self.poll_once(offset) => match result {
                    Ok(next) => {
                        offset = next;
                        backoff = self.error_backoff;
                    }
                    Err(e) if e.severity() == ErrorSeverity::Critical => {
                        tracing::error!("❌ Polling aborted: {}", e);
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Polling failed: {} (retrying in {:?})", e, backoff);
                        if is_webhook_conflict(&e) {
                            if let Err(e) = self.chat.delete_webhook().await {
                                tracing::warn!("Could not clear webhook: {}", e);
                            }
                        }
                        tokio::select! {
                            _ = &mut shutdown => {
                                tracing::info!("🛑 Shutdown requested, stopping polling");
                                return Ok(());
                            }
                            _ = tokio::time::sleep(backoff) => {}
                        }
                        backoff = next_backoff(backoff);
                    }
                },
            }
        }
    }
}
