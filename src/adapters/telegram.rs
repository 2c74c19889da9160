use crate::core::{ChatApi, ConfigProvider, Result, Update};
use crate::domain::model::BotIdentity;
use crate::utils::error::BotError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct DeleteWebhookRequest {
    drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`, never logged.
    base_url: String,
}

impl TelegramClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(
            client,
            config.telegram_api_url(),
            config.bot_token(),
        ))
    }

    pub fn with_client(client: Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Calling Telegram method {}", method);

        // reqwest embeds the URL (and with it the token) in its errors
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(payload)
            .send()
            .await
            .map_err(|e| BotError::HttpError(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::HttpError(e.without_url()))?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(BotError::TelegramApiError {
                    code: i64::from(status.as_u16()),
                    description: status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        if !envelope.ok {
            return Err(BotError::TelegramApiError {
                code: envelope
                    .error_code
                    .unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope.result.ok_or_else(|| BotError::TelegramApiError {
            code: i64::from(status.as_u16()),
            description: format!("{} returned no result", method),
        })
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn get_me(&self) -> Result<BotIdentity> {
        self.call("getMe", &serde_json::json!({})).await
    }

    async fn delete_webhook(&self) -> Result<()> {
        let request = DeleteWebhookRequest {
            drop_pending_updates: false,
        };
        let _: bool = self.call("deleteWebhook", &request).await?;
        Ok(())
    }

    async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
            // empty list: every update type the bot is entitled to
            allowed_updates: &[],
        };
        self.call("getUpdates", &request).await
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let request = SendMessageRequest { chat_id, text };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}
