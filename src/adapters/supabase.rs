use crate::core::{ConfigProvider, GlobalStats, Player, Result, StatsRepository};
use crate::utils::error::BotError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

const GLOBAL_STATS_TABLE: &str = "global_stats";
const PLAYERS_TABLE: &str = "players";

/// Minimal PostgREST client for the Supabase tables the bot reads.
pub struct SupabaseClient {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self::with_client(
            client,
            config.supabase_url(),
            config.supabase_key(),
        ))
    }

    pub fn with_client(client: Client, supabase_url: &str, api_key: &str) -> Self {
        Self {
            client,
            rest_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.rest_url, table);
        tracing::debug!("Querying {} with {:?}", table, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BotError::DatabaseError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl StatsRepository for SupabaseClient {
    async fn fetch_global_stats(&self) -> Result<GlobalStats> {
        let rows: Vec<GlobalStats> = self
            .select(GLOBAL_STATS_TABLE, &[("select", "*".to_string())])
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn fetch_leaderboard(&self, limit: usize) -> Result<Vec<Player>> {
        self.select(
            PLAYERS_TABLE,
            &[
                ("select", "*".to_string()),
                ("order", "points.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn find_player(&self, name: &str) -> Result<Option<Player>> {
        let rows: Vec<Player> = self
            .select(
                PLAYERS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("name", format!("eq.{}", name)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }
}
