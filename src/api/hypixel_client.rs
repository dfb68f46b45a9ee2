use anyhow::{Context, Result};
use log::info;
use serde_json::Value;

use crate::config::settings::HypixelSettings;
use crate::domain::GuildResponse;
use crate::http::RateLimitedClient;

/// Hypixel API client for guild data
pub struct HypixelClient {
    client: RateLimitedClient,
    api_base_url: &'static str,
}

impl HypixelClient {
    pub fn new(settings: &HypixelSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url,
        })
    }

    /// Fetch the guild by id.
    ///
    /// Returns both the full raw JSON (for the cache, so domain structs can
    /// evolve without refetching) and the parsed response.
    pub async fn fetch_guild(
        &mut self,
        api_key: &str,
        guild_id: &str,
    ) -> Result<(Value, GuildResponse)> {
        let url = format!("{}/guild?key={}&id={}", self.api_base_url, api_key, guild_id);
        info!("Fetching guild {} from Hypixel", guild_id);

        let response = self.client.get(&url).await?;

        if !response.status().is_success() {
            anyhow::bail!("Hypixel API returned status: {}", response.status());
        }

        let raw: Value = response
            .json()
            .await
            .context("Failed to parse Hypixel guild response as JSON")?;

        let parsed: GuildResponse = serde_json::from_value(raw.clone())
            .context("Failed to map Hypixel response to GuildResponse")?;

        if !parsed.success {
            anyhow::bail!("Hypixel API reported success=false for guild {}", guild_id);
        }

        Ok((raw, parsed))
    }
}
