use anyhow::Result;
use log::warn;
use serde::Deserialize;

use crate::config::settings::HypixelSettings;
use crate::http::RateLimitedClient;

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    name: String,
}

/// Mojang session-server client for uuid-to-username lookups
pub struct MojangClient {
    client: RateLimitedClient,
    session_url: &'static str,
}

impl MojangClient {
    pub fn new(settings: &HypixelSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;

        Ok(Self {
            client,
            session_url: settings.mojang_session_url,
        })
    }

    /// Look up a player's current username.
    ///
    /// Unlike the guild fetch, a failed lookup degrades to "Unknown" so one
    /// renamed or deleted account never aborts a whole ingestion run.
    pub async fn fetch_username(&mut self, uuid: &str) -> String {
        match self.try_fetch_username(uuid).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to fetch username for {}: {:#}", uuid, e);
                "Unknown".to_string()
            }
        }
    }

    async fn try_fetch_username(&mut self, uuid: &str) -> Result<String> {
        let clean_uuid = uuid.replace('-', "");
        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.session_url, clean_uuid
        );

        let response = self.client.get(&url).await?;

        if !response.status().is_success() {
            anyhow::bail!("Mojang API returned status: {}", response.status());
        }

        let profile: ProfileResponse = response.json().await?;
        Ok(profile.name)
    }
}
