use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use log::info;
use std::collections::HashMap;

use crate::api::{DiscordClient, HypixelClient, MojangClient};
use crate::cache::Cache;
use crate::config::settings::{self, AppConfig};
use crate::domain::{ChannelMessage, Guild};

const CACHE_DIR: &str = "cache";

pub struct IngestionService {
    config: AppConfig,
    cache: Cache,
    hypixel: HypixelClient,
    mojang: MojangClient,
}

impl IngestionService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::for_year(CACHE_DIR, config.year)?,
            hypixel: HypixelClient::new(&config.hypixel)?,
            mojang: MojangClient::new(&config.hypixel)?,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Starting Data Ingestion for {} ===\n", self.config.year);

        // Step 1: Hypixel guild data
        let guild = self.fetch_guild().await?;
        info!("  → Fetched guild \"{}\" with {} members\n", guild.name, guild.members.len());

        // Step 2: Usernames for guild members
        let usernames = self.fetch_usernames(&guild).await?;
        info!("  → Resolved {} usernames\n", usernames.len());

        // Step 3: Discord message history
        let messages = self.fetch_messages().await?;
        info!("  → Fetched {} Discord messages\n", messages.len());

        info!("=== Ingestion Complete ===");
        Ok(())
    }

    async fn fetch_guild(&mut self) -> Result<Guild> {
        info!("Step 1: Fetching Hypixel guild data...");

        let api_key = settings::hypixel_api_key()?;
        let guild_id = settings::hypixel_guild_id()?;

        let (raw, response) = self.hypixel.fetch_guild(&api_key, &guild_id).await?;
        self.cache.save_raw("hypixel_guild", &raw)?;

        let guild = response
            .guild
            .context("Hypixel response contained no guild")?;
        self.cache.save_parsed("guild", &guild)?;

        Ok(guild)
    }

    /// Resolve usernames for every member, reusing names cached by earlier
    /// runs so a re-ingest does not hammer the Mojang API.
    async fn fetch_usernames(&mut self, guild: &Guild) -> Result<HashMap<String, String>> {
        info!("Step 2: Resolving member usernames via Mojang...");

        let mut usernames: HashMap<String, String> = self
            .cache
            .load_parsed("usernames")?
            .unwrap_or_default();

        for member in &guild.members {
            if usernames.contains_key(&member.uuid) {
                continue;
            }
            let name = self.mojang.fetch_username(&member.uuid).await;
            usernames.insert(member.uuid.clone(), name);
        }

        self.cache.save_parsed("usernames", &usernames)?;
        Ok(usernames)
    }

    async fn fetch_messages(&mut self) -> Result<Vec<ChannelMessage>> {
        info!("Step 3: Fetching Discord message history...");

        let token = settings::discord_bot_token()?;
        let channel_ids = settings::discord_channel_ids()?;
        let mut discord = DiscordClient::new(&self.config.discord, &token)?;

        let (start, end) = self.year_bounds()?;
        let mut all_messages = Vec::new();

        for channel_id in channel_ids {
            let history = discord
                .fetch_channel_history(channel_id, start, end)
                .await?;
            self.cache.save_raw(
                &format!("discord_channel_{}", channel_id),
                &serde_json::Value::Array(history.raw_pages),
            )?;
            all_messages.extend(history.messages);
        }

        self.cache.save_parsed("discord_messages", &all_messages)?;
        Ok(all_messages)
    }

    fn year_bounds(&self) -> Result<(chrono::DateTime<Utc>, chrono::DateTime<Utc>)> {
        let year = self.config.year;
        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .with_context(|| format!("Invalid year: {year}"))?;
        let end = Utc
            .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
            .single()
            .with_context(|| format!("Invalid year: {year}"))?;
        Ok((start, end))
    }
}
