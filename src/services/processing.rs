use anyhow::{Context, Result};
use log::info;
use std::collections::HashMap;

use crate::cache::Cache;
use crate::config::settings::{self, AppConfig};
use crate::database;
use crate::domain::{ChannelMessage, Guild};
use crate::stats::{discord, hypixel, wrapped};
use crate::wordle::{ParticipantId, ParticipantTotals, ResultsAggregator};

type WordleTotals = HashMap<ParticipantId, ParticipantTotals>;

const CACHE_DIR: &str = "cache";

pub struct ProcessingService {
    config: AppConfig,
    cache: Cache,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::for_year(CACHE_DIR, config.year)?,
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        let db_path = settings::database_path();
        let temp_db_path = format!("{}.tmp", db_path);

        info!("=== Starting Data Processing (Atomic) ===\n");
        info!("Target DB: {}, Temp DB: {}", db_path, temp_db_path);

        // Clean up previous temp file if exists
        if std::path::Path::new(&temp_db_path).exists() {
            std::fs::remove_file(&temp_db_path)?;
        }

        self.process_to_db(&temp_db_path)?;

        // Atomic swap
        std::fs::rename(&temp_db_path, &db_path)?;
        info!("Successfully swapped database to {}", db_path);

        info!("=== Processing Complete ===");
        Ok(())
    }

    fn process_to_db(&self, db_path: &str) -> Result<()> {
        let pool = database::create_pool(db_path)?;
        let mut conn = database::get_connection(&pool)?;

        database::setup::reset_database(&mut conn)?;
        info!("  → Database schema reset\n");

        let guild = self.load_guild_from_cache()?;
        let messages = self.load_messages_from_cache()?;
        let usernames = self.load_usernames_from_cache()?;
        info!(
            "  → Loaded {} members and {} messages from cache\n",
            guild.members.len(),
            messages.len()
        );

        let (summary, wordle_totals) = self.build_summary(&guild, &messages, &usernames)?;
        info!(
            "  → Computed stats: {} messages, {} wordle games, most active day {}\n",
            summary.total_messages,
            summary.total_wordle_games,
            if summary.most_active_day.is_empty() { "n/a" } else { &summary.most_active_day }
        );

        let snapshot_id = database::snapshots::save_summary(&mut conn, &summary)?;
        database::wordle::replace_totals(&mut conn, snapshot_id, &wordle_totals)?;
        info!("  → Saved wrapped snapshot for {}\n", self.config.year);

        Ok(())
    }

    fn load_guild_from_cache(&self) -> Result<Guild> {
        self.cache
            .load_parsed("guild")?
            .context("No guild data in cache - run ingest first")
    }

    fn load_messages_from_cache(&self) -> Result<Vec<ChannelMessage>> {
        // A guild with Discord ingestion disabled still gets a wrapped
        Ok(self.cache.load_parsed("discord_messages")?.unwrap_or_default())
    }

    fn load_usernames_from_cache(&self) -> Result<HashMap<String, String>> {
        Ok(self.cache.load_parsed("usernames")?.unwrap_or_default())
    }

    fn build_summary(
        &self,
        guild: &Guild,
        messages: &[ChannelMessage],
        usernames: &HashMap<String, String>,
    ) -> Result<(wrapped::WrappedSummary, WordleTotals)> {
        let year = self.config.year;

        let discord_stats = discord::calculate_stats(messages);

        let mut xp_stats = hypixel::calculate_yearly_xp(&guild.members, year);
        hypixel::apply_usernames(&mut xp_stats, usernames);

        let mut new_members = hypixel::members_joined_in_year(&guild.members, year);
        hypixel::apply_usernames(&mut new_members, usernames);

        let aggregator = self.run_wordle_aggregation(messages)?;

        let input = wrapped::CombineInput {
            year,
            guild_name: guild.name.clone(),
            guild_exp: guild.exp,
            xp_stats,
            new_members,
            discord_stats,
            wordle: aggregator.finalize(),
            total_wordle_games: aggregator.total_games(),
        };

        let summary = wrapped::combine(input, self.config.wordle.top_list_size);
        Ok((summary, aggregator.totals().clone()))
    }

    fn run_wordle_aggregation(&self, messages: &[ChannelMessage]) -> Result<ResultsAggregator> {
        let mut aggregator = ResultsAggregator::new(&self.config.wordle)?;
        for message in messages {
            aggregator.process_message(&message.content);
        }
        Ok(aggregator)
    }
}
