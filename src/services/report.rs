use anyhow::Result;
use log::info;

use crate::cache::Cache;
use crate::config::settings::AppConfig;
use crate::domain::ChannelMessage;
use crate::wordle::{render_report, ResultsAggregator};

const CACHE_DIR: &str = "cache";

/// Prints the Wordle leaderboard report from cached message history
pub struct ReportService {
    config: AppConfig,
    cache: Cache,
}

impl ReportService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::for_year(CACHE_DIR, config.year)?,
            config,
        })
    }

    pub fn run(&self) -> Result<()> {
        let messages: Vec<ChannelMessage> = self
            .cache
            .load_parsed("discord_messages")?
            .unwrap_or_default();

        let mut aggregator = ResultsAggregator::new(&self.config.wordle)?;
        for message in &messages {
            aggregator.process_message(&message.content);
        }

        info!(
            "Wordle {}: {} participants across {} recorded games",
            self.config.year,
            aggregator.participant_count(),
            aggregator.total_games()
        );

        print!("{}", render_report(&aggregator.finalize()));
        Ok(())
    }
}
