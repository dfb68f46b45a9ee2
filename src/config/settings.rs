use chrono::{Datelike, Utc};

#[derive(Debug, Clone)]
pub struct WordleSettings {
    pub min_ranked_games: i32,
    pub top_list_size: usize,
}

impl Default for WordleSettings {
    fn default() -> Self {
        Self {
            min_ranked_games: 10,
            top_list_size: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: &'static str,
    pub page_size: usize,
    /// Safety cap on pages per channel; `None` walks the full history
    pub max_pages: Option<usize>,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 500, // 2 req/sec, well under Discord's global limit
            user_agent: "GuildWrapped/1.0",
            timeout_secs: 30,
            api_base_url: "https://discord.com/api/v10",
            page_size: 100,
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HypixelSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: &'static str,
    pub mojang_session_url: &'static str,
}

impl Default for HypixelSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 600, // Mojang enforces ~100 req/min on profile lookups
            user_agent: "GuildWrapped/1.0",
            timeout_secs: 30,
            api_base_url: "https://api.hypixel.net",
            mojang_session_url: "https://sessionserver.mojang.com",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub wordle: WordleSettings,
    pub discord: DiscordSettings,
    pub hypixel: HypixelSettings,
    pub year: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            wordle: WordleSettings::default(),
            discord: DiscordSettings::default(),
            hypixel: HypixelSettings::default(),
            year: wrapped_year(),
        }
    }
}

fn wrapped_year() -> i32 {
    std::env::var("WRAPPED_YEAR")
        .ok()
        .and_then(|y| y.parse().ok())
        .unwrap_or_else(|| Utc::now().year())
}

// Secrets stay in the environment rather than in the config struct, so the
// config can be constructed (and tested) without any credentials present.

pub fn discord_bot_token() -> anyhow::Result<String> {
    require_env("DISCORD_BOT_TOKEN")
}

pub fn discord_channel_ids() -> anyhow::Result<Vec<u64>> {
    let raw = require_env("DISCORD_CHANNEL_IDS")?;
    raw.split(',')
        .map(|s| {
            s.trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid channel id in DISCORD_CHANNEL_IDS: {s}"))
        })
        .collect()
}

pub fn hypixel_api_key() -> anyhow::Result<String> {
    require_env("HYPIXEL_API_KEY")
}

pub fn hypixel_guild_id() -> anyhow::Result<String> {
    require_env("HYPIXEL_GUILD_ID")
}

pub fn admin_password() -> anyhow::Result<String> {
    require_env("ADMIN_PASSWORD")
}

pub fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "guild_wrapped.db".to_string())
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("Missing required environment variable: {name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_wordle_settings_require_ten_games() {
        let settings = WordleSettings::default();
        assert_eq!(settings.min_ranked_games, 10);
    }

    #[test]
    fn discord_pages_are_fetched_one_hundred_at_a_time() {
        let settings = DiscordSettings::default();
        assert_eq!(settings.page_size, 100);
    }
}
