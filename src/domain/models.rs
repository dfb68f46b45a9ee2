use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One Discord message, trimmed down to the fields the stats need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub content: String,
    pub mentions: Vec<u64>,
    pub timestamp: DateTime<Utc>,
}

// --- API Response Structures ---

/// Raw message from the Discord REST API (snowflake ids arrive as strings)
#[derive(Debug, Deserialize, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: String,
    pub author: AuthorResponse,
    #[serde(default)]
    pub mentions: Vec<MentionResponse>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MentionResponse {
    pub id: String,
}

impl MessageResponse {
    /// Parse the raw message into the domain model.
    ///
    /// Messages with malformed ids or timestamps are dropped rather than
    /// failing the whole page.
    pub fn into_channel_message(self, channel_id: u64) -> Option<ChannelMessage> {
        let id = self.id.parse().ok()?;
        let author_id = self.author.id.parse().ok()?;
        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()?
            .with_timezone(&Utc);

        let mentions = self
            .mentions
            .iter()
            .filter_map(|m| m.id.parse().ok())
            .collect();

        Some(ChannelMessage {
            id,
            channel_id,
            author_id,
            author_name: self.author.username,
            content: self.content,
            mentions,
            timestamp,
        })
    }
}

/// Raw guild response from the Hypixel API
#[derive(Debug, Deserialize, Serialize)]
pub struct GuildResponse {
    pub success: bool,
    pub guild: Option<Guild>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Guild {
    pub name: String,
    #[serde(default)]
    pub exp: i64,
    pub members: Vec<GuildMember>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuildMember {
    pub uuid: String,
    #[serde(default)]
    pub rank: String,
    /// Join time as a unix timestamp in milliseconds
    pub joined: i64,
    #[serde(rename = "expHistory", default)]
    pub exp_history: HashMap<String, i64>,
    #[serde(rename = "questParticipation", default)]
    pub quest_participation: i32,
}
