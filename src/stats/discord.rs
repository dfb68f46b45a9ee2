use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::ChannelMessage;

/// Message activity totals for one Discord user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessageStats {
    pub user_id: u64,
    pub username: String,
    pub message_count: u32,
    pub times_pinged: u32,
}

/// Aggregated Discord activity for the whole wrapped year
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordStats {
    pub total_messages: usize,
    pub user_stats: Vec<UserMessageStats>,
    pub most_active_day: String,
}

/// Fold messages into per-user counts and the most active day.
///
/// Users who were only pinged and never wrote still get an entry, with
/// "Unknown" as the name since no authored message carries it.
pub fn calculate_stats(messages: &[ChannelMessage]) -> DiscordStats {
    let mut message_counts: HashMap<u64, u32> = HashMap::new();
    let mut mention_counts: HashMap<u64, u32> = HashMap::new();
    let mut user_names: HashMap<u64, &str> = HashMap::new();
    let mut day_counts: BTreeMap<String, usize> = BTreeMap::new();

    for msg in messages {
        *message_counts.entry(msg.author_id).or_default() += 1;
        user_names.insert(msg.author_id, &msg.author_name);

        for mentioned in &msg.mentions {
            *mention_counts.entry(*mentioned).or_default() += 1;
        }

        let day = msg.timestamp.date_naive().to_string();
        *day_counts.entry(day).or_default() += 1;
    }

    let mut user_ids: Vec<u64> = message_counts
        .keys()
        .chain(mention_counts.keys())
        .copied()
        .collect();
    user_ids.sort_unstable();
    user_ids.dedup();

    let user_stats = user_ids
        .into_iter()
        .map(|user_id| UserMessageStats {
            user_id,
            username: user_names.get(&user_id).unwrap_or(&"Unknown").to_string(),
            message_count: message_counts.get(&user_id).copied().unwrap_or(0),
            times_pinged: mention_counts.get(&user_id).copied().unwrap_or(0),
        })
        .collect();

    DiscordStats {
        total_messages: messages.len(),
        user_stats,
        most_active_day: most_active_day(&day_counts),
    }
}

/// Top users by message count
pub fn top_messengers(stats: &DiscordStats, limit: usize) -> Vec<UserMessageStats> {
    let mut sorted = stats.user_stats.clone();
    sorted.sort_by(|a, b| b.message_count.cmp(&a.message_count));
    sorted.truncate(limit);
    sorted
}

/// Top users by times mentioned; never-pinged users are dropped
pub fn top_pinged(stats: &DiscordStats, limit: usize) -> Vec<UserMessageStats> {
    let mut pinged: Vec<UserMessageStats> = stats
        .user_stats
        .iter()
        .filter(|s| s.times_pinged > 0)
        .cloned()
        .collect();
    pinged.sort_by(|a, b| b.times_pinged.cmp(&a.times_pinged));
    pinged.truncate(limit);
    pinged
}

fn most_active_day(day_counts: &BTreeMap<String, usize>) -> String {
    let mut best_day = "";
    let mut best_count = 0;

    // BTreeMap iteration keeps ties resolved to the earliest date
    for (day, count) in day_counts {
        if *count > best_count {
            best_day = day;
            best_count = *count;
        }
    }

    best_day.to_string()
}
