use serde::{Deserialize, Serialize};

use super::discord::{self, DiscordStats, UserMessageStats};
use super::hypixel::MemberXpStats;
use crate::wordle::Leaderboards;

/// The complete wrapped summary for one year, as persisted and served
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedSummary {
    pub year: i32,
    pub guild_name: String,

    // Aggregate stats
    pub total_members: usize,
    pub total_guild_xp: i64,
    pub total_messages: usize,
    pub new_members_count: usize,
    pub most_active_day: String,

    // Top lists
    pub top_xp_earners: Vec<MemberXpStats>,
    pub top_messengers: Vec<UserMessageStats>,
    pub new_members: Vec<MemberXpStats>,
    pub most_pinged: Vec<UserMessageStats>,

    // Wordle
    pub wordle: Leaderboards,
    pub total_wordle_games: u32,

    pub fun_facts: Vec<String>,
}

pub struct CombineInput {
    pub year: i32,
    pub guild_name: String,
    /// Total guild XP straight from the API; member contributions are
    /// summed as a fallback when the guild omits it.
    pub guild_exp: i64,
    pub xp_stats: Vec<MemberXpStats>,
    pub new_members: Vec<MemberXpStats>,
    pub discord_stats: DiscordStats,
    pub wordle: Leaderboards,
    pub total_wordle_games: u32,
}

/// Combine per-source statistics into the wrapped summary
pub fn combine(input: CombineInput, top_list_size: usize) -> WrappedSummary {
    let total_guild_xp = if input.guild_exp > 0 {
        input.guild_exp
    } else {
        input.xp_stats.iter().map(|m| m.total_xp).sum()
    };

    let mut top_xp_earners = input.xp_stats.clone();
    top_xp_earners.sort_by(|a, b| b.total_xp.cmp(&a.total_xp).then_with(|| a.uuid.cmp(&b.uuid)));
    top_xp_earners.truncate(top_list_size);

    let top_messengers = discord::top_messengers(&input.discord_stats, top_list_size);
    let most_pinged = discord::top_pinged(&input.discord_stats, top_list_size);

    let mut summary = WrappedSummary {
        year: input.year,
        guild_name: input.guild_name,
        total_members: input.xp_stats.len(),
        total_guild_xp,
        total_messages: input.discord_stats.total_messages,
        new_members_count: input.new_members.len(),
        most_active_day: input.discord_stats.most_active_day,
        top_xp_earners,
        top_messengers,
        new_members: input.new_members,
        most_pinged,
        wordle: input.wordle,
        total_wordle_games: input.total_wordle_games,
        fun_facts: Vec::new(),
    };

    summary.fun_facts = generate_fun_facts(&summary);
    summary
}

/// Human-readable highlights for the landing page
pub fn generate_fun_facts(summary: &WrappedSummary) -> Vec<String> {
    let mut facts = Vec::new();

    if summary.total_members > 0 {
        facts.push(format!("{} members strong!", summary.total_members));
    }

    if summary.total_guild_xp > 0 {
        facts.push(format!("{} total guild XP earned", summary.total_guild_xp));
        if summary.total_members > 0 {
            let avg = summary.total_guild_xp / summary.total_members as i64;
            facts.push(format!("{} average XP per member", avg));
        }
    }

    if summary.total_messages > 0 {
        facts.push(format!("{} messages sent in Discord", summary.total_messages));
    }

    if summary.new_members_count > 0 {
        facts.push(format!(
            "{} new members joined this year",
            summary.new_members_count
        ));
    }

    if !summary.most_active_day.is_empty() {
        facts.push(format!("Most active day: {}", summary.most_active_day));
    }

    if let Some(top) = summary.top_xp_earners.first()
        && top.total_xp > 0
    {
        facts.push(format!("{} earned the most XP: {}", top.username, top.total_xp));
    }

    if let Some(top) = summary.top_messengers.first()
        && top.message_count > 0
    {
        facts.push(format!(
            "{} sent the most messages: {}",
            top.username, top.message_count
        ));
    }

    if summary.total_wordle_games > 0 {
        facts.push(format!(
            "{} Wordle games recorded",
            summary.total_wordle_games
        ));
    }

    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(uuid: &str, xp: i64) -> MemberXpStats {
        MemberXpStats {
            uuid: uuid.to_string(),
            username: uuid.to_string(),
            total_xp: xp,
            quest_participation: 0,
            joined_timestamp: 0,
            joined_this_year: false,
        }
    }

    fn input(guild_exp: i64, xp_stats: Vec<MemberXpStats>) -> CombineInput {
        CombineInput {
            year: 2025,
            guild_name: "Chizza".to_string(),
            guild_exp,
            xp_stats,
            new_members: Vec::new(),
            discord_stats: DiscordStats::default(),
            wordle: Leaderboards::default(),
            total_wordle_games: 0,
        }
    }

    #[test]
    fn guild_exp_falls_back_to_member_sum() {
        let summary = combine(input(0, vec![member("a", 40), member("b", 60)]), 10);
        assert_eq!(summary.total_guild_xp, 100);

        let summary = combine(input(500, vec![member("a", 40)]), 10);
        assert_eq!(summary.total_guild_xp, 500);
    }

    #[test]
    fn top_xp_list_is_sorted_and_capped() {
        let members: Vec<MemberXpStats> =
            (0..5).map(|i| member(&format!("m{i}"), i * 10)).collect();
        let summary = combine(input(0, members), 3);

        assert_eq!(summary.top_xp_earners.len(), 3);
        assert_eq!(summary.top_xp_earners[0].total_xp, 40);
        assert_eq!(summary.total_members, 5);
    }

    #[test]
    fn empty_run_produces_no_fun_facts() {
        let summary = combine(input(0, Vec::new()), 10);
        assert!(summary.fun_facts.is_empty());
    }

    #[test]
    fn fun_facts_name_the_top_earner() {
        let summary = combine(input(0, vec![member("steve", 90)]), 10);
        assert!(summary
            .fun_facts
            .iter()
            .any(|f| f.contains("steve earned the most XP: 90")));
    }
}
