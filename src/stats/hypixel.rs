use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::GuildMember;

/// XP and membership stats for one guild member over the wrapped year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberXpStats {
    pub uuid: String,
    pub username: String,
    pub total_xp: i64,
    pub quest_participation: i32,
    pub joined_timestamp: i64,
    pub joined_this_year: bool,
}

/// Sum each member's expHistory entries that fall inside the wrapped year.
///
/// Sorted by quest participation, which tracks long-term engagement better
/// than the 7-day expHistory window Hypixel exposes.
pub fn calculate_yearly_xp(members: &[GuildMember], year: i32) -> Vec<MemberXpStats> {
    let mut stats: Vec<MemberXpStats> = members
        .iter()
        .map(|member| member_stats(member, year))
        .collect();

    stats.sort_by(|a, b| {
        b.quest_participation
            .cmp(&a.quest_participation)
            .then_with(|| a.uuid.cmp(&b.uuid))
    });
    stats
}

/// Members who joined during the wrapped year, most recent first
pub fn members_joined_in_year(members: &[GuildMember], year: i32) -> Vec<MemberXpStats> {
    let mut joined: Vec<MemberXpStats> = members
        .iter()
        .filter(|m| joined_in_year(m.joined, year))
        .map(|member| member_stats(member, year))
        .collect();

    joined.sort_by(|a, b| {
        b.joined_timestamp
            .cmp(&a.joined_timestamp)
            .then_with(|| a.uuid.cmp(&b.uuid))
    });
    joined
}

/// Fill in usernames from a uuid-to-name map, leaving "Unknown" for misses
pub fn apply_usernames(stats: &mut [MemberXpStats], usernames: &HashMap<String, String>) {
    for member in stats {
        if let Some(name) = usernames.get(&member.uuid) {
            member.username = name.clone();
        }
    }
}

fn member_stats(member: &GuildMember, year: i32) -> MemberXpStats {
    MemberXpStats {
        uuid: member.uuid.clone(),
        username: "Unknown".to_string(),
        total_xp: yearly_xp(&member.exp_history, year),
        quest_participation: member.quest_participation,
        joined_timestamp: member.joined,
        joined_this_year: joined_in_year(member.joined, year),
    }
}

fn yearly_xp(exp_history: &HashMap<String, i64>, year: i32) -> i64 {
    exp_history
        .iter()
        .filter(|(date, _)| date_is_in_year(date, year))
        .map(|(_, xp)| xp)
        .sum()
}

fn date_is_in_year(date: &str, year: i32) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok_and(|d| d.year() == year)
}

fn joined_in_year(joined_ms: i64, year: i32) -> bool {
    DateTime::from_timestamp_millis(joined_ms).is_some_and(|dt| dt.year() == year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(uuid: &str, joined_ms: i64, history: &[(&str, i64)], quests: i32) -> GuildMember {
        GuildMember {
            uuid: uuid.to_string(),
            rank: "Member".to_string(),
            joined: joined_ms,
            exp_history: history
                .iter()
                .map(|(d, xp)| (d.to_string(), *xp))
                .collect(),
            quest_participation: quests,
        }
    }

    // 2025-06-01T00:00:00Z and 2024-06-01T00:00:00Z in milliseconds
    const JOINED_2025: i64 = 1_748_736_000_000;
    const JOINED_2024: i64 = 1_717_200_000_000;

    #[test]
    fn xp_outside_the_year_is_ignored() {
        let members = vec![member(
            "a",
            JOINED_2024,
            &[("2025-01-03", 100), ("2024-12-31", 999), ("garbage", 5)],
            0,
        )];

        let stats = calculate_yearly_xp(&members, 2025);
        assert_eq!(stats[0].total_xp, 100);
        assert!(!stats[0].joined_this_year);
    }

    #[test]
    fn sorted_by_quest_participation() {
        let members = vec![
            member("a", JOINED_2024, &[], 3),
            member("b", JOINED_2024, &[], 9),
        ];

        let stats = calculate_yearly_xp(&members, 2025);
        assert_eq!(stats[0].uuid, "b");
    }

    #[test]
    fn new_members_are_most_recent_first() {
        let members = vec![
            member("old", JOINED_2024, &[], 0),
            member("early", JOINED_2025, &[], 0),
            member("late", JOINED_2025 + 1_000_000, &[], 0),
        ];

        let joined = members_joined_in_year(&members, 2025);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].uuid, "late");
        assert!(joined.iter().all(|m| m.joined_this_year));
    }

    #[test]
    fn usernames_fill_in_with_unknown_fallback() {
        let members = vec![member("a", JOINED_2024, &[], 0), member("b", JOINED_2024, &[], 0)];
        let mut stats = calculate_yearly_xp(&members, 2025);

        let names = HashMap::from([("a".to_string(), "Steve".to_string())]);
        apply_usernames(&mut stats, &names);

        let by_uuid = |uuid: &str| stats.iter().find(|s| s.uuid == uuid).unwrap();
        assert_eq!(by_uuid("a").username, "Steve");
        assert_eq!(by_uuid("b").username, "Unknown");
    }
}
