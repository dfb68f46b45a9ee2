use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: i64,
    pub year: i32,
    pub guild_name: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Which top list a member_stats row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberCategory {
    TopXp,
    NewMember,
    TopMessenger,
    MostPinged,
}

impl MemberCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberCategory::TopXp => "top_xp",
            MemberCategory::NewMember => "new_member",
            MemberCategory::TopMessenger => "top_messenger",
            MemberCategory::MostPinged => "most_pinged",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GuildStatsRow {
    pub total_members: usize,
    pub total_xp: i64,
    pub total_messages: usize,
    pub new_members_count: usize,
    pub most_active_day: String,
    pub total_wordle_games: u32,
}
