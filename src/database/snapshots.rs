use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use super::connection::DbConn;
use super::models::{GuildStatsRow, MemberCategory, Snapshot};
use crate::stats::discord::UserMessageStats;
use crate::stats::hypixel::MemberXpStats;
use crate::stats::wrapped::{self, WrappedSummary};

/// Persist one year's wrapped summary (except the Wordle totals, which live
/// in their own table; see `database::wordle`). Returns the snapshot id.
pub fn save_summary(conn: &mut DbConn, summary: &WrappedSummary) -> Result<i64> {
    let snapshot = upsert_snapshot(conn, summary.year, &summary.guild_name)?;
    clear_snapshot_rows(conn, snapshot.id)?;
    insert_guild_stats(conn, snapshot.id, summary)?;

    insert_xp_list(conn, snapshot.id, MemberCategory::TopXp, &summary.top_xp_earners)?;
    insert_xp_list(conn, snapshot.id, MemberCategory::NewMember, &summary.new_members)?;
    insert_message_list(conn, snapshot.id, MemberCategory::TopMessenger, &summary.top_messengers)?;
    insert_message_list(conn, snapshot.id, MemberCategory::MostPinged, &summary.most_pinged)?;

    Ok(snapshot.id)
}

/// Rebuild the wrapped summary for a year; `None` when no snapshot exists.
///
/// Fun facts are regenerated from the loaded aggregates rather than stored.
pub fn load_summary(
    conn: &mut DbConn,
    year: i32,
    min_ranked_games: u32,
) -> Result<Option<WrappedSummary>> {
    let Some(snapshot) = find_snapshot(conn, year)? else {
        return Ok(None);
    };

    let guild_stats = load_guild_stats(conn, snapshot.id)?;
    let totals = super::wordle::load_totals(conn, snapshot.id)?;

    let mut summary = WrappedSummary {
        year: snapshot.year,
        guild_name: snapshot.guild_name,
        total_members: guild_stats.total_members,
        total_guild_xp: guild_stats.total_xp,
        total_messages: guild_stats.total_messages,
        new_members_count: guild_stats.new_members_count,
        most_active_day: guild_stats.most_active_day,
        top_xp_earners: load_xp_list(conn, snapshot.id, MemberCategory::TopXp)?,
        new_members: load_xp_list(conn, snapshot.id, MemberCategory::NewMember)?,
        top_messengers: load_message_list(conn, snapshot.id, MemberCategory::TopMessenger)?,
        most_pinged: load_message_list(conn, snapshot.id, MemberCategory::MostPinged)?,
        wordle: crate::wordle::ranking::build_leaderboards(&totals, min_ranked_games),
        total_wordle_games: guild_stats.total_wordle_games,
        fun_facts: Vec::new(),
    };

    summary.fun_facts = wrapped::generate_fun_facts(&summary);
    Ok(Some(summary))
}

pub fn upsert_snapshot(conn: &mut DbConn, year: i32, guild_name: &str) -> Result<Snapshot> {
    let sql = "INSERT INTO wrapped_snapshots (year, guild_name) VALUES (?1, ?2)
               ON CONFLICT(year) DO UPDATE SET guild_name = excluded.guild_name
               RETURNING id, year, guild_name, created_at";

    conn.query_row(sql, params![year, guild_name], parse_snapshot_row)
        .context("Failed to upsert wrapped snapshot")
}

pub fn find_snapshot(conn: &mut DbConn, year: i32) -> Result<Option<Snapshot>> {
    let sql = "SELECT id, year, guild_name, created_at FROM wrapped_snapshots WHERE year = ?1";

    conn.query_row(sql, params![year], parse_snapshot_row)
        .optional()
        .context("Failed to query wrapped snapshot")
}

fn clear_snapshot_rows(conn: &mut DbConn, snapshot_id: i64) -> Result<()> {
    for table in ["guild_stats", "member_stats", "wordle_totals"] {
        let sql = format!("DELETE FROM {} WHERE snapshot_id = ?1", table);
        conn.execute(&sql, params![snapshot_id])
            .with_context(|| format!("Failed to clear {} for snapshot", table))?;
    }
    Ok(())
}

fn insert_guild_stats(conn: &mut DbConn, snapshot_id: i64, summary: &WrappedSummary) -> Result<()> {
    let sql = "INSERT INTO guild_stats
               (snapshot_id, total_members, total_xp, total_messages, new_members_count, most_active_day, total_wordle_games)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    conn.execute(
        sql,
        params![
            snapshot_id,
            summary.total_members,
            summary.total_guild_xp,
            summary.total_messages,
            summary.new_members_count,
            summary.most_active_day,
            summary.total_wordle_games,
        ],
    )
    .context("Failed to insert guild stats")?;
    Ok(())
}

fn load_guild_stats(conn: &mut DbConn, snapshot_id: i64) -> Result<GuildStatsRow> {
    let sql = "SELECT total_members, total_xp, total_messages, new_members_count, most_active_day, total_wordle_games
               FROM guild_stats WHERE snapshot_id = ?1";

    conn.query_row(sql, params![snapshot_id], |row| {
        Ok(GuildStatsRow {
            total_members: row.get(0)?,
            total_xp: row.get(1)?,
            total_messages: row.get(2)?,
            new_members_count: row.get(3)?,
            most_active_day: row.get(4)?,
            total_wordle_games: row.get(5)?,
        })
    })
    .optional()
    .context("Failed to load guild stats")
    .map(|row| row.unwrap_or_else(empty_guild_stats))
}

fn empty_guild_stats() -> GuildStatsRow {
    GuildStatsRow {
        total_members: 0,
        total_xp: 0,
        total_messages: 0,
        new_members_count: 0,
        most_active_day: String::new(),
        total_wordle_games: 0,
    }
}

fn insert_xp_list(
    conn: &mut DbConn,
    snapshot_id: i64,
    category: MemberCategory,
    members: &[MemberXpStats],
) -> Result<()> {
    let sql = "INSERT INTO member_stats
               (snapshot_id, category, position, member_uuid, member_name, guild_xp, quest_participation, joined_this_year, joined_timestamp)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

    for (position, member) in members.iter().enumerate() {
        conn.execute(
            sql,
            params![
                snapshot_id,
                category.as_str(),
                position as i64,
                member.uuid,
                member.username,
                member.total_xp,
                member.quest_participation,
                member.joined_this_year,
                member.joined_timestamp,
            ],
        )
        .context("Failed to insert member XP stats")?;
    }
    Ok(())
}

fn load_xp_list(
    conn: &mut DbConn,
    snapshot_id: i64,
    category: MemberCategory,
) -> Result<Vec<MemberXpStats>> {
    let sql = "SELECT member_uuid, member_name, guild_xp, quest_participation, joined_this_year, joined_timestamp
               FROM member_stats WHERE snapshot_id = ?1 AND category = ?2 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![snapshot_id, category.as_str()], |row| {
            Ok(MemberXpStats {
                uuid: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                username: row.get(1)?,
                total_xp: row.get(2)?,
                quest_participation: row.get(3)?,
                joined_this_year: row.get(4)?,
                joined_timestamp: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn insert_message_list(
    conn: &mut DbConn,
    snapshot_id: i64,
    category: MemberCategory,
    users: &[UserMessageStats],
) -> Result<()> {
    let sql = "INSERT INTO member_stats
               (snapshot_id, category, position, member_name, user_id, discord_messages, times_pinged)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    for (position, user) in users.iter().enumerate() {
        conn.execute(
            sql,
            params![
                snapshot_id,
                category.as_str(),
                position as i64,
                user.username,
                user.user_id as i64,
                user.message_count,
                user.times_pinged,
            ],
        )
        .context("Failed to insert user message stats")?;
    }
    Ok(())
}

fn load_message_list(
    conn: &mut DbConn,
    snapshot_id: i64,
    category: MemberCategory,
) -> Result<Vec<UserMessageStats>> {
    let sql = "SELECT member_name, user_id, discord_messages, times_pinged
               FROM member_stats WHERE snapshot_id = ?1 AND category = ?2 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![snapshot_id, category.as_str()], |row| {
            Ok(UserMessageStats {
                username: row.get(0)?,
                user_id: row.get::<_, Option<i64>>(1)?.unwrap_or_default() as u64,
                message_count: row.get(2)?,
                times_pinged: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_snapshot_row(row: &rusqlite::Row) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        id: row.get(0)?,
        year: row.get(1)?,
        guild_name: row.get(2)?,
        created_at: row.get(3)?,
    })
}
