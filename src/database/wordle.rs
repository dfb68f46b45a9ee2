use anyhow::{Context, Result};
use rusqlite::params;
use std::collections::HashMap;

use super::connection::DbConn;
use crate::wordle::parser::ParticipantId;
use crate::wordle::ParticipantTotals;

const KIND_ID: &str = "id";
const KIND_NAME: &str = "name";

/// Replace a snapshot's Wordle totals with the given run's totals.
///
/// The raw totals are stored rather than the ranked views, so ranking rules
/// can change without reprocessing the whole message history.
pub fn replace_totals(
    conn: &mut DbConn,
    snapshot_id: i64,
    totals: &HashMap<ParticipantId, ParticipantTotals>,
) -> Result<()> {
    conn.execute(
        "DELETE FROM wordle_totals WHERE snapshot_id = ?1",
        params![snapshot_id],
    )
    .context("Failed to clear wordle totals")?;

    let sql = "INSERT INTO wordle_totals
               (snapshot_id, participant_kind, participant_value, games_played, wins, failures, total_tries)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    for (participant, t) in totals {
        let (kind, value) = encode_participant(participant);
        conn.execute(
            sql,
            params![
                snapshot_id,
                kind,
                value,
                t.games_played,
                t.wins,
                t.failures,
                t.total_tries
            ],
        )
        .context("Failed to insert wordle totals")?;
    }

    Ok(())
}

pub fn load_totals(
    conn: &mut DbConn,
    snapshot_id: i64,
) -> Result<HashMap<ParticipantId, ParticipantTotals>> {
    let sql = "SELECT participant_kind, participant_value, games_played, wins, failures, total_tries
               FROM wordle_totals WHERE snapshot_id = ?1";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![snapshot_id], |row| {
            let kind: String = row.get(0)?;
            let value: String = row.get(1)?;
            let totals = ParticipantTotals {
                games_played: row.get(2)?,
                wins: row.get(3)?,
                failures: row.get(4)?,
                total_tries: row.get(5)?,
            };
            Ok((kind, value, totals))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut totals = HashMap::new();
    for (kind, value, t) in rows {
        if let Some(participant) = decode_participant(&kind, &value) {
            totals.insert(participant, t);
        } else {
            log::warn!("Skipping wordle row with unknown participant kind: {kind}");
        }
    }

    Ok(totals)
}

fn encode_participant(participant: &ParticipantId) -> (&'static str, String) {
    match participant {
        ParticipantId::Id(id) => (KIND_ID, id.to_string()),
        ParticipantId::Name(name) => (KIND_NAME, name.clone()),
    }
}

fn decode_participant(kind: &str, value: &str) -> Option<ParticipantId> {
    match kind {
        KIND_ID => value.parse().ok().map(ParticipantId::Id),
        KIND_NAME => Some(ParticipantId::Name(value.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_encoding_roundtrips_both_spaces() {
        for participant in [
            ParticipantId::Id(123),
            ParticipantId::Name("velvet".to_string()),
        ] {
            let (kind, value) = encode_participant(&participant);
            assert_eq!(decode_participant(kind, &value), Some(participant));
        }
    }

    #[test]
    fn unknown_kind_decodes_to_none() {
        assert_eq!(decode_participant("uuid", "abc"), None);
    }
}
