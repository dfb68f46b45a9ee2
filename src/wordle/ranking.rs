use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::aggregator::ParticipantTotals;
use super::parser::ParticipantId;

/// One participant's row in a ranked view, with display-ready derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub participant: ParticipantId,
    pub games_played: u32,
    pub wins: u32,
    pub failures: u32,
    pub total_tries: u32,
    /// Average tries per game, failures counting the fixed penalty, 2 dp
    pub average_tries: f64,
    /// Percentage of games won, 1 dp
    pub win_rate: f64,
    /// Percentage of games failed, 1 dp
    pub failure_rate: f64,
}

impl RankedEntry {
    fn from_totals(participant: &ParticipantId, totals: &ParticipantTotals) -> Self {
        Self {
            participant: participant.clone(),
            games_played: totals.games_played,
            wins: totals.wins,
            failures: totals.failures,
            total_tries: totals.total_tries,
            average_tries: round2(ratio(totals.total_tries, totals.games_played)),
            win_rate: round1(percentage(totals.wins, totals.games_played)),
            failure_rate: round1(percentage(totals.failures, totals.games_played)),
        }
    }

    pub fn display_name(&self) -> String {
        self.participant.display()
    }
}

/// The four ranked views over one run's totals.
///
/// Each view is an independent snapshot; regenerating after more messages
/// never mutates a previously returned one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboards {
    pub most_wins: Vec<RankedEntry>,
    pub most_failures: Vec<RankedEntry>,
    pub best_average: Vec<RankedEntry>,
    pub best_win_rate: Vec<RankedEntry>,
}

pub fn build_leaderboards(
    totals: &HashMap<ParticipantId, ParticipantTotals>,
    min_ranked_games: u32,
) -> Leaderboards {
    let entries: Vec<RankedEntry> = totals
        .iter()
        .map(|(participant, totals)| RankedEntry::from_totals(participant, totals))
        .collect();

    let everyone: Vec<&RankedEntry> = entries.iter().collect();
    let ranked: Vec<&RankedEntry> = entries
        .iter()
        .filter(|e| e.games_played >= min_ranked_games)
        .collect();

    Leaderboards {
        most_wins: sorted_by(&everyone, |e| -i64::from(e.wins)),
        most_failures: sorted_by(&everyone, |e| -i64::from(e.failures)),
        best_average: sorted_by_f64(&ranked, |e| e.average_tries),
        best_win_rate: sorted_by_f64(&ranked, |e| -e.win_rate),
    }
}

/// Sort by an integer key ascending, ties broken by display name so the
/// output is deterministic across runs.
fn sorted_by(entries: &[&RankedEntry], key: impl Fn(&RankedEntry) -> i64) -> Vec<RankedEntry> {
    let mut sorted: Vec<RankedEntry> = entries.iter().map(|e| (*e).clone()).collect();
    sorted.sort_by(|a, b| key(a).cmp(&key(b)).then_with(|| a.display_name().cmp(&b.display_name())));
    sorted
}

fn sorted_by_f64(entries: &[&RankedEntry], key: impl Fn(&RankedEntry) -> f64) -> Vec<RankedEntry> {
    let mut sorted: Vec<RankedEntry> = entries.iter().map(|e| (*e).clone()).collect();
    sorted.sort_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then_with(|| a.display_name().cmp(&b.display_name()))
    });
    sorted
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) / f64::from(denominator)
}

fn percentage(numerator: u32, denominator: u32) -> f64 {
    ratio(numerator, denominator) * 100.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::parser::ParticipantId::{Id, Name};

    fn totals(games: u32, wins: u32, failures: u32, tries: u32) -> ParticipantTotals {
        ParticipantTotals {
            games_played: games,
            wins,
            failures,
            total_tries: tries,
        }
    }

    fn boards(entries: Vec<(ParticipantId, ParticipantTotals)>) -> Leaderboards {
        build_leaderboards(&entries.into_iter().collect(), 10)
    }

    #[test]
    fn casual_players_are_excluded_from_rate_views_only() {
        let boards = boards(vec![
            (Id(1), totals(12, 6, 1, 40)),
            (Id(2), totals(3, 3, 0, 6)),
        ]);

        assert_eq!(boards.most_wins.len(), 2);
        assert_eq!(boards.most_failures.len(), 2);
        assert_eq!(boards.best_average.len(), 1);
        assert_eq!(boards.best_win_rate.len(), 1);
        assert_eq!(boards.best_average[0].participant, Id(1));
    }

    #[test]
    fn derived_fields_are_rounded_for_display() {
        let boards = boards(vec![(Id(1), totals(3, 1, 1, 10))]);

        let entry = &boards.most_wins[0];
        assert_eq!(entry.average_tries, 3.33);
        assert_eq!(entry.win_rate, 33.3);
        assert_eq!(entry.failure_rate, 33.3);
    }

    #[test]
    fn zero_games_has_zero_derived_fields() {
        let entry = RankedEntry::from_totals(&Id(1), &ParticipantTotals::default());
        assert_eq!(entry.average_tries, 0.0);
        assert_eq!(entry.win_rate, 0.0);
        assert_eq!(entry.failure_rate, 0.0);
    }

    #[test]
    fn views_sort_by_their_own_key() {
        let boards = boards(vec![
            (Id(1), totals(20, 2, 9, 100)),
            (Id(2), totals(20, 8, 1, 60)),
        ]);

        assert_eq!(boards.most_wins[0].participant, Id(2));
        assert_eq!(boards.most_failures[0].participant, Id(1));
        assert_eq!(boards.best_average[0].participant, Id(2));
        assert_eq!(boards.best_win_rate[0].participant, Id(2));
    }

    #[test]
    fn ties_break_on_display_name() {
        let boards = boards(vec![
            (Name("zed".to_string()), totals(5, 2, 0, 10)),
            (Name("amy".to_string()), totals(5, 2, 0, 10)),
        ]);

        assert_eq!(boards.most_wins[0].participant, Name("amy".to_string()));
    }

    #[test]
    fn empty_totals_produce_empty_views() {
        let boards = build_leaderboards(&HashMap::new(), 10);
        assert!(boards.most_wins.is_empty());
        assert!(boards.best_win_rate.is_empty());
    }
}
