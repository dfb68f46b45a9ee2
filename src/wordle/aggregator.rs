use anyhow::Result;
use std::collections::HashMap;

use super::parser::{ParticipantId, ResultsParser, Score};
use super::ranking::{self, Leaderboards};
use crate::config::settings::WordleSettings;

/// Running totals for one participant across the whole analysis run.
///
/// Counts only ever increase; a participant is created on the first score
/// seen for them and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantTotals {
    pub games_played: u32,
    pub wins: u32,
    pub failures: u32,
    pub total_tries: u32,
}

impl ParticipantTotals {
    fn record(&mut self, score: Score) {
        self.games_played += 1;
        self.total_tries += score.tries();
        if score.is_failure() {
            self.failures += 1;
        }
    }
}

/// Folds daily-results messages into per-participant totals.
///
/// One instance covers one analysis run; feed it every message in the
/// channel history (any order, since each results message carries a full
/// day), then call `finalize` for the ranked views.
pub struct ResultsAggregator {
    parser: ResultsParser,
    totals: HashMap<ParticipantId, ParticipantTotals>,
    min_ranked_games: u32,
}

impl ResultsAggregator {
    pub fn new(settings: &WordleSettings) -> Result<Self> {
        Ok(Self {
            parser: ResultsParser::new()?,
            totals: HashMap::new(),
            min_ranked_games: settings.min_ranked_games.max(0) as u32,
        })
    }

    /// Process one raw message body.
    ///
    /// Messages that are not daily-results messages, and malformed lines
    /// inside eligible ones, are ignored without error. Chat text is mined
    /// for patterns, never validated.
    pub fn process_message(&mut self, content: &str) {
        if !self.parser.is_results_message(content) {
            return;
        }

        let day_scores = self.record_score_lines(content);
        self.award_daily_wins(&day_scores);
    }

    /// Snapshot the four ranked views from the current totals
    pub fn finalize(&self) -> Leaderboards {
        ranking::build_leaderboards(&self.totals, self.min_ranked_games)
    }

    pub fn participant_count(&self) -> usize {
        self.totals.len()
    }

    /// Raw totals, for persisting a snapshot
    pub fn totals(&self) -> &HashMap<ParticipantId, ParticipantTotals> {
        &self.totals
    }

    pub fn total_games(&self) -> u32 {
        self.totals.values().map(|t| t.games_played).sum()
    }

    fn record_score_lines(&mut self, content: &str) -> HashMap<ParticipantId, Score> {
        let mut day_scores = HashMap::new();

        for line in self.parser.parse_message(content) {
            for participant in line.participants {
                self.totals
                    .entry(participant.clone())
                    .or_default()
                    .record(line.score);

                // Later lines overwrite earlier ones for the same id, which
                // cannot happen in a well-formed bot message anyway.
                day_scores.insert(participant, line.score);
            }
        }

        day_scores
    }

    /// Everyone tied at the day's lowest finite score gets one win.
    /// A day where every score is a failure has no winner.
    fn award_daily_wins(&mut self, day_scores: &HashMap<ParticipantId, Score>) {
        let Some(best) = day_scores.values().filter_map(Score::finite_tries).min() else {
            return;
        };

        for (participant, score) in day_scores {
            if score.finite_tries() == Some(best)
                && let Some(totals) = self.totals.get_mut(participant)
            {
                totals.wins += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordle::parser::ParticipantId::{Id, Name};

    const HEADER: &str = "Your group is on a 5 day streak! Here are yesterday's results:";

    fn aggregator() -> ResultsAggregator {
        ResultsAggregator::new(&WordleSettings::default()).unwrap()
    }

    fn totals(agg: &ResultsAggregator, id: &ParticipantId) -> ParticipantTotals {
        agg.totals.get(id).cloned().unwrap_or_default()
    }

    #[test]
    fn shared_line_counts_a_game_for_everyone_on_it() {
        let mut agg = aggregator();
        agg.process_message(&format!("{HEADER}\n👑3/6: <@111> <@222>"));

        for id in [Id(111), Id(222)] {
            let t = totals(&agg, &id);
            assert_eq!(t.games_played, 1);
            assert_eq!(t.total_tries, 3);
            assert_eq!(t.wins, 1, "tied participants are all winners");
        }
    }

    #[test]
    fn failure_takes_the_penalty_and_never_wins() {
        let mut agg = aggregator();
        agg.process_message(&format!("{HEADER}\n2/6: <@111>\nX/6: <@222>"));

        let winner = totals(&agg, &Id(111));
        assert_eq!(winner.games_played, 1);
        assert_eq!(winner.total_tries, 2);
        assert_eq!(winner.wins, 1);
        assert_eq!(winner.failures, 0);

        let loser = totals(&agg, &Id(222));
        assert_eq!(loser.games_played, 1);
        assert_eq!(loser.total_tries, 7);
        assert_eq!(loser.failures, 1);
        assert_eq!(loser.wins, 0);
    }

    #[test]
    fn all_failure_day_has_no_winner() {
        let mut agg = aggregator();
        agg.process_message(&format!("{HEADER}\nX/6: <@111>\nX/6: <@222>"));

        assert_eq!(totals(&agg, &Id(111)).wins, 0);
        assert_eq!(totals(&agg, &Id(222)).wins, 0);
    }

    #[test]
    fn message_without_results_phrase_is_ignored() {
        let mut agg = aggregator();
        agg.process_message("Your group is on a 5 day streak!\n3/6: <@111>");

        assert_eq!(agg.participant_count(), 0);
    }

    #[test]
    fn id_and_name_mentions_stay_separate_participants() {
        let mut agg = aggregator();
        agg.process_message(&format!("{HEADER}\n4/6: <@111> @velvet"));

        assert_eq!(agg.participant_count(), 2);
        assert_eq!(totals(&agg, &Id(111)).games_played, 1);
        assert_eq!(totals(&agg, &Name("velvet".to_string())).games_played, 1);
    }

    #[test]
    fn processing_twice_doubles_counts_exactly() {
        let body = format!("{HEADER}\n👑1/6: <@111>\n5/6: <@222>");

        let mut agg = aggregator();
        agg.process_message(&body);
        agg.process_message(&body);

        let t = totals(&agg, &Id(111));
        assert_eq!(t.games_played, 2);
        assert_eq!(t.total_tries, 2);
        assert_eq!(t.wins, 2);
        assert_eq!(totals(&agg, &Id(222)).wins, 0);
    }

    #[test]
    fn eligible_message_with_no_score_lines_is_a_no_op() {
        let mut agg = aggregator();
        agg.process_message(HEADER);

        assert_eq!(agg.participant_count(), 0);
        assert_eq!(agg.total_games(), 0);
    }

    #[test]
    fn winners_are_per_message_not_global() {
        let mut agg = aggregator();
        agg.process_message(&format!("{HEADER}\n4/6: <@111>"));
        agg.process_message(&format!("{HEADER}\n2/6: <@222>"));

        // Each message is one day; a lone solver wins their day.
        assert_eq!(totals(&agg, &Id(111)).wins, 1);
        assert_eq!(totals(&agg, &Id(222)).wins, 1);
    }
}
