use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Phrases that mark a Wordle bot daily-results message
const STREAK_PHRASE: &str = "day streak";
const RESULTS_PHRASE: &str = "Here are yesterday's results";

/// Tries counted for a failed game
pub const FAILURE_PENALTY: u32 = 7;

/// A participant reference found in a score line.
///
/// Discord id mentions and plain @-name mentions are two disjoint
/// identifier spaces. The Wordle bot mixes them freely and nothing ties a
/// name back to an id, so the same human tagged both ways is tracked as two
/// participants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ParticipantId {
    Id(u64),
    Name(String),
}

impl ParticipantId {
    /// Display form, keeping the two spaces visually distinct
    pub fn display(&self) -> String {
        match self {
            ParticipantId::Id(id) => format!("<@{}>", id),
            ParticipantId::Name(name) => format!("@{}", name),
        }
    }
}

/// A single game's outcome: tries used to solve, or a failed puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Solved(u8),
    Failed,
}

impl Score {
    pub fn tries(&self) -> u32 {
        match self {
            Score::Solved(n) => u32::from(*n),
            Score::Failed => FAILURE_PENALTY,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Score::Failed)
    }

    /// Finite tries for winner selection; a failure never wins the day
    pub fn finite_tries(&self) -> Option<u32> {
        match self {
            Score::Solved(n) => Some(u32::from(*n)),
            Score::Failed => None,
        }
    }
}

/// One parsed score line: the score and everyone tagged on the line
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLine {
    pub score: Score,
    pub participants: Vec<ParticipantId>,
}

/// Parser for the Wordle bot's daily-results message format
pub struct ResultsParser {
    score_marker: Regex,
    id_mention: Regex,
    name_mention: Regex,
}

impl ResultsParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            score_marker: Self::compile_score_marker()?,
            id_mention: Regex::new(r"<@!?(\d+)>")?,
            name_mention: Regex::new(r"@([A-Za-z0-9_.]+)")?,
        })
    }

    /// Only messages announcing a streak and yesterday's results are
    /// daily-results messages; everything else in the channel is chatter.
    pub fn is_results_message(&self, content: &str) -> bool {
        content.contains(STREAK_PHRASE) && content.contains(RESULTS_PHRASE)
    }

    /// Extract every score line from an eligible message body.
    ///
    /// Lines that do not carry the score marker, and lines whose marker has
    /// no participant references, are skipped silently.
    pub fn parse_message(&self, content: &str) -> Vec<ScoreLine> {
        content
            .lines()
            .filter_map(|line| self.parse_line(line))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<ScoreLine> {
        let captures = self.score_marker.captures(line)?;
        let score = parse_score(&captures[1])?;
        let participants = self.collect_participants(line);

        if participants.is_empty() {
            return None;
        }

        Some(ScoreLine {
            score,
            participants,
        })
    }

    fn collect_participants(&self, line: &str) -> Vec<ParticipantId> {
        let mut participants = Vec::new();

        for captures in self.id_mention.captures_iter(line) {
            if let Ok(id) = captures[1].parse() {
                participants.push(ParticipantId::Id(id));
            }
        }

        // Strip id mentions first so `<@123>` is not also picked up as a
        // plain name mention.
        let without_ids = self.id_mention.replace_all(line, " ");
        for captures in self.name_mention.captures_iter(&without_ids) {
            participants.push(ParticipantId::Name(captures[1].to_string()));
        }

        participants
    }

    fn compile_score_marker() -> Result<Regex> {
        // Optional crown for yesterday's winner(s), then `N/6:` or `X/6:`
        Ok(Regex::new(r"^\s*(?:👑\s*)?([1-6X])/6:")?)
    }
}

fn parse_score(marker: &str) -> Option<Score> {
    match marker {
        "X" => Some(Score::Failed),
        digit => digit.parse().ok().map(Score::Solved),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_HEADER: &str =
        "Your group is on a 12 day streak! 🔥 Here are yesterday's results:";

    fn parser() -> ResultsParser {
        ResultsParser::new().unwrap()
    }

    #[test]
    fn recognizes_results_messages_only() {
        let parser = parser();
        assert!(parser.is_results_message(RESULTS_HEADER));
        assert!(!parser.is_results_message("Here are yesterday's results:"));
        assert!(!parser.is_results_message("3/6: <@111>"));
    }

    #[test]
    fn parses_crowned_line_with_two_id_mentions() {
        let lines = parser().parse_message("👑3/6: <@111> <@222>");

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].score, Score::Solved(3));
        assert_eq!(
            lines[0].participants,
            vec![ParticipantId::Id(111), ParticipantId::Id(222)]
        );
    }

    #[test]
    fn parses_failure_and_name_mentions() {
        let lines = parser().parse_message("X/6: @velvet @iron_fish");

        assert_eq!(lines[0].score, Score::Failed);
        assert_eq!(
            lines[0].participants,
            vec![
                ParticipantId::Name("velvet".to_string()),
                ParticipantId::Name("iron_fish".to_string())
            ]
        );
    }

    #[test]
    fn nickname_mention_form_is_an_id_mention() {
        let lines = parser().parse_message("2/6: <@!333>");
        assert_eq!(lines[0].participants, vec![ParticipantId::Id(333)]);
    }

    #[test]
    fn id_and_name_spaces_stay_disjoint_on_one_line() {
        let lines = parser().parse_message("4/6: <@111> @velvet");

        assert_eq!(
            lines[0].participants,
            vec![
                ParticipantId::Id(111),
                ParticipantId::Name("velvet".to_string())
            ]
        );
    }

    #[test]
    fn lines_without_the_marker_are_skipped() {
        let body = format!("{RESULTS_HEADER}\n7/6: <@111>\n0/6: <@111>\nstreak!");
        assert!(parser().parse_message(&body).is_empty());
    }

    #[test]
    fn marker_without_participants_is_skipped() {
        assert!(parser().parse_message("3/6: nobody tagged").is_empty());
    }

    #[test]
    fn failure_penalty_is_seven_tries() {
        assert_eq!(Score::Failed.tries(), 7);
        assert_eq!(Score::Failed.finite_tries(), None);
        assert_eq!(Score::Solved(4).finite_tries(), Some(4));
    }

    #[test]
    fn display_forms_distinguish_the_spaces() {
        assert_eq!(ParticipantId::Id(7).display(), "<@7>");
        assert_eq!(ParticipantId::Name("velvet".to_string()).display(), "@velvet");
    }
}
