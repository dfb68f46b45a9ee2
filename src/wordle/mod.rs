pub mod aggregator;
pub mod parser;
pub mod ranking;
pub mod report;

pub use aggregator::{ParticipantTotals, ResultsAggregator};
pub use parser::{ParticipantId, ResultsParser, Score, ScoreLine};
pub use ranking::{Leaderboards, RankedEntry};
pub use report::render_report;
