use colored::Colorize;
use std::fmt::Write;

use super::ranking::{Leaderboards, RankedEntry};

/// Render the four-section plain-text leaderboard report.
///
/// Field values and ordering are the contract; the headings and emoji are
/// just presentation.
pub fn render_report(boards: &Leaderboards) -> String {
    let mut out = String::new();

    render_section(&mut out, "🏆 Most Wins", &boards.most_wins, format_wins);
    render_section(&mut out, "💀 Most Failures", &boards.most_failures, format_failures);
    render_section(&mut out, "🎯 Best Average", &boards.best_average, format_average);
    render_section(&mut out, "📈 Best Win Rate", &boards.best_win_rate, format_win_rate);

    out
}

fn render_section(
    out: &mut String,
    title: &str,
    entries: &[RankedEntry],
    format_entry: fn(&RankedEntry) -> String,
) {
    let _ = writeln!(out, "{}", title.bold());

    if entries.is_empty() {
        let _ = writeln!(out, "  (no participants)");
    }

    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, " {:>2}. {}", index + 1, format_entry(entry));
    }

    let _ = writeln!(out);
}

fn format_wins(entry: &RankedEntry) -> String {
    format!(
        "{}: {} wins ({} games, {}% win rate)",
        entry.display_name(),
        entry.wins,
        entry.games_played,
        entry.win_rate
    )
}

fn format_failures(entry: &RankedEntry) -> String {
    format!(
        "{}: {} failures ({} games, {}% failure rate)",
        entry.display_name(),
        entry.failures,
        entry.games_played,
        entry.failure_rate
    )
}

fn format_average(entry: &RankedEntry) -> String {
    format!(
        "{}: {:.2} avg tries ({} games)",
        entry.display_name(),
        entry.average_tries,
        entry.games_played
    )
}

fn format_win_rate(entry: &RankedEntry) -> String {
    format!(
        "{}: {}% win rate ({} wins in {} games)",
        entry.display_name(),
        entry.win_rate,
        entry.wins,
        entry.games_played
    )
}
