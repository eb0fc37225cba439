//! Terminal presentation: tables, bars, timestamps, the confirmation prompt.
//!
//! Everything here consumes plain data from the workflow commands and never
//! touches the store. Truncation is display-only; the underlying data is
//! passed through JSON exports unmodified.

use std::io::{self, BufRead, Write};

use serde::Serialize;

use crate::commands::feedback::StatsReport;
use crate::commands::scores::ActivityReport;
use crate::model::{ModerationItem, ScoreEntry, Suggestion};

/// One stdin line, `y`/`yes` (any case) confirms, anything else declines.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// `ms`-epoch timestamp as UTC wall-clock, `-` when out of range.
pub fn format_timestamp(ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Seconds as a compact `4m07s` / `43s`.
pub fn format_game_length(seconds: u32) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m{:02}s", seconds / 60, seconds % 60)
    }
}

/// Display truncation to at most `max` characters, marking the cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Bar of `width` characters scaled to `count / max`; non-zero counts always
/// get at least one mark.
pub fn bar(count: u64, max: u64, width: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let scaled = ((count as f64 / max as f64) * width as f64).round() as usize;
    "#".repeat(scaled.max(1))
}

pub fn score_table(entries: &[ScoreEntry]) {
    if entries.is_empty() {
        println!("leaderboard is empty");
        return;
    }
    println!(
        "{:>4}  {:<16} {:>8} {:>5}  {:<2}  {:<16} {:>7}",
        "rank", "name", "score", "wave", "cc", "when", "length"
    );
    for (idx, entry) in entries.iter().enumerate() {
        println!(
            "{:>4}  {:<16} {:>8} {:>5}  {:<2}  {:<16} {:>7}",
            idx + 1,
            truncate(&entry.name, 16),
            entry.score,
            entry.wave,
            entry.country_code,
            format_timestamp(entry.timestamp),
            format_game_length(entry.game_length),
        );
    }
}

pub fn suggestion_table(items: &[Suggestion]) {
    if items.is_empty() {
        println!("no suggestions");
        return;
    }
    println!(
        "{:<24} {:>5}  {:<2}  {:<16} {}",
        "id", "votes", "cc", "when", "text"
    );
    for item in items {
        println!(
            "{:<24} {:>5}  {:<2}  {:<16} {}",
            item.id,
            item.upvotes,
            item.country_code,
            format_timestamp(item.timestamp),
            truncate(&item.text, 48),
        );
    }
}

pub fn queue_table(items: &[ModerationItem]) {
    if items.is_empty() {
        println!("moderation queue is empty");
        return;
    }
    println!("{:<24} {:<2}  {:<16} {}", "id", "cc", "when", "text");
    for item in items {
        println!(
            "{:<24} {:<2}  {:<16} {}",
            item.id,
            item.country_code,
            format_timestamp(item.timestamp),
            truncate(&item.text, 56),
        );
    }
}

pub fn feedback_stats(report: &StatsReport) {
    println!("responses: {}", report.total_responses);
    for category in &report.categories {
        println!();
        println!("{:<14} average {:.1}", category.category, category.average);
        let max = category.histogram.values().copied().max().unwrap_or(0);
        for rating in 1..=5u8 {
            let count = category.histogram.get(&rating).copied().unwrap_or(0);
            println!("  {rating} | {:<24} {count}", bar(count, max, 24));
        }
    }
}

pub fn activity_stats(report: &ActivityReport) {
    println!("total games: {}", report.total_games);
    match report.last_played_at {
        Some(ms) => println!("last played: {}", format_timestamp(ms)),
        None => println!("last played: never"),
    }
    println!("last hour:   {}", report.last_hour);
    println!("last 24h:    {}", report.last_day);
    println!("last 7d:     {}", report.last_week);
}

/// JSON export view of a suggestion. `voterIds` ties players to votes, so it
/// is only present when explicitly requested.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionExport<'a> {
    pub id: &'a str,
    pub text: &'a str,
    pub country_code: &'a str,
    pub timestamp: i64,
    pub upvotes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter_ids: Option<&'a [String]>,
}

pub fn suggestion_exports<'a>(
    items: &'a [Suggestion],
    include_voters: bool,
) -> Vec<SuggestionExport<'a>> {
    items
        .iter()
        .map(|s| SuggestionExport {
            id: &s.id,
            text: &s.text,
            country_code: &s.country_code,
            timestamp: s.timestamp,
            upvotes: s.upvotes,
            voter_ids: include_voters.then_some(s.voter_ids.as_slice()),
        })
        .collect()
}
