//! Leaderboard and play-activity commands.

use crate::commands::{remove_entry, Page, RemovalOutcome};
use crate::model::{keys, ActivityStats, ScoreEntry};
use crate::store::Store;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Leaderboard page, best score first. The store does not guarantee order,
/// so ranking happens at read time.
pub fn list(store: &Store, page: &Page) -> anyhow::Result<Vec<ScoreEntry>> {
    let mut entries: Vec<ScoreEntry> = store
        .get(keys::LEADERBOARD)?
        .value()
        .unwrap_or_default();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(page.slice(&entries).to_vec())
}

/// Idempotent removal of a leaderboard entry (cheaters, test runs).
pub fn remove(store: &Store, id: &str, assume_yes: bool) -> anyhow::Result<RemovalOutcome> {
    remove_entry::<ScoreEntry>(store, keys::LEADERBOARD, id, "score entry", assume_yes)
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub total_games: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_played_at: Option<i64>,
    pub last_hour: usize,
    pub last_day: usize,
    pub last_week: usize,
}

/// Play-activity summary. `total_games` and `last_played_at` are reported
/// verbatim; recent game timestamps are bucketed into sliding windows ending
/// at `now_ms`, counting strictly newer than the window boundary.
pub fn stats(store: &Store, now_ms: i64) -> anyhow::Result<ActivityReport> {
    let activity: ActivityStats = store
        .get(keys::ACTIVITY_STATS)?
        .value()
        .unwrap_or_default();

    let newer_than = |boundary: i64| {
        activity
            .recent_games
            .iter()
            .filter(|&&ts| ts > boundary)
            .count()
    };
    Ok(ActivityReport {
        total_games: activity.total_games,
        last_played_at: activity.last_played_at,
        last_hour: newer_than(now_ms - HOUR_MS),
        last_day: newer_than(now_ms - DAY_MS),
        last_week: newer_than(now_ms - WEEK_MS),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemTransport;

    fn entry(id: &str, score: i64) -> ScoreEntry {
        ScoreEntry {
            id: id.to_string(),
            name: format!("player-{id}"),
            score,
            wave: 3,
            country_code: "SE".to_string(),
            timestamp: 1_700_000_000_000,
            game_length: 120,
        }
    }

    fn seed<T: serde::Serialize>(mem: &MemTransport, key: &str, value: &T) {
        mem.seed(key, &serde_json::to_string(value).expect("seed json"));
    }

    #[test]
    fn list_ranks_by_score_regardless_of_stored_order() {
        let mem = MemTransport::new();
        seed(
            &mem,
            keys::LEADERBOARD,
            &vec![entry("mid", 500), entry("top", 900), entry("low", 100)],
        );
        let store = Store::new(mem, false);

        let out = list(&store, &Page { offset: 0, limit: 10 }).expect("list");
        let ids: Vec<&str> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["top", "mid", "low"]);
    }

    #[test]
    fn list_of_five_with_limit_two_offset_four_yields_the_fifth() {
        let mem = MemTransport::new();
        let entries: Vec<ScoreEntry> = (0..5).map(|i| entry(&format!("e{i}"), 500 - i)).collect();
        seed(&mem, keys::LEADERBOARD, &entries);
        let store = Store::new(mem, false);

        let out = list(&store, &Page { offset: 4, limit: 2 }).expect("list");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "e4");
    }

    #[test]
    fn remove_of_absent_id_leaves_the_document_byte_for_byte() {
        let mem = MemTransport::new();
        let raw = r#"[{"id":"keep","name":"n","score":1,"wave":1,"countryCode":"US","timestamp":1,"gameLength":1}]"#;
        mem.seed(keys::LEADERBOARD, raw);
        let store = Store::new(mem.clone(), false);

        assert_eq!(
            remove(&store, "ghost", true).expect("remove"),
            RemovalOutcome::AlreadyAbsent
        );
        assert_eq!(mem.snapshot(keys::LEADERBOARD).as_deref(), Some(raw));
    }

    #[test]
    fn remove_drops_the_entry() {
        let mem = MemTransport::new();
        seed(&mem, keys::LEADERBOARD, &vec![entry("a", 1), entry("b", 2)]);
        let store = Store::new(mem.clone(), false);

        assert_eq!(
            remove(&store, "a", true).expect("remove"),
            RemovalOutcome::Removed
        );
        let left: Vec<ScoreEntry> =
            serde_json::from_str(&mem.snapshot(keys::LEADERBOARD).expect("doc")).expect("json");
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "b");
    }

    #[test]
    fn activity_windows_use_a_strict_boundary() {
        let now = 10 * WEEK_MS;
        let mem = MemTransport::new();
        seed(
            &mem,
            keys::ACTIVITY_STATS,
            &ActivityStats {
                total_games: 42,
                recent_games: vec![
                    now - 1,           // in every window
                    now - HOUR_MS,     // exactly on the hour boundary: excluded from last_hour
                    now - DAY_MS + 1,  // inside last_day
                    now - WEEK_MS,     // exactly on the week boundary: excluded entirely
                ],
                last_played_at: Some(now - 1),
            },
        );
        let store = Store::new(mem, false);

        let report = stats(&store, now).expect("stats");
        assert_eq!(report.total_games, 42);
        assert_eq!(report.last_played_at, Some(now - 1));
        assert_eq!(report.last_hour, 1);
        assert_eq!(report.last_day, 3);
        assert_eq!(report.last_week, 3);
    }

    #[test]
    fn activity_stats_absent_document_reports_zeroes() {
        let store = Store::new(MemTransport::new(), false);
        let report = stats(&store, 1_000_000).expect("stats");
        assert_eq!(report.total_games, 0);
        assert_eq!(report.last_played_at, None);
        assert_eq!(report.last_week, 0);
    }
}
