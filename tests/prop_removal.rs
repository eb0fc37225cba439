use proptest::prelude::*;
use proptest::sample::Index;

use wavectl::commands::{scores, Page, RemovalOutcome};
use wavectl::model::{keys, ScoreEntry};
use wavectl::{MemTransport, Store};

fn entry(i: usize, score: i64) -> ScoreEntry {
    ScoreEntry {
        id: format!("e{i}"),
        name: format!("player{i}"),
        score,
        wave: 1,
        country_code: "NO".to_string(),
        timestamp: 1_700_000_000_000 + i as i64,
        game_length: 60,
    }
}

proptest! {
    /// Removing an id that is not stored never rewrites the document, no
    /// matter what the collection holds; retries are exact no-ops.
    #[test]
    fn absent_id_removal_never_rewrites(raw_scores in proptest::collection::vec(0i64..10_000, 0..12)) {
        let entries: Vec<ScoreEntry> = raw_scores
            .iter()
            .enumerate()
            .map(|(i, &s)| entry(i, s))
            .collect();
        let doc = serde_json::to_string(&entries).expect("doc");

        let mem = MemTransport::new();
        mem.seed(keys::LEADERBOARD, &doc);
        let store = Store::new(mem.clone(), false);

        let outcome = scores::remove(&store, "never-stored", true).expect("remove");
        prop_assert_eq!(outcome, RemovalOutcome::AlreadyAbsent);
        let snapshot = mem.snapshot(keys::LEADERBOARD);
        prop_assert_eq!(snapshot.as_deref(), Some(doc.as_str()));
    }

    /// Removing a present id drops exactly that entry and preserves the
    /// stored order of the rest.
    #[test]
    fn present_id_removal_drops_exactly_one(
        raw_scores in proptest::collection::vec(0i64..10_000, 1..12),
        pick in any::<Index>(),
    ) {
        let entries: Vec<ScoreEntry> = raw_scores
            .iter()
            .enumerate()
            .map(|(i, &s)| entry(i, s))
            .collect();
        let victim = entries[pick.index(entries.len())].id.clone();

        let mem = MemTransport::new();
        mem.seed(keys::LEADERBOARD, &serde_json::to_string(&entries).expect("doc"));
        let store = Store::new(mem.clone(), false);

        let outcome = scores::remove(&store, &victim, true).expect("remove");
        prop_assert_eq!(outcome, RemovalOutcome::Removed);

        let left: Vec<ScoreEntry> =
            serde_json::from_str(&mem.snapshot(keys::LEADERBOARD).expect("doc")).expect("json");
        let expected: Vec<ScoreEntry> =
            entries.into_iter().filter(|e| e.id != victim).collect();
        prop_assert_eq!(left, expected);

        // And a second pass over the now-absent id changes nothing.
        let doc_after = mem.snapshot(keys::LEADERBOARD);
        let outcome = scores::remove(&store, &victim, true).expect("remove");
        prop_assert_eq!(outcome, RemovalOutcome::AlreadyAbsent);
        prop_assert_eq!(mem.snapshot(keys::LEADERBOARD), doc_after);
    }
}

// Page::slice is the single pagination path for every list command; pin its
// boundary behavior here where the removal properties already exercise the
// same collections.
#[test]
fn page_slice_beyond_the_end_is_empty() {
    let items: Vec<u32> = (0..5).collect();
    assert_eq!(Page { offset: 4, limit: 2 }.slice(&items), &[4]);
    assert!(Page { offset: 5, limit: 2 }.slice(&items).is_empty());
    assert!(Page { offset: 100, limit: 2 }.slice(&items).is_empty());
    assert_eq!(Page { offset: 0, limit: 0 }.slice(&items), &[] as &[u32]);
}
