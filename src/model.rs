//! Stored entities and the key namespace they live under.
//!
//! Every entity is one whole JSON document under a fixed key; there is no
//! server-side indexing and no partial update. Wire field names are camelCase
//! because the game runtime (the other writer) stores them that way.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed key namespace. One JSON document per key, no versioning field;
/// schema changes are coordinated out of band with the game runtime.
pub mod keys {
    pub const LEADERBOARD: &str = "leaderboard";
    pub const ACTIVITY_STATS: &str = "activity-stats";
    pub const FEEDBACK_AGGREGATES: &str = "feedback-stats";
    pub const SUGGESTIONS: &str = "suggestions";
    pub const MODERATION_QUEUE: &str = "moderation-queue";
}

/// Entities addressable by a unique string id within their collection.
pub trait Identified {
    fn id(&self) -> &str;
}

/// One finished run on the leaderboard. Immutable once written except by
/// removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub id: String,
    pub name: String,
    pub score: i64,
    pub wave: u32,
    /// Two-letter country code reported by the client.
    pub country_code: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Run length in seconds.
    pub game_length: u32,
}

impl Identified for ScoreEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A published, publicly visible suggestion.
///
/// `voter_ids` is sensitive (it ties players to votes) and is omitted from
/// JSON exports unless explicitly requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub text: String,
    pub country_code: String,
    pub timestamp: i64,
    pub upvotes: u64,
    #[serde(default)]
    pub voter_ids: Vec<String>,
}

impl Suggestion {
    /// A fresh publication of a pending feedback item: zero votes, no voters.
    pub fn from_pending(item: &ModerationItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            country_code: item.country_code.clone(),
            timestamp: item.timestamp,
            upvotes: 0,
            voter_ids: Vec::new(),
        }
    }
}

impl Identified for Suggestion {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Player feedback awaiting review. Created by the game runtime; leaves the
/// queue either by approval (becomes a [`Suggestion`]) or rejection
/// (deleted outright; there is no persisted "rejected" state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationItem {
    pub id: String,
    pub text: String,
    pub country_code: String,
    pub timestamp: i64,
    /// Always `"pending"`; kept on the wire for the runtime's benefit.
    pub status: String,
}

impl Identified for ModerationItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Count of responses per rating value 1..=5. serde_json round-trips the
/// integer keys through JSON string keys.
pub type Histogram = BTreeMap<u8, u64>;

/// Aggregate survey counters maintained by the game runtime. Read-only from
/// the admin side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAggregates {
    pub total_responses: u64,
    pub ratings: RatingBuckets,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBuckets {
    pub enjoyment: Histogram,
    pub difficulty: Histogram,
    pub return_intent: Histogram,
}

/// Play-activity counters maintained by the game runtime. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub total_games: u64,
    /// Completion timestamps (ms epoch) of recent runs, unordered.
    #[serde(default)]
    pub recent_games: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_at: Option<i64>,
}

/// Weighted average over a rating histogram, `0.0` when there are no
/// responses.
pub fn weighted_average(hist: &Histogram) -> f64 {
    let total: u64 = hist.values().sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: u64 = hist.iter().map(|(rating, count)| u64::from(*rating) * count).sum();
    weighted as f64 / total as f64
}
