//! Suggestion and moderation workflow.
//!
//! A feedback item lives in exactly one of two places: the moderation queue
//! (pending) or the public suggestions list (approved). Approval is the only
//! path across that boundary and it is two writes against a store with no
//! transactions, so the writes are ordered to bias failure toward duplication:
//! a duplicate is one `reject` away from clean, a lost record is gone.

use anyhow::{bail, Context};

use crate::commands::{remove_entry, Page, RemovalOutcome};
use crate::model::{
    keys, weighted_average, FeedbackAggregates, Histogram, ModerationItem, Suggestion,
};
use crate::render;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first (default).
    Recent,
    /// Most upvoted first.
    Upvotes,
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Case-insensitive substring match on the suggestion text.
    pub search: Option<String>,
    pub sort: SortOrder,
    pub page: Page,
}

/// Published suggestions, filtered, sorted, and paginated.
pub fn list(store: &Store, query: &ListQuery) -> anyhow::Result<Vec<Suggestion>> {
    let mut suggestions: Vec<Suggestion> = store
        .get(keys::SUGGESTIONS)?
        .value()
        .unwrap_or_default();

    if let Some(needle) = &query.search {
        let needle = needle.to_lowercase();
        suggestions.retain(|s| s.text.to_lowercase().contains(&needle));
    }
    match query.sort {
        SortOrder::Recent => suggestions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Upvotes => suggestions.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
    }
    Ok(query.page.slice(&suggestions).to_vec())
}

/// Pending feedback in insertion order. No sort option; the queue's order is
/// the review order.
pub fn queue(store: &Store, page: &Page) -> anyhow::Result<Vec<ModerationItem>> {
    let pending: Vec<ModerationItem> = store
        .get(keys::MODERATION_QUEUE)?
        .value()
        .unwrap_or_default();
    Ok(page.slice(&pending).to_vec())
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: &'static str,
    /// Weighted average over the histogram, one decimal place, `0.0` when
    /// there are no responses.
    pub average: f64,
    pub histogram: Histogram,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_responses: u64,
    pub categories: Vec<CategoryStats>,
}

/// Survey aggregates as written by the game runtime. An absent document is an
/// empty survey, not an error.
pub fn stats(store: &Store) -> anyhow::Result<StatsReport> {
    let aggregates: FeedbackAggregates = store
        .get(keys::FEEDBACK_AGGREGATES)?
        .value()
        .unwrap_or_default();

    let category = |name: &'static str, hist: Histogram| CategoryStats {
        category: name,
        average: (weighted_average(&hist) * 10.0).round() / 10.0,
        histogram: hist,
    };
    Ok(StatsReport {
        total_responses: aggregates.total_responses,
        categories: vec![
            category("enjoyment", aggregates.ratings.enjoyment),
            category("difficulty", aggregates.ratings.difficulty),
            category("return intent", aggregates.ratings.return_intent),
        ],
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    Published(Suggestion),
    /// Operator declined the prompt; nothing written, not an error.
    Declined,
}

/// Publish a pending feedback item as a suggestion.
///
/// Write order is the contract: suggestions first, queue second. If the
/// suggestions write fails the queue is untouched and nothing was published.
/// If the queue write fails after the suggestions write succeeded, the id
/// exists in both collections; the returned error says so and names the
/// repair (`feedback reject <id>`), which deletes the leftover queue copy.
///
/// Approving an id that is not in the queue is a hard error; unlike the
/// removal commands there is no recoverable no-op here, because the intended
/// effect cannot happen without the source record. Two concurrent approvals
/// of the same id can both pass the queue read and double-insert; the store
/// has no conditional write to prevent it, and `feedback delete` removes all
/// copies if it ever happens.
pub fn approve(store: &Store, id: &str, assume_yes: bool) -> anyhow::Result<ApproveOutcome> {
    let pending: Vec<ModerationItem> = store
        .get(keys::MODERATION_QUEUE)?
        .value()
        .unwrap_or_default();
    let Some(item) = pending.iter().find(|m| m.id == id) else {
        bail!("no pending feedback with id {id:?} in the moderation queue");
    };

    if !assume_yes && !store.dry_run() {
        let prompt = format!(
            "Publish feedback {id:?} ({}) as a public suggestion? [y/N] ",
            render::truncate(&item.text, 40)
        );
        if !render::confirm(&prompt).context("reading confirmation")? {
            return Ok(ApproveOutcome::Declined);
        }
    }

    let suggestion = Suggestion::from_pending(item);
    let mut suggestions: Vec<Suggestion> = store
        .get(keys::SUGGESTIONS)?
        .value()
        .unwrap_or_default();
    suggestions.insert(0, suggestion.clone());
    store
        .put(keys::SUGGESTIONS, &suggestions)
        .context("publishing the suggestion failed; the moderation queue was not touched")?;

    let kept: Vec<ModerationItem> = pending.into_iter().filter(|m| m.id != id).collect();
    if let Err(err) = store.put(keys::MODERATION_QUEUE, &kept) {
        return Err(anyhow::Error::new(err).context(format!(
            "suggestion {id:?} was published but the moderation queue could not be rewritten; \
             the id now exists in both collections; run `wavectl feedback reject {id}` to \
             drop the leftover queue entry"
        )));
    }
    log::info!("approved feedback {id}; published as suggestion");
    Ok(ApproveOutcome::Published(suggestion))
}

/// Remove a pending feedback item without publishing it. Idempotent: an id
/// that is not in the queue is a no-op, and retrying after a partial
/// `approve` converges the both-places state.
pub fn reject(store: &Store, id: &str, assume_yes: bool) -> anyhow::Result<RemovalOutcome> {
    remove_entry::<ModerationItem>(store, keys::MODERATION_QUEUE, id, "pending feedback", assume_yes)
}

/// Remove a published suggestion. Same idempotent contract as [`reject`].
pub fn delete(store: &Store, id: &str, assume_yes: bool) -> anyhow::Result<RemovalOutcome> {
    remove_entry::<Suggestion>(store, keys::SUGGESTIONS, id, "suggestion", assume_yes)
}
