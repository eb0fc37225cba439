//! Operator workflow commands.
//!
//! Each command takes an explicitly constructed [`Store`] and returns plain
//! data or an outcome value; rendering and exit-code mapping stay in the
//! binary. All ordering, idempotence, and confirmation policy lives here.

pub mod feedback;
pub mod scores;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::Identified;
use crate::render;
use crate::store::Store;

/// Offset/limit window over a collection. Slicing past the end yields an
/// empty page, never an error.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

/// How an idempotent removal concluded. Every variant exits 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The id was present; the collection was rewritten without it.
    Removed,
    /// The id (or the whole collection) was already gone; nothing written.
    AlreadyAbsent,
    /// The operator declined the confirmation prompt; nothing written.
    Declined,
}

/// Idempotent removal of `id` from the sequence stored under `key`.
///
/// When the id is absent the stored document is left untouched, not even for an
/// equal-value rewrite, so retries are byte-for-byte no-ops. Removes every
/// entry carrying the id, which also converges any duplicates left behind by
/// an interrupted multi-key operation.
pub(crate) fn remove_entry<T>(
    store: &Store,
    key: &str,
    id: &str,
    noun: &str,
    assume_yes: bool,
) -> anyhow::Result<RemovalOutcome>
where
    T: Identified + Serialize + DeserializeOwned,
{
    let entries: Vec<T> = match store.get::<Vec<T>>(key)?.value() {
        None => return Ok(RemovalOutcome::AlreadyAbsent),
        Some(entries) => entries,
    };
    if !entries.iter().any(|e| e.id() == id) {
        return Ok(RemovalOutcome::AlreadyAbsent);
    }

    if !assume_yes && !store.dry_run() {
        let go = render::confirm(&format!("Permanently delete {noun} {id:?}? [y/N] "))
            .context("reading confirmation")?;
        if !go {
            return Ok(RemovalOutcome::Declined);
        }
    }

    let kept: Vec<T> = entries.into_iter().filter(|e| e.id() != id).collect();
    store
        .put(key, &kept)
        .with_context(|| format!("rewriting {key} without {noun} {id:?}"))?;
    log::info!("removed {noun} {id} from {key}");
    Ok(RemovalOutcome::Removed)
}
