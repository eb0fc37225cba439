//! Typed client over the remote key-value store.
//!
//! Semantics:
//! - A key with no stored value is [`Fetched::Absent`], never an error.
//! - A stored value that does not decode is a [`StoreError::Corrupt`] carrying
//!   the key and the full raw content; it is surfaced to the operator and
//!   never auto-repaired or overwritten.
//! - In dry-run mode `put` prints the would-be payload and dispatches nothing,
//!   so any mutation can be rehearsed against real current state.

pub mod transport;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use transport::{CliTransport, MemTransport, Transport, TransportError};

/// Outcome of a typed read. Absence is a value in its own right so callers
/// can never mistake an empty store for a broken one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Absent,
    Value(T),
}

impl<T> Fetched<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Fetched::Absent => None,
            Fetched::Value(v) => Some(v),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Fetched::Absent)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored value exists but does not decode. `raw` keeps the whole
    /// content for diagnosis; only the Display preview is truncated.
    #[error("stored value under {key:?} is corrupt: {source}; content: {}", preview(.raw))]
    Corrupt {
        key: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serializing value for {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Characters of raw content shown when displaying a corruption error.
const PREVIEW_LIMIT: usize = 160;

fn preview(raw: &str) -> String {
    match raw.char_indices().nth(PREVIEW_LIMIT) {
        None => raw.to_string(),
        Some((cut, _)) => format!("{}... ({} bytes total)", &raw[..cut], raw.len()),
    }
}

/// Result of a read-modify-write round trip.
#[derive(Debug, Clone)]
pub struct Modified<T> {
    pub old: Fetched<T>,
    pub new: T,
}

/// Typed store handle, constructed once per command invocation and passed
/// into the workflow handlers.
pub struct Store {
    transport: Box<dyn Transport>,
    dry_run: bool,
}

impl Store {
    pub fn new(transport: impl Transport + 'static, dry_run: bool) -> Self {
        Self {
            transport: Box::new(transport),
            dry_run,
        }
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Fetch and decode the document under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Fetched<T>, StoreError> {
        let Some(raw) = self.transport.fetch(key)? else {
            return Ok(Fetched::Absent);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Fetched::Value(value)),
            Err(source) => Err(StoreError::Corrupt {
                key: key.to_string(),
                raw,
                source,
            }),
        }
    }

    /// Serialize `value` and write it under `key`, replacing the whole
    /// document. In dry-run mode the payload is printed instead of written.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let payload = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        if self.dry_run {
            println!("[dry-run] would put {key}:");
            println!("{payload}");
            return Ok(());
        }
        self.transport.store(key, &payload)?;
        Ok(())
    }

    /// Convenience get-apply-put composition.
    ///
    /// Not atomic. The store offers no conditional write, so two concurrent
    /// invocations against the same key can interleave such that the second
    /// writer's base state does not reflect the first writer's result,
    /// silently discarding it. Accepted limitation; the mitigations are
    /// operator discipline (one admin session at a time) and the write
    /// ordering inside multi-key workflows.
    pub fn modify<T>(
        &self,
        key: &str,
        apply: impl FnOnce(Fetched<T>) -> T,
    ) -> Result<Modified<T>, StoreError>
    where
        T: Clone + Serialize + DeserializeOwned,
    {
        let old = self.get::<T>(key)?;
        let new = apply(old.clone());
        self.put(key, &new)?;
        Ok(Modified { old, new })
    }
}
