//! Raw access to the remote key-value store.
//!
//! The store itself is remote and opaque; the only sanctioned path to it is
//! the `gamekv` gateway tool, one short-lived process per call. Everything
//! above this module talks to the [`Transport`] trait so the gateway can be
//! swapped for an in-memory fake in tests without touching workflow logic.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

/// Exit code with which the gateway tool signals a missing key on `get`.
/// Any other non-zero exit is a transport failure, never absence.
pub const ABSENT_EXIT_CODE: i32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} {op} {key:?} failed: {detail}")]
    Tool {
        tool: String,
        op: &'static str,
        key: String,
        detail: String,
    },

    #[error("{tool} returned non-utf8 output for {key:?}")]
    Output { tool: String, key: String },

    #[error("staging payload for {key:?}: {source}")]
    Stage {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Narrow store-access seam: string keys, whole string payloads.
///
/// `fetch` returns `Ok(None)` for a key with no stored value; implementations
/// must never report absence as an error.
pub trait Transport {
    fn fetch(&self, key: &str) -> Result<Option<String>, TransportError>;
    fn store(&self, key: &str, payload: &str) -> Result<(), TransportError>;
}

/// Gateway-tool transport. Spawns one `gamekv` process per call:
///
/// - `gamekv get <key>`: value bytes on stdout, exit 0; exit 4 when the key
///   has no stored value.
/// - `gamekv put <key> --path <file>`: reads the payload from `<file>`.
///
/// Put payloads travel through a temporary file, never through argv, so the
/// payload is immune to shell/argument escaping. The file is removed when the
/// handle drops, on success and failure alike.
pub struct CliTransport {
    bin: PathBuf,
}

impl CliTransport {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    fn tool(&self) -> String {
        self.bin.display().to_string()
    }
}

impl Transport for CliTransport {
    fn fetch(&self, key: &str) -> Result<Option<String>, TransportError> {
        log::debug!("gateway get {key}");
        let output = Command::new(&self.bin)
            .arg("get")
            .arg(key)
            .output()
            .map_err(|source| TransportError::Spawn {
                tool: self.tool(),
                source,
            })?;

        if output.status.success() {
            let raw = String::from_utf8(output.stdout).map_err(|_| TransportError::Output {
                tool: self.tool(),
                key: key.to_string(),
            })?;
            return Ok(Some(raw));
        }
        if output.status.code() == Some(ABSENT_EXIT_CODE) {
            return Ok(None);
        }
        Err(TransportError::Tool {
            tool: self.tool(),
            op: "get",
            key: key.to_string(),
            detail: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        })
    }

    fn store(&self, key: &str, payload: &str) -> Result<(), TransportError> {
        log::debug!("gateway put {key} ({} bytes)", payload.len());
        let stage = |source| TransportError::Stage {
            key: key.to_string(),
            source,
        };
        let mut staged = tempfile::NamedTempFile::new().map_err(stage)?;
        staged.write_all(payload.as_bytes()).map_err(stage)?;
        staged.flush().map_err(stage)?;

        let output = Command::new(&self.bin)
            .arg("put")
            .arg(key)
            .arg("--path")
            .arg(staged.path())
            .output()
            .map_err(|source| TransportError::Spawn {
                tool: self.tool(),
                source,
            })?;

        if !output.status.success() {
            return Err(TransportError::Tool {
                tool: self.tool(),
                op: "put",
                key: key.to_string(),
                detail: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}

/// In-memory transport for tests and rehearsal.
///
/// Clones share state, so a test can keep a handle for inspection after
/// moving a clone into a [`crate::Store`]. Individual keys can be primed to
/// fail on `store`, which is how the partial-failure paths are exercised.
#[derive(Clone, Default)]
pub struct MemTransport {
    inner: Arc<MemInner>,
}

#[derive(Default)]
struct MemInner {
    values: Mutex<HashMap<String, String>>,
    failing_puts: Mutex<HashSet<String>>,
}

impl MemTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str, payload: &str) {
        self.lock_values().insert(key.to_string(), payload.to_string());
    }

    /// Every subsequent `store` against `key` fails.
    pub fn fail_puts_to(&self, key: &str) {
        let mut failing = self
            .inner
            .failing_puts
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        failing.insert(key.to_string());
    }

    /// Current stored payload, if any.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn lock_values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.inner.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Transport for MemTransport {
    fn fetch(&self, key: &str) -> Result<Option<String>, TransportError> {
        Ok(self.lock_values().get(key).cloned())
    }

    fn store(&self, key: &str, payload: &str) -> Result<(), TransportError> {
        let failing = self
            .inner
            .failing_puts
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if failing.contains(key) {
            return Err(TransportError::Tool {
                tool: "mem".to_string(),
                op: "put",
                key: key.to_string(),
                detail: "injected fault".to_string(),
            });
        }
        drop(failing);
        self.lock_values().insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
