//! `wavectl` is the operator console for a hosted arcade game's persistent
//! state: the leaderboard, player suggestions, a moderation queue, and
//! aggregate stats, each stored whole as one JSON document in a remote
//! key-value store.
//!
//! The store is reachable only through the `gamekv` command-line gateway: one
//! short-lived process per get/put, no transactions, no compare-and-swap.
//! This crate is intentionally opinionated about the consistency discipline
//! layered on top of that substrate:
//! - Absence is a value, corruption is an error; the two never blur.
//! - Multi-key operations order their writes so a partial failure duplicates
//!   a record instead of losing it.
//! - Destructive operations are idempotent no-ops when the target is already
//!   gone, so a human can retry them safely.
//! - Dry-run rehearses any mutation against real current state without
//!   dispatching a single write.

pub mod commands;
pub mod model;
pub mod render;
pub mod store;

pub use store::{CliTransport, Fetched, MemTransport, Store, StoreError, Transport};
