//! Key-value JSON persistence.
//!
//! The engine persists each collection as a full JSON snapshot under its
//! own key after every mutation. There is no transactional batching: a
//! crash between a mutation and its write loses at most that mutation and
//! cannot corrupt earlier snapshots.

mod config;
mod json_store;

pub use config::EngineConfig;
pub use json_store::{JsonFileStore, MemoryStore};

use std::path::PathBuf;

use serde_json::Value;

use crate::error::StorageError;

/// Snapshot keys used by the engine.
pub mod keys {
    pub const DAILY_GOALS: &str = "daily_goals";
    pub const PENALTIES: &str = "penalties";
    pub const POINT_TRANSACTIONS: &str = "point_transactions";
    pub const COUNTERS: &str = "counters";
}

/// Synchronous key-value JSON storage.
///
/// `load` is fail-soft by contract: implementations return `None` for both
/// missing and unreadable keys, and callers fall back to defaults. `save`
/// overwrites the full snapshot for the key.
pub trait Store {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError>;
}

/// Returns `~/.config/doorsuffer[-dev]/` based on DOORSUFFER_ENV.
///
/// Set DOORSUFFER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DOORSUFFER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("doorsuffer-dev")
    } else {
        base_dir.join("doorsuffer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
