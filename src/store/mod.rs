//! Persistence of settings, players and the last-action timestamp.
//!
//! - `KeyValueStore`: byte-level backend implemented by the host
//! - `MemoryStore`: in-memory backend
//! - `Storage`: typed, bincode-encoded access with default fallbacks

mod backend;
mod storage;

pub use backend::{KeyValueStore, MemoryStore};
pub use storage::{PlayerRecord, Storage};
