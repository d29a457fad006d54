//! # Storage Layer
//!
//! History is persisted through the [`KeyValueStore`] trait: a synchronous
//! string-to-string map, the same shape as a browser's local storage.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: Production storage
//!   - One file per key: `{root}/{key}.json`
//!   - Writes go through a temporary file and a rename
//!
//! - [`mem_backend::MemBackend`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate write failures
//!
//! ## Storage Format
//!
//! ```text
//! ~/.local/share/reckon/
//! ├── calculatorHistory.json   # JSON array of history records, newest first
//! └── config.json              # Calculator configuration
//! ```

use crate::error::{ReckonError, Result};

pub mod fs_backend;
pub mod mem_backend;

/// Abstract interface for raw key-value persistence.
///
/// All methods take `&self`; backends that need mutation use interior
/// mutability since the calculator is single-threaded.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `Ok(None)` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Keys become file names, so only a conservative character set is allowed.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ReckonError::Store("Storage key cannot be empty".to_string()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ReckonError::Store(format!("Invalid storage key: {}", key)));
    }
    Ok(())
}
