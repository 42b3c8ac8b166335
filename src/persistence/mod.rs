//! Best score persistence
//!
//! Features:
//! - Versioned JSON record (bare integers from older saves are still accepted)
//! - LocalStorage on the web, a JSON file natively, memory for tests and demos
//! - Atomic file writes (tmp then rename)
//!
//! Failures are reported as [`StoreError`]; the game shell logs them and carries on
//! with the best score it already knows.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

/// Current record version
pub const RECORD_VERSION: u32 = 1;

/// Persistence errors
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// No backing storage (private browsing, no window, ...)
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O failed: {e}"),
            StoreError::Parse(e) => write!(f, "saved best score is corrupt: {e}"),
            StoreError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Parse(e) => Some(e),
            StoreError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Parse(e)
    }
}

/// The persisted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub version: u32,
    pub best_score: u64,
}

impl BestRecord {
    pub fn new(best_score: u64) -> Self {
        Self {
            version: RECORD_VERSION,
            best_score,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Stored {
    Record(BestRecord),
    Bare(u64),
}

/// Parse a stored best score
pub fn decode(json: &str) -> Result<u64, StoreError> {
    let stored: Stored = serde_json::from_str(json)?;
    Ok(match stored {
        Stored::Record(record) => record.best_score,
        Stored::Bare(score) => score,
    })
}

pub fn encode(best_score: u64) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&BestRecord::new(best_score))?)
}

/// Key-value home of the best score
pub trait BestScoreStore {
    /// Stored best, 0 when nothing has been saved yet
    fn load_best(&mut self) -> Result<u64, StoreError>;
    fn save_best(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saved: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw JSON
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            saved: Some(json.into()),
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best(&mut self) -> Result<u64, StoreError> {
        self.saved.as_deref().map(decode).unwrap_or(Ok(0))
    }

    fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
        self.saved = Some(encode(score)?);
        Ok(())
    }
}

/// JSON file on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for JsonFileStore {
    fn load_best(&mut self) -> Result<u64, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => decode(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
        let json = encode(score)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("Best score {} written to {}", score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new("bestScore")
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(js_unavailable)?
            .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load_best(&mut self) -> Result<u64, StoreError> {
        match Self::storage()?.get_item(&self.key).map_err(js_unavailable)? {
            Some(json) => decode(&json),
            None => Ok(0),
        }
    }

    fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
        let json = encode(score)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(js_unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
fn js_unavailable(err: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{err:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reads_zero() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_best().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        store.save_best(315).unwrap();
        assert_eq!(store.load_best().unwrap(), 315);
    }

    #[test]
    fn test_bare_integer_is_accepted() {
        let mut store = MemoryStore::with_json("120");
        assert_eq!(store.load_best().unwrap(), 120);
    }

    #[test]
    fn test_corrupt_data_is_a_parse_error() {
        let mut store = MemoryStore::with_json("{ not json");
        let err = store.load_best().unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_record_carries_version() {
        let json = encode(42).unwrap();
        let record: BestRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, BestRecord::new(42));
        assert_eq!(record.version, RECORD_VERSION);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!("tide-hop-best-{}.json", std::process::id()));
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load_best().unwrap(), 0);
        store.save_best(85).unwrap();
        assert_eq!(JsonFileStore::new(&path).load_best().unwrap(), 85);
        std::fs::remove_file(store.path()).unwrap();
    }
}
