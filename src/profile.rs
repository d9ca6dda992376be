use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Key the profile is stored under.
pub const PROFILE_KEY: &str = "playerInfo";

// ---------------------------------------------------------------------------
// Player profile
// ---------------------------------------------------------------------------

/// Persisted identity plus everything that has happened to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub nickname: String,
    #[serde(default)]
    pub history: Vec<String>,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
            history: Vec::new(),
        }
    }

    /// Player card: identity, then the numbered history with separators.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Player ID: {}\nNickname: {}\nHistory:",
            self.id, self.nickname
        );
        for (i, entry) in self.history.iter().enumerate() {
            s.push_str(&format!("\n{}. {entry}\n---", i + 1));
        }
        s
    }
}

/// Somewhere quest outcomes get written down.
pub trait HistoryLog {
    fn record(&mut self, message: &str) -> GameResult<()>;
}

impl HistoryLog for PlayerProfile {
    fn record(&mut self, message: &str) -> GameResult<()> {
        self.history.push(message.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Flat key-value storage
// ---------------------------------------------------------------------------

pub trait KeyValueStore {
    fn load(&self, key: &str) -> GameResult<Option<String>>;
    fn save(&mut self, key: &str, value: &str) -> GameResult<()>;
    fn remove(&mut self, key: &str) -> GameResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        self.data.remove(key);
        Ok(())
    }
}

/// A JSON object of string keys to string values, kept in a single file.
///
/// The whole file is rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> GameResult<Self> {
        let path = path.into();
        let cache: BTreeMap<String, String> = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| GameError::Storage {
                path: path.clone(),
                source,
            })?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Storage opened at {} ({} keys)", path.display(), cache.len());
        Ok(Self { path, cache })
    }

    fn persist(&self) -> GameResult<()> {
        let io_err = |source| GameError::Storage {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.cache)?;
        fs::write(&self.path, data).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.cache.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        self.cache.remove(key);
        self.persist()
    }
}

// ---------------------------------------------------------------------------
// Profile store
// ---------------------------------------------------------------------------

/// Reads and writes the single player profile record.
#[derive(Debug, Clone)]
pub struct ProfileStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> GameResult<Option<PlayerProfile>> {
        match self.store.load(PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&mut self, profile: &PlayerProfile) -> GameResult<()> {
        let raw = serde_json::to_string(profile)?;
        self.store.save(PROFILE_KEY, &raw)
    }

    /// Store a fresh profile with an empty history.
    pub fn create(
        &mut self,
        id: impl Into<String>,
        nickname: impl Into<String>,
    ) -> GameResult<PlayerProfile> {
        let profile = PlayerProfile::new(id, nickname);
        self.save(&profile)?;
        info!("Created player profile '{}'", profile.id);
        Ok(profile)
    }

    /// Empty the stored history, keeping the identity.
    pub fn reset_history(&mut self) -> GameResult<Option<PlayerProfile>> {
        let Some(mut profile) = self.load()? else {
            return Ok(None);
        };
        profile.history.clear();
        self.save(&profile)?;
        info!("Cleared history for player '{}'", profile.id);
        Ok(Some(profile))
    }

    pub fn clear(&mut self) -> GameResult<()> {
        self.store.remove(PROFILE_KEY)
    }
}

impl<S: KeyValueStore> HistoryLog for ProfileStore<S> {
    /// Read the record, append, and write the whole thing back.
    fn record(&mut self, message: &str) -> GameResult<()> {
        let Some(mut profile) = self.load()? else {
            warn!("No player profile stored; not recording \"{message}\"");
            return Ok(());
        };
        profile.history.push(message.to_string());
        self.save(&profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_json_shape() {
        let mut profile = PlayerProfile::new("p-1", "Indy");
        profile.history.push("found a clue".into());
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "p-1", "nickname": "Indy", "history": ["found a clue"]})
        );
    }

    #[test]
    fn test_profile_missing_history_defaults_empty() {
        let profile: PlayerProfile =
            serde_json::from_str(r#"{"id": "p-1", "nickname": "Indy"}"#).unwrap();
        assert!(profile.history.is_empty());
    }

    #[test]
    fn test_summary_numbers_history() {
        let mut profile = PlayerProfile::new("p-1", "Indy");
        profile.history = vec!["one".into(), "two".into()];
        assert_eq!(
            profile.summary(),
            "Player ID: p-1\nNickname: Indy\nHistory:\n1. one\n---\n2. two\n---"
        );
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = ProfileStore::new(MemoryStore::new());
        assert_eq!(store.load().unwrap(), None);

        let mut profile = PlayerProfile::new("p-1", "Indy");
        profile.history = vec!["a".into(), "b".into()];
        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));
    }

    #[test]
    fn test_reset_history_round_trips_empty() {
        let mut store = ProfileStore::new(MemoryStore::new());
        store.create("p-1", "Indy").unwrap();
        store.record("step one").unwrap();

        let reset = store.reset_history().unwrap().unwrap();
        assert!(reset.history.is_empty());
        assert_eq!(store.load().unwrap(), Some(PlayerProfile::new("p-1", "Indy")));
    }

    #[test]
    fn test_record_rewrites_stored_profile() {
        let mut store = ProfileStore::new(MemoryStore::new());
        store.create("p-1", "Indy").unwrap();
        store.record("first").unwrap();
        store.record("second").unwrap();
        assert_eq!(store.load().unwrap().unwrap().history, ["first", "second"]);
    }

    #[test]
    fn test_record_without_profile_is_skipped() {
        let mut store = ProfileStore::new(MemoryStore::new());
        store.record("lost").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let mut kv = MemoryStore::new();
        kv.save(PROFILE_KEY, "{not json").unwrap();
        let store = ProfileStore::new(kv);
        assert!(matches!(store.load(), Err(GameError::CorruptProfile(_))));
    }

    #[test]
    fn test_clear_removes_record() {
        let mut store = ProfileStore::new(MemoryStore::new());
        store.create("p-1", "Indy").unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_json_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("save.json");

        let mut store = ProfileStore::new(JsonFileStore::open(&path).unwrap());
        store.create("p-1", "Indy").unwrap();
        store.record("Found the first clue").unwrap();

        let reopened = ProfileStore::new(JsonFileStore::open(&path).unwrap());
        let profile = reopened.load().unwrap().unwrap();
        assert_eq!(profile.history, ["Found the first clue"]);

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.contains_key(PROFILE_KEY));
    }

    #[test]
    fn test_json_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }
}
