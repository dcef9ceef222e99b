//! Typed persistence over a [`KeyValueStore`].
//!
//! Values are encoded with `bincode` under namespaced keys:
//!
//! | key              | value          |
//! |------------------|----------------|
//! | `settings`       | [`Settings`]   |
//! | `player/<name>`  | [`PlayerRecord`] |
//! | `last_action`    | `u64` millis   |
//!
//! Loading never fails: values that do not decode are logged and replaced
//! by defaults.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::backend::KeyValueStore;
use crate::core::{EngineConfig, StoreError};
use crate::players::{Player, Sex};
use crate::settings::Settings;

const SETTINGS_KEY: &str = "settings";
const PLAYER_PREFIX: &str = "player/";
const LAST_ACTION_KEY: &str = "last_action";

/// Stored form of a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub sex: Sex,
    pub level: u32,
    pub clothing: i32,
    pub points: f64,
    /// Whether the player takes part in the next game.
    pub active: bool,
    /// Join order. Players reload into the pool in ascending order.
    pub seq: u64,
}

impl PlayerRecord {
    /// Snapshot a player's progression.
    #[must_use]
    pub fn from_player(player: &Player, active: bool, seq: u64) -> Self {
        Self {
            name: player.name().to_string(),
            sex: player.sex(),
            level: player.level(),
            clothing: player.clothing(),
            points: player.points(),
            active,
            seq,
        }
    }

    /// Rebuild the player. Decay counters start fresh.
    #[must_use]
    pub fn to_player(&self, config: &EngineConfig) -> Player {
        Player::new(self.name.clone(), self.sex, config).with_progress(
            self.level,
            self.points,
            self.clothing,
        )
    }
}

/// Typed access to settings, players and the last-action timestamp.
#[derive(Clone, Debug)]
pub struct Storage<S> {
    backend: S,
    resume_window_ms: u64,
}

impl<S: KeyValueStore> Storage<S> {
    /// Wrap a backend. Resume is offered within `resume_window_ms` of the
    /// last recorded action.
    pub fn new(backend: S, resume_window_ms: u64) -> Self {
        Self {
            backend,
            resume_window_ms,
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Consume the storage and return the backend.
    pub fn into_backend(self) -> S {
        self.backend
    }

    fn put_value<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = bincode::serialize(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.put(key, bytes);
        Ok(())
    }

    fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(bytes) = self.backend.get(key) else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode {
                key: key.to_string(),
                source,
            })
    }

    /// Load settings, falling back to defaults.
    pub fn load_settings(&self) -> Settings {
        match self.get_value(SETTINGS_KEY) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "stored settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.put_value(SETTINGS_KEY, settings)
    }

    fn player_key(name: &str) -> String {
        format!("{PLAYER_PREFIX}{name}")
    }

    /// Load one player record. Unreadable records count as missing.
    pub fn load_player(&self, name: &str) -> Option<PlayerRecord> {
        let key = Self::player_key(name);
        match self.get_value(&key) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%error, "stored player unreadable, skipping");
                None
            }
        }
    }

    /// Load every stored player, or only the active ones, in join order.
    pub fn load_players(&self, active_only: bool) -> Vec<PlayerRecord> {
        let mut records: Vec<PlayerRecord> = self
            .backend
            .keys(PLAYER_PREFIX)
            .iter()
            .filter_map(|key| key.strip_prefix(PLAYER_PREFIX))
            .filter_map(|name| self.load_player(name))
            .filter(|record| !active_only || record.active)
            .collect();
        records.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.name.cmp(&b.name)));
        records
    }

    /// Sequence number for the next player to join.
    pub fn next_seq(&self) -> u64 {
        self.load_players(false)
            .last()
            .map_or(0, |record| record.seq + 1)
    }

    /// The stored join sequence of `name`, or the next free one.
    pub fn seq_of(&self, name: &str) -> u64 {
        self.load_player(name)
            .map_or_else(|| self.next_seq(), |record| record.seq)
    }

    pub fn save_player(&mut self, record: &PlayerRecord) -> Result<(), StoreError> {
        self.put_value(&Self::player_key(&record.name), record)
    }

    /// Store a player's progression, keeping its stored active flag and
    /// join order.
    ///
    /// Players without a record are stored as active and join last.
    pub fn save_progress(&mut self, player: &Player) -> Result<(), StoreError> {
        let (active, seq) = match self.load_player(player.name()) {
            Some(record) => (record.active, record.seq),
            None => (true, self.next_seq()),
        };
        self.save_player(&PlayerRecord::from_player(player, active, seq))
    }

    /// Change a stored player's active flag. Returns `false` if no record
    /// exists.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<bool, StoreError> {
        let Some(mut record) = self.load_player(name) else {
            return Ok(false);
        };
        record.active = active;
        self.save_player(&record)?;
        Ok(true)
    }

    /// Delete a stored player. Returns `false` if none existed.
    pub fn delete_player(&mut self, name: &str) -> bool {
        self.backend.remove(&Self::player_key(name))
    }

    /// Remember the time of the last game action.
    pub fn record_action(&mut self, now_ms: u64) -> Result<(), StoreError> {
        self.put_value(LAST_ACTION_KEY, &now_ms)
    }

    /// Time of the last game action, if any.
    pub fn last_action(&self) -> Option<u64> {
        match self.get_value(LAST_ACTION_KEY) {
            Ok(time) => time,
            Err(error) => {
                tracing::warn!(%error, "stored timestamp unreadable");
                None
            }
        }
    }

    /// Whether the last action is recent enough to offer resuming.
    pub fn can_resume(&self, now_ms: u64) -> bool {
        self.last_action()
            .is_some_and(|last| now_ms >= last && now_ms - last <= self.resume_window_ms)
    }
}
