//! Save slots and session snapshots.
//!
//! Progress (money and upgrade levels) lives in named JSON save slots
//! behind the [`SaveStore`] trait. A full session, including customers,
//! tables and pending timers, can additionally be snapshotted with bincode.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bistro_logic::economy::{Ledger, Upgrades};
use serde::{Deserialize, Serialize};

use crate::components::{Customer, Facing, Oven, Player, Position, Table, Tint, Walking};
use crate::scheduler::Timer;

/// Version number for session snapshots (increment when the format changes)
pub const SAVE_VERSION: u32 = 1;

const SLOT_PREFIX: &str = "save_";
const SLOT_SUFFIX: &str = ".json";
const LAST_SLOT_FILE: &str = "last_slot";

/// Persistent progress of one save slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotData {
    pub money: u64,
    pub cook_speed: f32,
    pub upgrade_oven_speed: u32,
    pub upgrade_earn_rate: u32,
    pub upgrade_patience: u32,
    pub upgrade_player_speed: u32,
    /// Milliseconds since the Unix epoch at save time.
    pub timestamp: u64,
}

impl Default for SlotData {
    fn default() -> Self {
        Self {
            money: 0,
            cook_speed: 1.0,
            upgrade_oven_speed: 0,
            upgrade_earn_rate: 0,
            upgrade_patience: 0,
            upgrade_player_speed: 0,
            timestamp: 0,
        }
    }
}

impl SlotData {
    pub fn from_ledger(ledger: &Ledger, timestamp: u64) -> Self {
        let upgrades = ledger.upgrades();
        Self {
            money: ledger.money(),
            cook_speed: ledger.cook_speed(),
            upgrade_oven_speed: upgrades.oven_speed,
            upgrade_earn_rate: upgrades.earn_rate,
            upgrade_patience: upgrades.patience,
            upgrade_player_speed: upgrades.player_speed,
            timestamp,
        }
    }

    pub fn to_ledger(&self) -> Ledger {
        Ledger::new(
            self.money,
            self.cook_speed,
            Upgrades {
                oven_speed: self.upgrade_oven_speed,
                earn_rate: self.upgrade_earn_rate,
                patience: self.upgrade_patience,
                player_speed: self.upgrade_player_speed,
            },
        )
    }
}

/// Name for a freshly created slot.
pub fn new_slot_name(timestamp_ms: u64) -> String {
    format!("Save_{}", timestamp_ms)
}

/// Slot names end up in file names, so keep them to a safe alphabet.
pub fn is_valid_slot_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Storage for named save slots.
///
/// One slot is current per session; `set_current` also records it as the
/// slot to continue next time.
pub trait SaveStore {
    /// All slot names, sorted.
    fn list_slots(&self) -> Result<Vec<String>, SaveError>;
    /// Read a slot. `Ok(None)` when it does not exist.
    fn load(&self, slot: &str) -> Result<Option<SlotData>, SaveError>;
    fn save(&mut self, slot: &str, data: &SlotData) -> Result<(), SaveError>;
    /// Remove a slot; forgets it as the last slot if it was.
    fn delete(&mut self, slot: &str) -> Result<(), SaveError>;
    fn last_slot(&self) -> Result<Option<String>, SaveError>;
    fn set_current(&mut self, slot: &str) -> Result<(), SaveError>;

    /// Slot to continue: the last one played, or a new slot.
    fn continue_slot(&mut self, timestamp_ms: u64) -> Result<String, SaveError> {
        let slot = match self.last_slot()? {
            Some(slot) => slot,
            None => new_slot_name(timestamp_ms),
        };
        self.set_current(&slot)?;
        Ok(slot)
    }
}

/// In-memory store holding the same JSON a [`DirStore`] would write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: BTreeMap<String, String>,
    last: Option<String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with one slot already written.
    pub fn with_slot(slot: &str, data: &SlotData) -> Result<Self, SaveError> {
        let mut store = Self::new();
        store.save(slot, data)?;
        store.set_current(slot)?;
        Ok(store)
    }

    /// Refuse all writes, as a full or locked disk would.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Store raw text under a slot, bypassing serialization.
    pub fn insert_raw(&mut self, slot: &str, json: &str) {
        self.slots.insert(slot.to_string(), json.to_string());
    }

    fn check_writable(&self) -> Result<(), SaveError> {
        if self.read_only {
            return Err(SaveError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        Ok(())
    }
}

impl SaveStore for MemoryStore {
    fn list_slots(&self) -> Result<Vec<String>, SaveError> {
        Ok(self.slots.keys().cloned().collect())
    }

    fn load(&self, slot: &str) -> Result<Option<SlotData>, SaveError> {
        match self.slots.get(slot) {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, slot: &str, data: &SlotData) -> Result<(), SaveError> {
        self.check_writable()?;
        if !is_valid_slot_name(slot) {
            return Err(SaveError::InvalidSlot(slot.to_string()));
        }
        let json = serde_json::to_string(data)?;
        self.slots.insert(slot.to_string(), json);
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<(), SaveError> {
        self.check_writable()?;
        self.slots.remove(slot);
        if self.last.as_deref() == Some(slot) {
            self.last = None;
        }
        Ok(())
    }

    fn last_slot(&self) -> Result<Option<String>, SaveError> {
        Ok(self.last.clone())
    }

    fn set_current(&mut self, slot: &str) -> Result<(), SaveError> {
        self.check_writable()?;
        if !is_valid_slot_name(slot) {
            return Err(SaveError::InvalidSlot(slot.to_string()));
        }
        self.last = Some(slot.to_string());
        Ok(())
    }
}

/// One `save_<slot>.json` file per slot in a directory, plus a
/// `last_slot` marker file.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a save directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, SaveError> {
        if !is_valid_slot_name(slot) {
            return Err(SaveError::InvalidSlot(slot.to_string()));
        }
        Ok(self.root.join(format!("{}{}{}", SLOT_PREFIX, slot, SLOT_SUFFIX)))
    }
}

impl SaveStore for DirStore {
    fn list_slots(&self) -> Result<Vec<String>, SaveError> {
        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(slot) = name
                .strip_prefix(SLOT_PREFIX)
                .and_then(|rest| rest.strip_suffix(SLOT_SUFFIX))
            {
                if is_valid_slot_name(slot) {
                    slots.push(slot.to_string());
                }
            }
        }
        slots.sort();
        Ok(slots)
    }

    fn load(&self, slot: &str) -> Result<Option<SlotData>, SaveError> {
        let path = self.slot_path(slot)?;
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, slot: &str, data: &SlotData) -> Result<(), SaveError> {
        let path = self.slot_path(slot)?;
        let json = serde_json::to_string_pretty(data)?;
        // Atomic replace: write a sibling temp file, then rename
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&mut self, slot: &str) -> Result<(), SaveError> {
        let path = self.slot_path(slot)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if self.last_slot()?.as_deref() == Some(slot) {
            fs::remove_file(self.root.join(LAST_SLOT_FILE))?;
        }
        Ok(())
    }

    fn last_slot(&self) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.root.join(LAST_SLOT_FILE)) {
            Ok(text) => {
                let slot = text.trim();
                Ok(is_valid_slot_name(slot).then(|| slot.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_current(&mut self, slot: &str) -> Result<(), SaveError> {
        if !is_valid_slot_name(slot) {
            return Err(SaveError::InvalidSlot(slot.to_string()));
        }
        fs::write(self.root.join(LAST_SLOT_FILE), slot)?;
        Ok(())
    }
}

/// A customer entity flattened for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableCustomer {
    pub customer: Customer,
    pub position: Position,
    pub facing: Facing,
    pub tint: Tint,
    pub walking: Option<Walking>,
}

/// Serializable snapshot of a running session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// Snapshot format version
    pub version: u32,
    pub slot: String,
    pub clock_ms: u64,
    pub ledger: Ledger,
    pub tables: Vec<Table>,
    /// Indexed by table.
    pub customers: Vec<SerializableCustomer>,
    pub player: Player,
    pub door_open: bool,
    pub oven: Oven,
    pub timers: Vec<Timer>,
    pub next_token: u64,
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(io::Error),
    Json(serde_json::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    InvalidSlot(String),
    /// Snapshot does not fit this engine (e.g. different table count).
    Mismatch(String),
}

impl From<io::Error> for SaveError {
    fn from(e: io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::InvalidSlot(name) => write!(f, "Invalid save slot name: {:?}", name),
            SaveError::Mismatch(why) => write!(f, "Snapshot does not match session: {}", why),
        }
    }
}

impl std::error::Error for SaveError {}
