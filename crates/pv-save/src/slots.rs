//! Save-slot management: which documents a slot holds and how they are read,
//! written, loaded and cleared.

use pv_core::SlotIndex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SaveConfig;
use crate::error::{SaveError, SaveResult};
use crate::storage::{FsStorage, Storage};

/// Slot info document. Its presence marks a slot as used.
pub const INFO_FILE: &str = "regoth_save.json";
/// Conversation-engine document.
pub const DIALOG_MANAGER_FILE: &str = "dialogmanager.json";
/// Script-engine document.
pub const SCRIPT_ENGINE_FILE: &str = "scriptengine.json";
/// Name of the player document written by [`SaveSlots::save_slot`].
pub const DEFAULT_PLAYER: &str = "player";

/// Prefixes of files written by this engine. Only these are cleared.
const CLEARABLE_PREFIXES: [&str; 5] = ["regoth_", "world_", "player", "dialogmanager", "scriptengine"];

/// Summary of a savegame stored in [`INFO_FILE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavegameInfo {
    /// Format version. Files written before versioning read as 0.
    #[serde(default)]
    pub version: u32,
    /// Name the player gave the save.
    pub name: String,
    /// World the player saved in.
    pub world: String,
    /// Total play time in seconds.
    #[serde(rename = "timePlayed")]
    pub time_played: f64,
}

impl SavegameInfo {
    /// Version written by this engine.
    pub const LATEST_KNOWN_VERSION: u32 = 1;

    /// Create info stamped with the latest version.
    pub fn new(name: impl Into<String>, world: impl Into<String>, time_played: f64) -> Self {
        Self {
            version: Self::LATEST_KNOWN_VERSION,
            name: name.into(),
            world: world.into(),
            time_played,
        }
    }
}

/// Everything written when saving into a slot.
#[derive(Debug, Clone)]
pub struct SlotSnapshot {
    /// Slot summary.
    pub info: SavegameInfo,
    /// Document of the world the player is in.
    pub world: Value,
    /// Player document.
    pub player: Value,
    /// Script-engine document.
    pub script_engine: Value,
    /// Conversation-engine document.
    pub dialog_manager: Value,
}

/// Documents read back from a slot.
///
/// Auxiliary documents that are missing or malformed are `Value::Null`.
#[derive(Debug, Clone)]
pub struct LoadedSlot {
    /// Slot the documents were read from.
    pub slot: SlotIndex,
    /// Slot summary.
    pub info: SavegameInfo,
    /// Document of the saved world.
    pub world: Value,
    /// Player document.
    pub player: Value,
    /// Script-engine document.
    pub script_engine: Value,
    /// Conversation-engine document.
    pub dialog_manager: Value,
}

/// Save slots on top of a [`Storage`].
#[derive(Debug)]
pub struct SaveSlots<S> {
    storage: S,
    max_slots: usize,
}

impl SaveSlots<FsStorage> {
    /// Slots on the local filesystem as described by `config`.
    pub fn on_disk(config: SaveConfig) -> Self {
        let max_slots = config.max_slots;
        Self::new(FsStorage::new(config), max_slots)
    }
}

impl<S: Storage> SaveSlots<S> {
    /// Slots `0..max_slots` on top of `storage`. At least one slot is kept.
    pub fn new(storage: S, max_slots: usize) -> Self {
        Self {
            storage,
            max_slots: max_slots.max(1),
        }
    }

    /// The backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The backing storage (mutable).
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Number of usable slots.
    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    /// Whether the slot holds a savegame (a non-empty info file).
    pub fn is_available(&self, slot: SlotIndex) -> bool {
        self.storage.blob_size(slot, INFO_FILE) > 0
    }

    /// Read the slot info. Missing or malformed info reads as `None`.
    pub fn read_info(&self, slot: SlotIndex) -> Option<SavegameInfo> {
        let bytes = self.storage.read_blob(slot, INFO_FILE)?;
        tracing::info!(slot = %slot, "Reading savegame-info");
        match serde_json::from_slice(&bytes) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(slot = %slot, error = %e, "Malformed savegame-info");
                None
            }
        }
    }

    /// Write the slot info, always stamped with the latest version.
    pub fn write_info(&mut self, slot: SlotIndex, info: &SavegameInfo) -> SaveResult<()> {
        let info = SavegameInfo {
            version: SavegameInfo::LATEST_KNOWN_VERSION,
            ..info.clone()
        };
        let bytes = serde_json::to_vec_pretty(&info)?;
        self.storage.write_blob(slot, INFO_FILE, &bytes)
    }

    /// Read `<player>.json`.
    pub fn read_player(&self, slot: SlotIndex, player: &str) -> Option<Value> {
        self.read_document(slot, &format!("{player}.json"))
    }

    /// Write `<player>.json`.
    pub fn write_player(&mut self, slot: SlotIndex, player: &str, doc: &Value) -> SaveResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        self.storage.write_blob(slot, &format!("{player}.json"), &bytes)
    }

    /// Read `world_<world>.json`.
    pub fn read_world(&self, slot: SlotIndex, world: &str) -> Option<Value> {
        self.read_document(slot, &world_file(world))
    }

    /// Write `world_<world>.json`.
    pub fn write_world(&mut self, slot: SlotIndex, world: &str, doc: &Value) -> SaveResult<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        self.storage.write_blob(slot, &world_file(world), &bytes)
    }

    /// Read the script-engine document.
    pub fn read_script_engine(&self, slot: SlotIndex) -> Option<Value> {
        self.read_document(slot, SCRIPT_ENGINE_FILE)
    }

    /// Write the script-engine document.
    pub fn write_script_engine(&mut self, slot: SlotIndex, doc: &Value) -> SaveResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        self.storage.write_blob(slot, SCRIPT_ENGINE_FILE, &bytes)
    }

    /// Read the conversation-engine document.
    pub fn read_dialog_manager(&self, slot: SlotIndex) -> Option<Value> {
        self.read_document(slot, DIALOG_MANAGER_FILE)
    }

    /// Write the conversation-engine document.
    pub fn write_dialog_manager(&mut self, slot: SlotIndex, doc: &Value) -> SaveResult<()> {
        let bytes = serde_json::to_vec(doc)?;
        self.storage.write_blob(slot, DIALOG_MANAGER_FILE, &bytes)
    }

    /// Names of the worlds saved in the slot (non-empty `world_*.json` files).
    pub fn worlds(&self, slot: SlotIndex) -> Vec<String> {
        self.storage
            .blob_names(slot)
            .into_iter()
            .filter(|name| self.storage.blob_size(slot, name) > 0)
            .filter_map(|name| {
                name.strip_prefix("world_")
                    .and_then(|rest| rest.strip_suffix(".json"))
                    .map(str::to_string)
            })
            .collect()
    }

    /// Empty every engine-written file in the slot.
    ///
    /// Files are truncated, not deleted. Files not matching a known prefix are
    /// left alone, and an unused slot is not touched at all. Returns the number
    /// of files truncated.
    pub fn clear_slot(&mut self, slot: SlotIndex) -> usize {
        if !self.is_available(slot) {
            tracing::debug!(slot = %slot, "Slot not in use, nothing to clear");
            return 0;
        }

        let mut cleared = 0;
        for name in self.storage.blob_names(slot) {
            if !is_clearable(&name) {
                continue;
            }
            match self.storage.truncate_blob(slot, &name) {
                Ok(()) => cleared += 1,
                Err(e) => tracing::warn!(slot = %slot, file = %name, error = %e, "Failed to clear file"),
            }
        }
        tracing::info!(slot = %slot, cleared, "Cleared savegame");
        cleared
    }

    /// Save name per slot, `None` for unused slots.
    pub fn gather_available(&self) -> Vec<Option<String>> {
        let names: Vec<Option<String>> = (0..self.max_slots)
            .map(SlotIndex)
            .map(|slot| {
                if self.is_available(slot) {
                    self.read_info(slot).map(|info| info.name)
                } else {
                    None
                }
            })
            .collect();
        tracing::info!(available = names.iter().flatten().count(), "Available savegames");
        names
    }

    /// Write a complete savegame into the slot.
    pub fn save_slot(&mut self, slot: SlotIndex, snapshot: &SlotSnapshot) -> SaveResult<()> {
        self.check_range(slot)?;
        self.write_world(slot, &snapshot.info.world, &snapshot.world)?;
        self.write_player(slot, DEFAULT_PLAYER, &snapshot.player)?;
        self.write_script_engine(slot, &snapshot.script_engine)?;
        self.write_dialog_manager(slot, &snapshot.dialog_manager)?;
        // Written last: a slot only counts as used once everything else is on disk.
        self.write_info(slot, &snapshot.info)
    }

    /// Read every document of a savegame.
    pub fn load_slot(&self, slot: SlotIndex) -> SaveResult<LoadedSlot> {
        self.check_range(slot)?;
        if !self.is_available(slot) {
            return Err(SaveError::SlotUnavailable(slot));
        }
        let info = self.read_info(slot).ok_or(SaveError::SlotUnavailable(slot))?;

        // A missing world file would silently start the world fresh.
        let world_name = world_file(&info.world);
        let world_bytes = self
            .storage
            .read_blob(slot, &world_name)
            .ok_or_else(|| SaveError::InvalidWorldFile(world_name.clone()))?;
        let world = serde_json::from_slice(&world_bytes)?;

        let player = self.read_player(slot, DEFAULT_PLAYER).unwrap_or(Value::Null);
        let script_engine = self.read_script_engine(slot).unwrap_or(Value::Null);
        let dialog_manager = self.read_dialog_manager(slot).unwrap_or(Value::Null);

        Ok(LoadedSlot {
            slot,
            info,
            world,
            player,
            script_engine,
            dialog_manager,
        })
    }

    fn check_range(&self, slot: SlotIndex) -> SaveResult<()> {
        if slot.0 >= self.max_slots {
            return Err(SaveError::SlotOutOfRange {
                slot,
                max: self.max_slots,
            });
        }
        Ok(())
    }

    fn read_document(&self, slot: SlotIndex, name: &str) -> Option<Value> {
        let bytes = self.storage.read_blob(slot, name)?;
        match serde_json::from_slice(&bytes) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(slot = %slot, file = %name, error = %e, "Malformed save document");
                None
            }
        }
    }
}

fn world_file(world: &str) -> String {
    format!("world_{world}.json")
}

fn is_clearable(name: &str) -> bool {
    name.ends_with(".json") && CLEARABLE_PREFIXES.iter().any(|p| name.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn slots() -> SaveSlots<MemoryStorage> {
        SaveSlots::new(MemoryStorage::new(), 5)
    }

    fn snapshot() -> SlotSnapshot {
        SlotSnapshot {
            info: SavegameInfo::new("Before the mine", "newworld", 3600.0),
            world: json!({ "vobs": [] }),
            player: json!({ "name": "hero" }),
            script_engine: json!({ "globals": {} }),
            dialog_manager: json!({ "version": 1 }),
        }
    }

    #[test]
    fn unused_slot_is_unavailable() {
        let s = slots();
        assert!(!s.is_available(SlotIndex(0)));
        assert!(s.read_info(SlotIndex(0)).is_none());
    }

    #[test]
    fn save_then_load() {
        let mut s = slots();
        s.save_slot(SlotIndex(1), &snapshot()).unwrap();
        assert!(s.is_available(SlotIndex(1)));

        let loaded = s.load_slot(SlotIndex(1)).unwrap();
        assert_eq!(loaded.info.name, "Before the mine");
        assert_eq!(loaded.info.version, SavegameInfo::LATEST_KNOWN_VERSION);
        assert_eq!(loaded.world, json!({ "vobs": [] }));
        assert_eq!(loaded.player["name"], "hero");
        assert_eq!(loaded.dialog_manager["version"], 1);
    }

    #[test]
    fn info_without_version_reads_as_zero() {
        let mut s = slots();
        s.storage_mut()
            .write_blob(
                SlotIndex(0),
                INFO_FILE,
                br#"{"name":"old","world":"w","timePlayed":12.5}"#,
            )
            .unwrap();
        let info = s.read_info(SlotIndex(0)).unwrap();
        assert_eq!(info.version, 0);
        assert_eq!(info.time_played, 12.5);
    }

    #[test]
    fn info_uses_camel_case_time() {
        let mut s = slots();
        s.write_info(SlotIndex(0), &SavegameInfo::new("a", "w", 1.0))
            .unwrap();
        let raw = s.storage().read_blob(SlotIndex(0), INFO_FILE).unwrap();
        let doc: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(doc["timePlayed"], 1.0);
        assert_eq!(doc["version"], 1);
    }

    #[test]
    fn load_out_of_range() {
        let s = slots();
        assert!(matches!(
            s.load_slot(SlotIndex(5)),
            Err(SaveError::SlotOutOfRange { max: 5, .. })
        ));
    }

    #[test]
    fn load_unavailable_slot() {
        let s = slots();
        assert!(matches!(
            s.load_slot(SlotIndex(2)),
            Err(SaveError::SlotUnavailable(SlotIndex(2)))
        ));
    }

    #[test]
    fn load_requires_world_file() {
        let mut s = slots();
        s.write_info(SlotIndex(0), &SavegameInfo::new("a", "lost", 0.0))
            .unwrap();
        let err = s.load_slot(SlotIndex(0)).unwrap_err();
        assert!(matches!(err, SaveError::InvalidWorldFile(ref f) if f == "world_lost.json"));
    }

    #[test]
    fn malformed_auxiliary_documents_load_as_null() {
        let mut s = slots();
        s.save_slot(SlotIndex(0), &snapshot()).unwrap();
        s.storage_mut()
            .write_blob(SlotIndex(0), DIALOG_MANAGER_FILE, b"{not json")
            .unwrap();

        let loaded = s.load_slot(SlotIndex(0)).unwrap();
        assert!(loaded.dialog_manager.is_null());
        assert!(!loaded.script_engine.is_null());
    }

    #[test]
    fn worlds_lists_non_empty_world_files() {
        let mut s = slots();
        let slot = SlotIndex(0);
        s.write_world(slot, "newworld", &json!({})).unwrap();
        s.write_world(slot, "oldworld", &json!({})).unwrap();
        s.storage_mut().write_blob(slot, "world_empty.json", b"").unwrap();

        assert_eq!(s.worlds(slot), vec!["newworld".to_string(), "oldworld".to_string()]);
    }

    #[test]
    fn clear_slot_truncates_only_known_files() {
        let mut s = slots();
        let slot = SlotIndex(0);
        s.save_slot(slot, &snapshot()).unwrap();
        s.write_player(slot, "player_backup", &json!({})).unwrap();
        s.storage_mut().write_blob(slot, "notes.txt", b"keep me").unwrap();
        s.storage_mut().write_blob(slot, "custom.json", b"{}").unwrap();
        s.storage_mut().write_blob(slot, "world_readme.txt", b"keep").unwrap();

        let cleared = s.clear_slot(slot);
        assert_eq!(cleared, 6);

        assert!(!s.is_available(slot));
        assert!(s.read_world(slot, "newworld").is_none());
        assert!(s.read_player(slot, "player_backup").is_none());
        assert!(s.read_dialog_manager(slot).is_none());
        assert!(s.read_script_engine(slot).is_none());
        assert_eq!(s.storage().read_blob(slot, "notes.txt").unwrap(), b"keep me");
        assert_eq!(s.storage().read_blob(slot, "custom.json").unwrap(), b"{}");
        assert_eq!(s.storage().read_blob(slot, "world_readme.txt").unwrap(), b"keep");
        // Truncated, not removed.
        assert!(s.storage().blob_names(slot).contains(&INFO_FILE.to_string()));
    }

    #[test]
    fn clear_unused_slot_touches_nothing() {
        let mut s = slots();
        let slot = SlotIndex(0);
        s.write_player(slot, "player", &json!({ "a": 1 })).unwrap();

        assert_eq!(s.clear_slot(slot), 0);
        assert!(s.read_player(slot, "player").is_some());
    }

    #[test]
    fn gather_available_per_slot() {
        let mut s = slots();
        s.save_slot(SlotIndex(1), &snapshot()).unwrap();
        s.save_slot(SlotIndex(3), &snapshot()).unwrap();

        let names = s.gather_available();
        assert_eq!(names.len(), 5);
        assert_eq!(names[0], None);
        assert_eq!(names[1].as_deref(), Some("Before the mine"));
        assert_eq!(names[3].as_deref(), Some("Before the mine"));
    }

    #[test]
    fn failed_write_keeps_previous_save() {
        let mut s = slots();
        let slot = SlotIndex(0);
        s.save_slot(slot, &snapshot()).unwrap();

        s.storage_mut().set_read_only(true);
        let mut next = snapshot();
        next.player = json!({ "name": "someone else" });
        assert!(s.save_slot(slot, &next).is_err());

        assert_eq!(s.read_player(slot, DEFAULT_PLAYER).unwrap()["name"], "hero");
    }

    #[test]
    fn clearable_names() {
        assert!(is_clearable("regoth_save.json"));
        assert!(is_clearable("world_newworld.json"));
        assert!(is_clearable("player.json"));
        assert!(is_clearable("dialogmanager.json"));
        assert!(is_clearable("scriptengine.json"));
        assert!(!is_clearable("player.txt"));
        assert!(!is_clearable("savegame.json"));
    }
}
