//! Configuration for save-slot storage.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Where save slots live and how many there are.
#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// User-data root directory.
    pub root: PathBuf,
    /// Game-specific folder below the root.
    pub game_folder: String,
    /// Number of save slots offered to the player.
    pub max_slots: usize,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::from_user_data()
    }
}

impl SaveConfig {
    /// Configuration rooted at the per-user data directory, falling back to the
    /// current directory on platforms without one.
    pub fn from_user_data() -> Self {
        let root = ProjectDirs::from("", "", "palaver")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            root,
            game_folder: "Gothic 2".to_string(),
            max_slots: 20,
        }
    }

    /// Set the user-data root directory.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the game-specific folder name.
    pub fn with_game_folder(mut self, folder: impl Into<String>) -> Self {
        self.game_folder = folder.into();
        self
    }

    /// Set the number of slots (at least one).
    pub fn with_max_slots(mut self, slots: usize) -> Self {
        self.max_slots = slots.max(1);
        self
    }

    /// Directory holding every slot of this game.
    pub fn game_dir(&self) -> PathBuf {
        self.root.join(&self.game_folder)
    }

    /// Directory of a single slot: `<root>/<game_folder>/savegame_<idx>`.
    pub fn slot_dir(&self, slot: usize) -> PathBuf {
        self.game_dir().join(format!("savegame_{slot}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = SaveConfig::default();
        assert_eq!(cfg.game_folder, "Gothic 2");
        assert_eq!(cfg.max_slots, 20);
    }

    #[test]
    fn builder_methods() {
        let cfg = SaveConfig::default()
            .with_root("/tmp/saves")
            .with_game_folder("Gothic")
            .with_max_slots(15);
        assert_eq!(cfg.root, PathBuf::from("/tmp/saves"));
        assert_eq!(cfg.game_folder, "Gothic");
        assert_eq!(cfg.max_slots, 15);
    }

    #[test]
    fn max_slots_clamped() {
        let cfg = SaveConfig::default().with_max_slots(0);
        assert_eq!(cfg.max_slots, 1);
    }

    #[test]
    fn slot_dir_layout() {
        let cfg = SaveConfig::default().with_root("/data").with_game_folder("Gothic");
        assert_eq!(cfg.slot_dir(3), PathBuf::from("/data/Gothic/savegame_3"));
    }
}
