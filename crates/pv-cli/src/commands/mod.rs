pub mod clear;
pub mod show;
pub mod slots;

use pv_core::SlotIndex;
use pv_save::{FsStorage, SaveConfig, SaveError, SaveSlots};

/// Open the on-disk slots and check that `slot` holds a savegame.
fn open_used_slot(config: &SaveConfig, slot: usize) -> Result<(SaveSlots<FsStorage>, SlotIndex), String> {
    let slots = SaveSlots::on_disk(config.clone());
    let index = SlotIndex(slot);
    if slot >= slots.max_slots() {
        return Err(SaveError::SlotOutOfRange {
            slot: index,
            max: slots.max_slots(),
        }
        .to_string());
    }
    if !slots.is_available(index) {
        return Err(SaveError::SlotUnavailable(index).to_string());
    }
    Ok((slots, index))
}

/// Format seconds as `h:mm:ss`.
fn format_time_played(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}
