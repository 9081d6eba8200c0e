use comfy_table::{ContentArrangement, Table};
use pv_core::SlotIndex;
use pv_save::{SaveConfig, SaveSlots};

pub fn run(config: &SaveConfig) -> Result<(), String> {
    let slots = SaveSlots::on_disk(config.clone());
    let names = slots.gather_available();
    let used = names.iter().flatten().count();

    if used == 0 {
        println!("  No savegames in {}", config.game_dir().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Slot", "Name", "World", "Time played"]);

    for (index, name) in names.iter().enumerate() {
        let Some(name) = name else {
            continue;
        };
        let (world, time) = slots
            .read_info(SlotIndex(index))
            .map(|info| (info.world, super::format_time_played(info.time_played)))
            .unwrap_or_default();
        table.add_row(vec![index.to_string(), name.clone(), world, time]);
    }

    println!("{table}");
    println!();
    println!("  {used} of {} slots in use", names.len());

    Ok(())
}
