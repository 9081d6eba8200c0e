use colored::Colorize;
use pv_core::ActorId;
use pv_dialog::{DialogManager, HeadlessUi};
use pv_save::SaveConfig;

pub fn run(config: &SaveConfig, slot: usize) -> Result<(), String> {
    let (slots, index) = super::open_used_slot(config, slot)?;
    let info = slots
        .read_info(index)
        .ok_or_else(|| format!("savegame info in slot {index} is unreadable"))?;

    println!("  {} [slot {index}]", info.name.bold());
    println!(
        "  {}",
        slots.storage().config().slot_dir(index.0).display().to_string().dimmed()
    );
    println!();
    println!("  version:     {}", info.version);
    println!("  world:       {}", info.world);
    println!("  time played: {}", super::format_time_played(info.time_played));

    let worlds = slots.worlds(index);
    if !worlds.is_empty() {
        println!("  world files: {}", worlds.join(", "));
    }

    // Restored the way a running game would, so the forced-idle flags show.
    let mut dialog = DialogManager::new(ActorId::default(), Box::new(HeadlessUi::new()));
    println!();
    println!("  {}", "Conversation".bold().underline());
    if !dialog.restore_from_slot(&slots, index) {
        println!("  (none)");
        return Ok(());
    }

    let doc = dialog.export_document();
    let target = doc
        .target
        .map_or_else(|| "-".to_string(), |t| t.to_string());
    println!("  target:            {target}");
    println!("  dialog active:     {}", doc.dialog_active);
    println!("  talking:           {}", doc.talking);
    println!("  sub-dialog active: {}", doc.sub_dialog_active);

    if doc.important_known.is_empty() {
        println!("  important topics:  (none)");
    } else {
        println!("  important topics:");
        for topic in &doc.important_known {
            println!("    - {topic}");
        }
    }

    Ok(())
}
