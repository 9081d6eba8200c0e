use colored::Colorize;
use pv_save::SaveConfig;

pub fn run(config: &SaveConfig, slot: usize) -> Result<(), String> {
    let (mut slots, index) = super::open_used_slot(config, slot)?;
    let cleared = slots.clear_slot(index);

    println!(
        "  {} {cleared} file{} in slot {index}",
        "Cleared".green().bold(),
        if cleared == 1 { "" } else { "s" },
    );
    Ok(())
}
