//! List indicators command.

use anyhow::Result;
use tickflow_indicators::IndicatorRegistry;

pub fn run() -> Result<()> {
    let registry = IndicatorRegistry::new();

    println!("Available Indicators");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    let mut keys = registry.keys();
    keys.sort();
    for key in keys {
        if let Some(info) = registry.get(key) {
            println!("  {} ({})", info.name, key);
            println!("  ───────────────────────────────────────────────────────");
            println!("  {}", info.description);
            println!();
        }
    }

    println!("Use --indicator <key> with the replay command.");

    Ok(())
}
