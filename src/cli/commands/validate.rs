//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use tickflow_config::load_config;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Data dir: {}", config.replay.data_dir);
            match config.replay.history_limit {
                Some(limit) => println!("History limit: {} pairs", limit),
                None => println!("History limit: unbounded"),
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
