//! Level-1 replay command.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::info;

use tickflow_config::{load_config, AppConfig};
use tickflow_core::{Indicator, IndicatorPayload, Level1Field};
use tickflow_data::Level1CsvSource;
use tickflow_indicators::Level1Indicator;

use crate::cli::QuotesArgs;

pub fn run(args: QuotesArgs, config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        load_config(config_path).context("loading configuration")?
    } else {
        AppConfig::default()
    };

    let field: Level1Field = args.field.parse().map_err(|e: String| anyhow!(e))?;
    let mut extractor = Level1Indicator::new(field);
    extractor.set_history_limit(config.replay.history_limit);

    let data = super::resolve_data_path(&args.data, &config.replay.data_dir);
    let updates = Level1CsvSource::new(&data)?.load_all()?;
    info!(field = %field, updates = updates.len(), "starting quote replay");

    let mut extracted = 0usize;
    let mut skipped = 0usize;
    let mut last = None;
    for update in updates {
        let mut input = extractor.create_value(IndicatorPayload::Level1(update));
        input.set_final(true);

        let result = extractor.process(&input)?;
        if result.is_empty() {
            skipped += 1;
        } else {
            extracted += 1;
            last = Some(result.decimal()?);
        }
    }

    println!("Quote replay complete: {} ({})", extractor.name(), field);
    println!("  extracted: {}", extracted);
    println!("  absent:    {}", skipped);
    println!("  formed:    {}", extractor.is_formed());
    if let Some(value) = last {
        println!("  last:      {}", value);
    }

    Ok(())
}
