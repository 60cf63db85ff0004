//! Candle replay command.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use tickflow_config::{load_config, AppConfig};
use tickflow_core::{Indicator, IndicatorPayload, SettingsStorage, ValueKind};
use tickflow_data::CandleCsvSource;
use tickflow_indicators::IndicatorRegistry;

use crate::cli::ReplayArgs;

pub fn run(args: ReplayArgs, config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        load_config(config_path).context("loading configuration")?
    } else {
        AppConfig::default()
    };

    let registry = IndicatorRegistry::new();
    let mut indicator = registry.create(&args.indicator)?;

    if indicator.input_kind() == ValueKind::Level1 {
        bail!(
            "indicator '{}' consumes level-1 data; use the quotes command",
            args.indicator
        );
    }

    if let Some(length) = args.length {
        apply_length(indicator.as_mut(), length, &args.indicator)?;
    }

    let history_limit = args.history_limit.or(config.replay.history_limit);
    indicator.set_history_limit(history_limit);

    let data = super::resolve_data_path(&args.data, &config.replay.data_dir);
    let candles = CandleCsvSource::new(&data)?.load_all()?;
    info!(
        indicator = %indicator.name(),
        warmup = indicator.warmup_period(),
        candles = candles.len(),
        "starting replay"
    );

    let mut formed_at = None;
    let mut last = None;
    for (n, candle) in candles.into_iter().enumerate() {
        let mut input = indicator.create_value(IndicatorPayload::Candle(candle));
        input.set_final(true);

        let result = indicator.process(&input)?;
        if formed_at.is_none() && indicator.is_formed() {
            formed_at = Some(n + 1);
        }
        if !result.is_empty() {
            last = Some(result.decimal()?);
        }
    }

    println!("Replay complete: {}", indicator.name());
    println!("  measure:      {}", indicator.measure());
    println!("  history:      {} pairs", indicator.container().len());
    match formed_at {
        Some(n) => println!("  formed after: {} final candles", n),
        None => println!(
            "  not formed ({} final candles needed)",
            indicator.warmup_period()
        ),
    }
    if let Some(value) = last {
        println!("  last value:   {}", value);
    }

    if let Some(path) = args.save_settings {
        let mut storage = SettingsStorage::new();
        indicator.save(&mut storage)?;
        let json = serde_json::to_string_pretty(&storage)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        println!("  settings:     saved to {}", path.display());
    }

    Ok(())
}

/// Rewrite the length key through the persistence path, so the
/// override works uniformly for every kind that has one.
fn apply_length(indicator: &mut dyn Indicator, length: usize, kind: &str) -> Result<()> {
    let mut storage = SettingsStorage::new();
    indicator.save(&mut storage)?;
    if !storage.contains("length") {
        bail!("indicator '{}' has no length setting", kind);
    }
    storage.set("length", length)?;
    indicator.load(&storage)?;
    Ok(())
}
