use anyhow::{Context, Result};

use melt_cli::batch::{BatchReport, run_batch};
use melt_cli::config::{LoadedConfig, MeltConfig, default_config_path};
use melt_cli::convert::{ConvertSettings, plan_convert};
use melt_ingest::read_wide_table;
use melt_model::LongTable;
use melt_transform::{TracingObserver, reshape_with_observer};

use crate::cli::{ConvertArgs, PreviewArgs};

pub fn run_convert(args: &ConvertArgs, config: &MeltConfig) -> Result<BatchReport> {
    let settings = ConvertSettings {
        inputs: args.inputs.clone(),
        output_dir: args.output_dir.clone(),
        output_names: args.output_names.clone(),
        prefix: args.prefix.clone(),
        dry_run: args.dry_run,
        jobs: args.jobs.map(usize::from),
        no_bom: args.no_bom,
    };
    let (request, options) = plan_convert(&settings, &config.output)?;
    Ok(run_batch(&request, &config.reshape, &options))
}

pub fn run_preview(args: &PreviewArgs, config: &MeltConfig) -> Result<LongTable> {
    let wide = read_wide_table(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let long = reshape_with_observer(&wide, &config.reshape, &mut TracingObserver)
        .with_context(|| format!("reshape {}", args.input.display()))?;
    Ok(long)
}

pub fn run_config(loaded: &LoadedConfig) -> Result<()> {
    match (&loaded.path, default_config_path()) {
        (Some(path), _) => println!("# Loaded from {}", path.display()),
        (None, Some(path)) => println!("# Built-in defaults (user config file: {})", path.display()),
        (None, None) => println!("# Built-in defaults"),
    }
    print!("{}", loaded.config.to_toml()?);
    Ok(())
}
