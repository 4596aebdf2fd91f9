//! Planning a convert run from command-line choices and the config file.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};

use crate::batch::{BatchOptions, BatchRequest};
use crate::config::OutputSettings;

/// Command-line choices for `convert`. Unset values fall back to the
/// `[output]` section of the configuration.
#[derive(Debug, Clone, Default)]
pub struct ConvertSettings {
    /// Files or directories to convert.
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Explicit output names, one per expanded input. Empty means defaults.
    pub output_names: Vec<String>,
    pub prefix: Option<String>,
    pub dry_run: bool,
    pub jobs: Option<usize>,
    /// Turn off the CSV byte order mark regardless of the config.
    pub no_bom: bool,
}

/// Expands the inputs and builds the batch request and options.
pub fn plan_convert(
    settings: &ConvertSettings,
    output: &OutputSettings,
) -> Result<(BatchRequest, BatchOptions)> {
    let inputs = melt_ingest::expand_inputs(&settings.inputs).context("collect input files")?;
    ensure!(!inputs.is_empty(), "no supported input files found");
    tracing::info!(files = inputs.len(), "inputs collected");

    let request = if settings.output_names.is_empty() {
        let prefix = settings.prefix.as_deref().unwrap_or(&output.prefix);
        BatchRequest::from_inputs(&settings.output_dir, &inputs, prefix)
    } else {
        BatchRequest::with_output_names(&settings.output_dir, &inputs, &settings.output_names)?
    };

    let mut write = output.write_options();
    if settings.no_bom {
        write.csv_bom = false;
    }
    let options = BatchOptions {
        dry_run: settings.dry_run,
        jobs: settings.jobs.unwrap_or(output.jobs),
        write,
    };
    Ok((request, options))
}
