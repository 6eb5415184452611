//! Validate command: check an existing package file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::manifest::ConfigArgs;
use crate::output;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Package file to check
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the report (or the first failure) as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate command
pub fn execute(args: ValidateArgs) -> Result<()> {
    let config = args.config.resolve(false)?;

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read package: {}", args.input.display()))?;
    tracing::debug!("read {} bytes from {}", data.len(), args.input.display());

    match ice_ddp::validate_package_with(&data, &config) {
        Ok(report) => output::print_report(&report, args.json),
        Err(err) => {
            output::print_error(&err, args.json)?;
            Err(err).with_context(|| format!("{} is not a valid package", args.input.display()))
        }
    }
}
