//! Generate command: encode, self-check, then write

use anyhow::{Context, Result};
use clap::Args;
use ice_ddp::{DEFAULT_OUTPUT_FILE, encode_package_with, validate_package_with};
use std::path::PathBuf;

use crate::manifest::ConfigArgs;
use crate::output;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output package path
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Fail on names that do not fit their field instead of truncating
    #[arg(long)]
    pub strict_names: bool,

    /// Print the validation report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the generate command
///
/// The package is validated before anything touches the filesystem, so a
/// failed self-check never leaves a partial or broken file behind.
pub fn execute(args: GenerateArgs) -> Result<()> {
    let config = args.config.resolve(args.strict_names)?;

    let package = encode_package_with(&config).context("Failed to encode package")?;
    let report = validate_package_with(&package, &config)
        .context("Generated package failed validation")?;

    output::write_package(&args.output, &package)?;
    output::print_report(&report, args.json)?;

    if args.json {
        tracing::info!(
            "Written {} bytes to {}",
            package.len(),
            args.output.display()
        );
    } else {
        println!(
            "Written {} bytes to {}",
            package.len(),
            args.output.display()
        );
    }

    Ok(())
}
