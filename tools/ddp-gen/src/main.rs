//! ddp-gen - minimal ICE DDP package generator
//!
//! # Commands
//!
//! - `ddp-gen generate [OUTPUT]` - Write a package that passes the `ice` driver's
//!   structural checks (default `ice.pkg`)
//! - `ddp-gen validate <INPUT>` - Check an existing package and print its layout
//!
//! # Usage
//!
//! ```bash
//! # Stock package into the firmware search path
//! ddp-gen generate /lib/firmware/intel/ice/ddp/ice.pkg
//!
//! # Custom package name, failing instead of truncating long names
//! ddp-gen generate out/ice.pkg --name "Lab Package" --strict-names
//!
//! # Inspect a package as JSON
//! ddp-gen validate ice.pkg --json
//! ```
//!
//! # Config (ddp.toml)
//!
//! ```toml
//! [package]
//! name = "ICE OS Default Package"
//! metadata_segment_id = "ICE Metadata"
//! device_segment_id = "ICE Configuration Data"
//! strict_names = false
//! ```

mod generate;
mod manifest;
mod output;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// ddp-gen - minimal ICE DDP package generator
#[derive(Parser)]
#[command(name = "ddp-gen")]
#[command(about = "Generate and check minimal ICE DDP packages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode, self-check and write a package
    Generate(generate::GenerateArgs),

    /// Check an existing package file
    Validate(validate::ValidateArgs),
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Validate(args) => validate::execute(args),
    }
}
