//! ddp.toml config parsing
//!
//! Shared by the generate and validate commands. Command-line flags override
//! values from the file; anything left unset falls back to the stock package.

use anyhow::{Context, Result};
use clap::Args;
use ice_ddp::{NamePolicy, PackageConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// ddp.toml structure
#[derive(Debug, Default, Deserialize)]
pub struct DdpManifest {
    #[serde(default)]
    pub package: PackageSection,
}

/// Package naming section
#[derive(Debug, Default, Deserialize)]
pub struct PackageSection {
    /// Package name (metadata segment and metadata section)
    pub name: Option<String>,
    /// Label of the metadata segment
    pub metadata_segment_id: Option<String>,
    /// Label of the ICE E810 segment
    pub device_segment_id: Option<String>,
    /// Fail on names that do not fit instead of truncating them.
    /// Default: false
    #[serde(default)]
    pub strict_names: bool,
}

impl DdpManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse ddp.toml")
    }

    /// Reject values the encoder would accept but the driver cannot use
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("package.name", &self.package.name),
            ("package.metadata_segment_id", &self.package.metadata_segment_id),
            ("package.device_segment_id", &self.package.device_segment_id),
        ];
        for (key, value) in fields {
            if value.as_deref().is_some_and(str::is_empty) {
                anyhow::bail!("{} must not be empty", key);
            }
        }
        Ok(())
    }

    /// Encoder config with defaults for every unset key
    pub fn to_config(&self) -> PackageConfig {
        let mut config = PackageConfig::default();
        if let Some(name) = &self.package.name {
            config.package_name = name.clone();
        }
        if let Some(id) = &self.package.metadata_segment_id {
            config.metadata_segment_id = id.clone();
        }
        if let Some(id) = &self.package.device_segment_id {
            config.device_segment_id = id.clone();
        }
        if self.package.strict_names {
            config.name_policy = NamePolicy::Reject;
        }
        config
    }
}

/// Config options shared by every command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Path to a ddp.toml config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Package name (overrides the config file)
    #[arg(short, long)]
    pub name: Option<String>,
}

impl ConfigArgs {
    /// Merge the config file (if any) with command-line overrides
    pub fn resolve(&self, strict_names: bool) -> Result<PackageConfig> {
        let manifest = match &self.config {
            Some(path) => DdpManifest::load(path)?,
            None => DdpManifest::default(),
        };
        manifest.validate()?;

        let mut config = manifest.to_config();
        if let Some(name) = &self.name {
            anyhow::ensure!(!name.is_empty(), "--name must not be empty");
            config.package_name = name.clone();
        }
        if strict_names {
            config.name_policy = NamePolicy::Reject;
        }

        tracing::debug!("package config: {:?}", config);
        Ok(config)
    }
}
