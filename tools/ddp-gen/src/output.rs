use anyhow::{Context, Result};
use ice_ddp::{ValidationError, ValidationReport};
use std::path::Path;

/// Write the package, creating missing parent directories
pub fn write_package(output_path: &Path, package: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(output_path, package)
        .with_context(|| format!("Failed to write package: {}", output_path.display()))?;
    Ok(())
}

pub fn print_report(report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        println!("{}", report);
    }
    Ok(())
}

pub fn print_error(err: &ValidationError, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(err).context("Failed to serialize error")?;
        println!("{}", text);
    }
    Ok(())
}
