//! Integration tests for ddp-gen
//!
//! Runs the built binary: generate -> read back -> validate

use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn ddp_gen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ddp-gen"))
        .args(args)
        .output()
        .expect("Failed to run ddp-gen")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn test_generate_writes_valid_package() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("lib/firmware/intel/ice/ddp/ice.pkg");

    let out = ddp_gen(&["generate", path_str(&pkg_path)]);
    assert!(out.status.success(), "generate failed: {}", String::from_utf8_lossy(&out.stderr));
    assert!(pkg_path.exists(), "package file should exist");

    let data = std::fs::read(&pkg_path).expect("Failed to read package");
    assert_eq!(data.len(), ice_ddp::PACKAGE_SIZE);
    assert_eq!(data, ice_ddp::encode_package());
    ice_ddp::validate_package(&data).expect("written package should validate");

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Package validated successfully:"));
    assert!(stdout.contains("Written 4252 bytes to"));
}

#[test]
fn test_validate_generated_package() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("ice.pkg");

    assert!(ddp_gen(&["generate", path_str(&pkg_path)]).status.success());

    let out = ddp_gen(&["validate", path_str(&pkg_path)]);
    assert!(out.status.success(), "validate failed: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ICE seg at offset 100, size 4152"));
    assert!(stdout.contains("name=ICE OS Default Package"));
}

#[test]
fn test_validate_rejects_truncated_package() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("short.pkg");

    let mut data = ice_ddp::encode_package();
    data.truncate(ice_ddp::PACKAGE_SIZE - 1);
    std::fs::write(&pkg_path, &data).expect("Failed to write package");

    let out = ddp_gen(&["validate", path_str(&pkg_path)]);
    assert!(!out.status.success(), "truncated package should be rejected");
    assert!(String::from_utf8_lossy(&out.stderr).contains("segment out of bounds"));
}

#[test]
fn test_validate_missing_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = ddp_gen(&["validate", path_str(&dir.path().join("missing.pkg"))]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read package"));
}

#[test]
fn test_json_report() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("ice.pkg");

    let out = ddp_gen(&["generate", path_str(&pkg_path), "--json"]);
    assert!(out.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be a JSON report");
    assert_eq!(report["total_size"], 4252);
    assert_eq!(report["segment_count"], 2);
    assert_eq!(report["package_name"], "ICE OS Default Package");
    assert_eq!(report["device_segment"]["offset"], 100);
}

#[test]
fn test_json_validation_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("bad.pkg");

    let mut data = ice_ddp::encode_package();
    data[4..8].copy_from_slice(&3u32.to_le_bytes());
    std::fs::write(&pkg_path, &data).expect("Failed to write package");

    let out = ddp_gen(&["validate", path_str(&pkg_path), "--json"]);
    assert!(!out.status.success());

    let err: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be a JSON error");
    assert_eq!(err["kind"], "MalformedHeader");
    assert_eq!(err["offset"], 4);
}

#[test]
fn test_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("ddp.toml");
    let pkg_path = dir.path().join("ice.pkg");
    std::fs::write(
        &config_path,
        "[package]\nname = \"Lab Package\"\ndevice_segment_id = \"Lab Configuration\"\n",
    )
    .expect("Failed to write config");

    let out = ddp_gen(&["generate", path_str(&pkg_path), "--config", path_str(&config_path)]);
    assert!(out.status.success(), "generate failed: {}", String::from_utf8_lossy(&out.stderr));

    let data = std::fs::read(&pkg_path).expect("Failed to read package");
    let config = ice_ddp::PackageConfig {
        device_segment_id: "Lab Configuration".to_string(),
        ..ice_ddp::PackageConfig::with_name("Lab Package")
    };
    let report = ice_ddp::validate_package_with(&data, &config).expect("package should validate");
    assert_eq!(report.package_name, "Lab Package");
    assert_eq!(report.device_segment.segment_id, "Lab Configuration");

    // Checked against the stock name, the custom package is rejected
    let out = ddp_gen(&["validate", path_str(&pkg_path)]);
    assert!(!out.status.success());

    let out = ddp_gen(&["validate", path_str(&pkg_path), "--name", "Lab Package"]);
    assert!(out.status.success());
}

#[test]
fn test_strict_names_writes_nothing() {
    let dir = tempdir().expect("Failed to create temp dir");
    let pkg_path = dir.path().join("ice.pkg");
    let long_name = "A package name that is far too long for the field";

    let out = ddp_gen(&["generate", path_str(&pkg_path), "--name", long_name, "--strict-names"]);
    assert!(!out.status.success(), "long name should be rejected");
    assert!(!pkg_path.exists(), "nothing should be written on failure");

    // Default policy truncates instead
    let out = ddp_gen(&["generate", path_str(&pkg_path), "--name", long_name]);
    assert!(out.status.success());
    assert!(pkg_path.exists());
}
