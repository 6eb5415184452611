//! Encoder configuration

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_DEVICE_SEGMENT_ID, DEFAULT_METADATA_SEGMENT_ID, DEFAULT_PACKAGE_NAME};

/// What to do with a name longer than its fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Keep the first bytes that fit and log a warning
    #[default]
    Truncate,
    /// Fail with [`EncodeError::NameTooLong`](crate::EncodeError::NameTooLong)
    Reject,
}

/// Caller-supplied package fields
///
/// Everything else in the package (versions, type tags, table counts) is
/// fixed by the format. The default value reproduces the stock package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Stored in the metadata segment (32 bytes) and the metadata section (28 bytes)
    pub package_name: String,
    /// Label of the metadata segment
    pub metadata_segment_id: String,
    /// Label of the ICE E810 segment
    pub device_segment_id: String,
    /// Policy for names that do not fit
    pub name_policy: NamePolicy,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            metadata_segment_id: DEFAULT_METADATA_SEGMENT_ID.to_string(),
            device_segment_id: DEFAULT_DEVICE_SEGMENT_ID.to_string(),
            name_policy: NamePolicy::Truncate,
        }
    }
}

impl PackageConfig {
    /// Default config with a different package name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            package_name: name.into(),
            ..Default::default()
        }
    }
}
