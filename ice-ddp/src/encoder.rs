//! Package encoder
//!
//! Builds the package bottom-up: metadata section, buffer, ICE segment,
//! metadata segment, then the package header once every segment size is known.

use crate::buffer::{MetadataSection, PkgBuffer};
use crate::config::PackageConfig;
use crate::error::EncodeError;
use crate::header::PackageHeader;
use crate::name::FixedName;
use crate::segment::{DeviceSegment, MetadataSegment};
use crate::{
    DEFAULT_DEVICE_SEGMENT_ID, DEFAULT_METADATA_SEGMENT_ID, DEFAULT_PACKAGE_NAME,
    META_SECT_NAME_SIZE, PKG_NAME_SIZE,
};

/// Encoder holding every name already fitted to its field
///
/// Construction performs all checks, so [`PackageEncoder::encode`] cannot fail
/// and never produces partial output.
#[derive(Debug, Clone)]
pub struct PackageEncoder {
    package_name: FixedName<PKG_NAME_SIZE>,
    section_name: FixedName<META_SECT_NAME_SIZE>,
    metadata_segment_id: FixedName<PKG_NAME_SIZE>,
    device_segment_id: FixedName<PKG_NAME_SIZE>,
}

impl Default for PackageEncoder {
    fn default() -> Self {
        let package_name = FixedName::truncated(DEFAULT_PACKAGE_NAME);
        Self {
            package_name,
            section_name: package_name.resize(),
            metadata_segment_id: FixedName::truncated(DEFAULT_METADATA_SEGMENT_ID),
            device_segment_id: FixedName::truncated(DEFAULT_DEVICE_SEGMENT_ID),
        }
    }
}

impl PackageEncoder {
    /// Fit the configured names into their fields
    ///
    /// The package name is stored twice: 32 bytes in the metadata segment and
    /// 28 bytes in the metadata section. Each copy is fitted under the
    /// configured policy: `Truncate` warns once per field it cuts, `Reject`
    /// fails on the first field that is too small.
    pub fn new(config: &PackageConfig) -> Result<Self, EncodeError> {
        let policy = config.name_policy;
        let name = &config.package_name;

        Ok(Self {
            package_name: FixedName::new("package_name", name, policy)?,
            section_name: FixedName::new("metadata section name", name, policy)?,
            metadata_segment_id: FixedName::new(
                "metadata_segment_id",
                &config.metadata_segment_id,
                policy,
            )?,
            device_segment_id: FixedName::new(
                "device_segment_id",
                &config.device_segment_id,
                policy,
            )?,
        })
    }

    /// Produce the complete package
    pub fn encode(&self) -> Vec<u8> {
        let section = MetadataSection::new(self.section_name);
        let buffer = PkgBuffer::with_metadata(&section);
        let device = DeviceSegment::new(self.device_segment_id, buffer);
        let metadata = MetadataSegment::new(self.metadata_segment_id, self.package_name);

        let metadata_offset = PackageHeader::SIZE;
        let device_offset = metadata_offset + MetadataSegment::SIZE;
        let header = PackageHeader::new([metadata_offset as u32, device_offset as u32]);

        let mut package = Vec::with_capacity(device_offset + DeviceSegment::SIZE);
        package.extend_from_slice(&header.to_bytes());
        package.extend_from_slice(&metadata.to_bytes());
        package.extend_from_slice(&device.to_bytes());

        tracing::debug!(
            "encoded package '{}': {} bytes, segments at {:?}",
            self.package_name,
            package.len(),
            header.segment_offsets
        );

        package
    }
}

/// Encode the stock package ("ICE OS Default Package")
pub fn encode_package() -> Vec<u8> {
    PackageEncoder::default().encode()
}

/// Encode a package with caller-supplied names
pub fn encode_package_with(config: &PackageConfig) -> Result<Vec<u8>, EncodeError> {
    Ok(PackageEncoder::new(config)?.encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamePolicy, PACKAGE_SIZE, PackageHeader, SegmentHeader};

    #[test]
    fn test_default_encoder_matches_default_config() {
        let from_config = encode_package_with(&PackageConfig::default()).unwrap();
        assert_eq!(encode_package(), from_config);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(encode_package(), encode_package());
    }

    #[test]
    fn test_size_and_offsets() {
        let package = encode_package();
        assert_eq!(package.len(), PACKAGE_SIZE);

        let header = PackageHeader::from_bytes(&package).unwrap();
        assert_eq!(header.segment_offsets, [16, 100]);
    }

    #[test]
    fn test_segment_sizes_are_contiguous() {
        let package = encode_package();
        let header = PackageHeader::from_bytes(&package).unwrap();

        let meta = SegmentHeader::from_bytes(&package[16..]).unwrap();
        let device = SegmentHeader::from_bytes(&package[100..]).unwrap();

        assert_eq!(header.segment_offsets[0] + meta.segment_size, header.segment_offsets[1]);
        assert_eq!(
            header.segment_offsets[1] as usize + device.segment_size as usize,
            package.len()
        );
    }

    #[test]
    fn test_long_name_is_truncated_in_place() {
        let long = "A".repeat(40);
        let package = encode_package_with(&PackageConfig::with_name(long)).unwrap();
        assert_eq!(package.len(), PACKAGE_SIZE);

        // metadata segment body: pkg_ver (4) + rsvd (4) + name (32), ends at the ICE segment
        assert_eq!(&package[68..100], "A".repeat(32).as_bytes());
        assert_eq!(&package[100..104], &0x10u32.to_le_bytes());
    }

    #[test]
    fn test_reject_policy_fails_before_output() {
        let config = PackageConfig {
            package_name: "x".repeat(29),
            name_policy: NamePolicy::Reject,
            ..Default::default()
        };
        assert_eq!(
            encode_package_with(&config),
            Err(EncodeError::NameTooLong {
                field: "metadata section name",
                len: 29,
                max: 28,
            })
        );

        let config = PackageConfig {
            package_name: "x".repeat(33),
            name_policy: NamePolicy::Reject,
            ..Default::default()
        };
        assert!(matches!(
            encode_package_with(&config),
            Err(EncodeError::NameTooLong {
                field: "package_name",
                ..
            })
        ));
    }

    #[test]
    fn test_section_name_is_prefix_of_package_name() {
        let name = "0123456789012345678901234567890";
        let package = encode_package_with(&PackageConfig::with_name(name)).unwrap();

        // metadata segment pkg_name
        assert_eq!(&package[68..99], name.as_bytes());
        assert_eq!(package[99], 0);
        // metadata section name: buffer at 156, section at +12, name at +4
        assert_eq!(&package[172..200], &name.as_bytes()[..28]);
    }

    #[test]
    fn test_name_between_section_and_segment_width() {
        let name = "A".repeat(30);

        let config = PackageConfig::with_name(name.clone());
        let package = encode_package_with(&config).unwrap();
        assert_eq!(&package[68..98], name.as_bytes());
        assert_eq!(&package[172..200], "A".repeat(28).as_bytes());
        assert_eq!(&package[200..204], &0u32.to_le_bytes());

        let config = PackageConfig {
            name_policy: NamePolicy::Reject,
            ..config
        };
        assert_eq!(
            encode_package_with(&config),
            Err(EncodeError::NameTooLong {
                field: "metadata section name",
                len: 30,
                max: 28,
            })
        );
    }
}
