//! Metadata and ICE E810 segments

use crate::buffer::PkgBuffer;
use crate::header::SegmentHeader;
use crate::name::FixedName;
use crate::version::PkgVersion;
use crate::{PACKAGE_VERSION, PKG_NAME_SIZE, SEGMENT_TYPE_ICE_E810, SEGMENT_TYPE_METADATA};

/// Global metadata segment (`struct ice_global_metadata_seg`), 84 bytes
///
/// ```text
/// 0x00: SegmentHeader (44 bytes)
/// 0x2C: pkg_ver [u8; 4]
/// 0x30: rsvd u32 LE (0)
/// 0x34: pkg_name [u8; 32]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSegment {
    pub header: SegmentHeader,
    pub package_version: PkgVersion,
    pub package_name: FixedName<PKG_NAME_SIZE>,
}

impl MetadataSegment {
    pub const BODY_SIZE: usize = PkgVersion::SIZE + 4 + PKG_NAME_SIZE;
    pub const SIZE: usize = SegmentHeader::SIZE + Self::BODY_SIZE;

    pub fn new(
        segment_id: FixedName<PKG_NAME_SIZE>,
        package_name: FixedName<PKG_NAME_SIZE>,
    ) -> Self {
        Self {
            header: SegmentHeader::new(SEGMENT_TYPE_METADATA, Self::SIZE as u32, segment_id),
            package_version: PACKAGE_VERSION,
            package_name,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        let body = SegmentHeader::SIZE;
        bytes[..body].copy_from_slice(&self.header.to_bytes());
        bytes[body..body + 4].copy_from_slice(&self.package_version.to_bytes());
        // rsvd stays 0
        bytes[body + 8..].copy_from_slice(self.package_name.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let body = SegmentHeader::SIZE;
        Some(Self {
            header: SegmentHeader::from_bytes(bytes)?,
            package_version: PkgVersion::from_bytes(&bytes[body..])?,
            package_name: FixedName::from_bytes(&bytes[body + 8..])?,
        })
    }
}

/// ICE E810 device configuration segment (`struct ice_seg` + tables)
///
/// ```text
/// 0x00: SegmentHeader (44 bytes)
/// 0x2C: device_table_count u32 LE      (0, no device table follows)
/// 0x30: nvm_table_count u32 LE         (0, no NVM versions follow)
/// 0x34: buf_count u32 LE               (1)
/// 0x38: buf_array[0] (4096 bytes)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSegment {
    pub header: SegmentHeader,
    pub buffer: PkgBuffer,
}

impl DeviceSegment {
    /// Bytes taken by the three table counts
    pub const TABLE_COUNTS_SIZE: usize = 12;
    pub const SIZE: usize = SegmentHeader::SIZE + Self::TABLE_COUNTS_SIZE + PkgBuffer::SIZE;

    pub fn new(segment_id: FixedName<PKG_NAME_SIZE>, buffer: PkgBuffer) -> Self {
        Self {
            header: SegmentHeader::new(SEGMENT_TYPE_ICE_E810, Self::SIZE as u32, segment_id),
            buffer,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes()); // device_table_count
        bytes.extend_from_slice(&0u32.to_le_bytes()); // nvm table_count
        bytes.extend_from_slice(&1u32.to_le_bytes()); // buf_count
        bytes.extend_from_slice(self.buffer.as_bytes());
        bytes
    }
}
