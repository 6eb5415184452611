//! Package header and generic segment header

use crate::helpers::read_u32;
use crate::name::FixedName;
use crate::version::PkgVersion;
use crate::{PKG_FORMAT_VERSION, PKG_NAME_SIZE, SEGMENT_COUNT, SEGMENT_FORMAT_VERSION};

/// Package header (`struct ice_pkg_hdr`), 16 bytes
///
/// ```text
/// 0x00: pkg_format_ver [u8; 4]
/// 0x04: seg_count u32 LE
/// 0x08: seg_offset[0] u32 LE   - metadata segment
/// 0x0C: seg_offset[1] u32 LE   - ICE E810 segment
/// ```
///
/// `segment_count` is kept as read so the validator can report a mismatch;
/// only the first two offsets are ever decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageHeader {
    pub format_version: PkgVersion,
    pub segment_count: u32,
    pub segment_offsets: [u32; SEGMENT_COUNT],
}

impl PackageHeader {
    pub const SIZE: usize = 8 + 4 * SEGMENT_COUNT;

    /// Byte offset of `segment_offsets[index]` within the header
    pub const fn offset_field(index: usize) -> usize {
        8 + 4 * index
    }

    pub fn new(segment_offsets: [u32; SEGMENT_COUNT]) -> Self {
        Self {
            format_version: PKG_FORMAT_VERSION,
            segment_count: SEGMENT_COUNT as u32,
            segment_offsets,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.format_version.to_bytes());
        bytes[4..8].copy_from_slice(&self.segment_count.to_le_bytes());
        for (i, offset) in self.segment_offsets.iter().enumerate() {
            let at = Self::offset_field(i);
            bytes[at..at + 4].copy_from_slice(&offset.to_le_bytes());
        }
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        let mut segment_offsets = [0u32; SEGMENT_COUNT];
        for (i, offset) in segment_offsets.iter_mut().enumerate() {
            *offset = read_u32(bytes, Self::offset_field(i))?;
        }
        Some(Self {
            format_version: PkgVersion::from_bytes(bytes)?,
            segment_count: read_u32(bytes, 4)?,
            segment_offsets,
        })
    }
}

/// Generic segment header (`struct ice_generic_seg_hdr`), 44 bytes
///
/// ```text
/// 0x00: seg_type u32 LE
/// 0x04: seg_format_ver [u8; 4]
/// 0x08: seg_size u32 LE        - whole segment, header included
/// 0x0C: seg_id [u8; 32]        - NUL-padded label
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    pub segment_type: u32,
    pub format_version: PkgVersion,
    pub segment_size: u32,
    pub segment_id: FixedName<PKG_NAME_SIZE>,
}

impl SegmentHeader {
    pub const SIZE: usize = 12 + PKG_NAME_SIZE;

    /// Byte offset of `segment_size` within the header
    pub const SIZE_FIELD: usize = 8;

    pub fn new(segment_type: u32, segment_size: u32, segment_id: FixedName<PKG_NAME_SIZE>) -> Self {
        Self {
            segment_type,
            format_version: SEGMENT_FORMAT_VERSION,
            segment_size,
            segment_id,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.segment_type.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.format_version.to_bytes());
        bytes[8..12].copy_from_slice(&self.segment_size.to_le_bytes());
        bytes[12..].copy_from_slice(self.segment_id.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            segment_type: read_u32(bytes, 0)?,
            format_version: PkgVersion::from_bytes(&bytes[4..8])?,
            segment_size: read_u32(bytes, Self::SIZE_FIELD)?,
            segment_id: FixedName::from_bytes(&bytes[12..])?,
        })
    }
}
