//! Fixed-size buffers and the sections they carry
//!
//! # Layout
//! ```text
//! Buffer (4096 bytes, zero padded):
//! 0x00: section_count u16 LE
//! 0x02: data_end u16 LE              - one past the last section byte
//! 0x04: section_entry[section_count] - 8 bytes each
//! ....: section payloads
//!
//! Section entry:
//! 0x00: type u32 LE
//! 0x04: offset u16 LE                - relative to buffer start
//! 0x06: size u16 LE
//!
//! Metadata section (ICE_SID_METADATA):
//! 0x00: ver [u8; 4]
//! 0x04: name [u8; 28]
//! 0x20: track_id u32 LE
//! ```

use crate::helpers::{read_u16, read_u32};
use crate::name::FixedName;
use crate::version::PkgVersion;
use crate::{ICE_SID_METADATA, META_SECT_NAME_SIZE, PACKAGE_VERSION, PKG_BUF_SIZE};

/// Buffer header (`struct ice_buf_hdr` without its entry array), 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHeader {
    pub section_count: u16,
    pub data_end: u16,
}

impl BufferHeader {
    pub const SIZE: usize = 4;

    pub fn new(section_count: u16, data_end: u16) -> Self {
        Self {
            section_count,
            data_end,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..2].copy_from_slice(&self.section_count.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.data_end.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            section_count: read_u16(bytes, 0)?,
            data_end: read_u16(bytes, 2)?,
        })
    }

    /// First payload offset once `section_count` entries are in place
    pub const fn data_start(section_count: usize) -> usize {
        Self::SIZE + SectionEntry::SIZE * section_count
    }

    /// Buffer-relative offset of entry `index`
    pub const fn entry_offset(index: usize) -> usize {
        Self::SIZE + SectionEntry::SIZE * index
    }
}

/// Section table entry (`struct ice_section_entry`), 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEntry {
    pub section_type: u32,
    pub offset: u16,
    pub size: u16,
}

impl SectionEntry {
    pub const SIZE: usize = 8;

    pub fn new(section_type: u32, offset: u16, size: u16) -> Self {
        Self {
            section_type,
            offset,
            size,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.section_type.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.offset.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            section_type: read_u32(bytes, 0)?,
            offset: read_u16(bytes, 4)?,
            size: read_u16(bytes, 6)?,
        })
    }

    /// One past the last payload byte, relative to the buffer
    pub fn end(&self) -> usize {
        self.offset as usize + self.size as usize
    }
}

/// Metadata section (`struct ice_meta_sect`), 36 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSection {
    pub version: PkgVersion,
    pub name: FixedName<META_SECT_NAME_SIZE>,
    pub track_id: u32,
}

impl MetadataSection {
    pub const SIZE: usize = PkgVersion::SIZE + META_SECT_NAME_SIZE + 4;

    /// Byte offset of `name` within the section
    pub const NAME_FIELD: usize = PkgVersion::SIZE;

    pub fn new(name: FixedName<META_SECT_NAME_SIZE>) -> Self {
        Self {
            version: PACKAGE_VERSION,
            name,
            track_id: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.version.to_bytes());
        bytes[4..32].copy_from_slice(self.name.as_bytes());
        bytes[32..36].copy_from_slice(&self.track_id.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            version: PkgVersion::from_bytes(bytes)?,
            name: FixedName::from_bytes(&bytes[Self::NAME_FIELD..])?,
            track_id: read_u32(bytes, 32)?,
        })
    }
}

/// One 4096-byte entry of the ICE segment's buffer table (`struct ice_buf`)
#[derive(Clone, PartialEq, Eq)]
pub struct PkgBuffer {
    data: Box<[u8; PKG_BUF_SIZE]>,
}

impl PkgBuffer {
    pub const SIZE: usize = PKG_BUF_SIZE;

    /// Buffer holding a single metadata section right after the entry table
    pub fn with_metadata(section: &MetadataSection) -> Self {
        let offset = BufferHeader::data_start(1);
        let end = offset + MetadataSection::SIZE;

        let mut data = Box::new([0u8; PKG_BUF_SIZE]);
        let header = BufferHeader::new(1, end as u16);
        let entry = SectionEntry::new(
            ICE_SID_METADATA,
            offset as u16,
            MetadataSection::SIZE as u16,
        );

        data[..BufferHeader::SIZE].copy_from_slice(&header.to_bytes());
        data[BufferHeader::entry_offset(0)..offset].copy_from_slice(&entry.to_bytes());
        data[offset..end].copy_from_slice(&section.to_bytes());

        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8; PKG_BUF_SIZE] {
        &self.data
    }

    pub fn header(&self) -> BufferHeader {
        BufferHeader {
            section_count: u16::from_le_bytes([self.data[0], self.data[1]]),
            data_end: u16::from_le_bytes([self.data[2], self.data[3]]),
        }
    }
}

impl std::fmt::Debug for PkgBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkgBuffer")
            .field("header", &self.header())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_section() -> MetadataSection {
        MetadataSection::new(FixedName::truncated("ICE OS Default Package"))
    }

    #[test]
    fn test_metadata_section_layout() {
        let bytes = default_section().to_bytes();
        assert_eq!(&bytes[0..4], &[1, 3, 0, 0]);
        assert_eq!(&bytes[4..26], b"ICE OS Default Package");
        assert!(bytes[26..].iter().all(|&b| b == 0));

        let parsed = MetadataSection::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, default_section());
    }

    #[test]
    fn test_buffer_header_and_entry() {
        let buf = PkgBuffer::with_metadata(&default_section());
        let bytes = buf.as_bytes();

        assert_eq!(buf.header(), BufferHeader::new(1, 48));
        assert_eq!(&bytes[0..4], &[1, 0, 48, 0]);

        let entry = SectionEntry::from_bytes(&bytes[4..12]).unwrap();
        assert_eq!(entry, SectionEntry::new(ICE_SID_METADATA, 12, 36));
        assert_eq!(entry.end(), 48);
    }

    #[test]
    fn test_buffer_payload_and_padding() {
        let buf = PkgBuffer::with_metadata(&default_section());
        let bytes = buf.as_bytes();

        assert_eq!(&bytes[12..48], &default_section().to_bytes());
        assert!(bytes[48..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_data_start() {
        assert_eq!(BufferHeader::data_start(0), 4);
        assert_eq!(BufferHeader::data_start(1), 12);
        assert_eq!(BufferHeader::entry_offset(1), 12);
    }
}
