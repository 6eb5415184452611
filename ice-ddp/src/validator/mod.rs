//! Package validator
//!
//! Decodes a package strictly and stops at the first violated invariant.
//! Checks run in this order:
//!
//! 1. Package header: size, format version, segment count
//! 2. Each segment: offset past the package header, header and declared size in bounds
//! 3. Segment types: metadata segment first, ICE E810 segment second
//! 4. ICE segment tables: device table, NVM table, buffer table inside the segment
//! 5. First buffer: section count, data end, the lone section entry
//! 6. Metadata section: version and name
//!
//! Every offset is range-checked before it is read, so arbitrary input yields
//! a [`ValidationError`] rather than a panic.

use crate::buffer::{BufferHeader, MetadataSection, SectionEntry};
use crate::config::PackageConfig;
use crate::error::{ErrorKind, ValidationError};
use crate::header::{PackageHeader, SegmentHeader};
use crate::helpers::{read_bytes, read_string, read_u32};
use crate::name::FixedName;
use crate::report::{BufferSummary, SegmentSummary, ValidationReport};
use crate::segment::MetadataSegment;
use crate::serialization::BinarySerializable;
use crate::{
    DEFAULT_PACKAGE_NAME, DEVICE_ID_ENTRY_SIZE, ICE_SID_METADATA, META_SECT_NAME_SIZE,
    NVM_TABLE_ENTRY_SIZE, PACKAGE_VERSION, PKG_BUF_SIZE, PKG_FORMAT_VERSION, SEGMENT_COUNT,
    SEGMENT_TYPE_ICE_E810, SEGMENT_TYPE_METADATA,
};


/// A segment whose header and declared extent lie inside the package
#[derive(Debug, Clone, Copy)]
struct LocatedSegment {
    index: usize,
    offset: usize,
    header: SegmentHeader,
}

impl LocatedSegment {
    fn end(&self) -> usize {
        self.offset + self.header.segment_size as usize
    }

    fn size_field(&self) -> usize {
        self.offset + SegmentHeader::SIZE_FIELD
    }

    fn summary(&self) -> SegmentSummary {
        SegmentSummary {
            index: self.index,
            offset: self.offset as u32,
            size: self.header.segment_size,
            segment_type: self.header.segment_type,
            format_version: self.header.format_version,
            segment_id: self.header.segment_id.to_string(),
        }
    }
}

/// Validator expecting a particular package name in the metadata section
#[derive(Debug, Clone)]
pub struct Validator {
    expected_name: FixedName<META_SECT_NAME_SIZE>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_NAME)
    }
}

impl Validator {
    /// The metadata section must hold `expected_name` cut to 28 bytes
    pub fn new(expected_name: &str) -> Self {
        Self {
            expected_name: FixedName::truncated(expected_name),
        }
    }

    /// Check `data` against every package invariant
    pub fn validate(&self, data: &[u8]) -> Result<ValidationReport, ValidationError> {
        let result = self.run(data);
        match &result {
            Ok(report) => tracing::debug!(
                "package valid: {} bytes, metadata '{}'",
                report.total_size,
                report.metadata_name
            ),
            Err(err) => tracing::debug!("package rejected: {}", err),
        }
        result
    }

    fn run(&self, data: &[u8]) -> Result<ValidationReport, ValidationError> {
        let header = check_package_header(data)?;

        let [metadata_offset, device_offset] = header.segment_offsets;
        let metadata = locate_segment(data, 0, metadata_offset)?;
        let device = locate_segment(data, 1, device_offset)?;
        check_segment_type(&metadata, SEGMENT_TYPE_METADATA)?;
        check_segment_type(&device, SEGMENT_TYPE_ICE_E810)?;

        let metadata_seg = check_metadata_segment(data, &metadata)?;
        let tables = walk_device_tables(data, &device)?;
        let (entry, buffer_header) = check_buffer(data, tables.buffer_offset)?;
        let section = self.check_metadata_section(data, tables.buffer_offset, &entry)?;

        Ok(ValidationReport {
            total_size: data.len(),
            format_version: header.format_version,
            segment_count: header.segment_count,
            metadata_segment: metadata.summary(),
            device_segment: device.summary(),
            package_version: metadata_seg.package_version,
            package_name: metadata_seg.package_name.to_string(),
            device_table_count: tables.device_table_count,
            nvm_table_count: tables.nvm_table_count,
            buffer_count: tables.buffer_count,
            buffer: BufferSummary {
                offset: tables.buffer_offset,
                section_count: buffer_header.section_count,
                data_end: buffer_header.data_end,
                section_type: entry.section_type,
                section_offset: entry.offset,
                section_size: entry.size,
            },
            metadata_version: section.version,
            metadata_name: read_string(section.name.as_bytes()),
            track_id: section.track_id,
        })
    }

    fn check_metadata_section(
        &self,
        data: &[u8],
        buffer_offset: usize,
        entry: &SectionEntry,
    ) -> Result<MetadataSection, ValidationError> {
        let at = buffer_offset + entry.offset as usize;
        let section = MetadataSection::read_at(data, at).ok_or_else(|| {
            ValidationError::out_of_range(
                ErrorKind::SegmentOutOfBounds,
                "metadata_section",
                at,
                format!("end <= {}", data.len()),
                at + MetadataSection::SIZE,
            )
        })?;

        if section.version != PACKAGE_VERSION {
            return Err(ValidationError::new(
                ErrorKind::MetadataMismatch,
                "metadata version",
                at,
                PACKAGE_VERSION,
                section.version,
            ));
        }

        if section.name.trimmed() != self.expected_name.trimmed() {
            return Err(ValidationError::new(
                ErrorKind::MetadataMismatch,
                "metadata name",
                at + MetadataSection::NAME_FIELD,
                format!("{:?}", self.expected_name.to_string()),
                format!("{:?}", section.name.to_string()),
            ));
        }

        Ok(section)
    }
}

/// Validate against the stock package name
pub fn validate_package(data: &[u8]) -> Result<ValidationReport, ValidationError> {
    Validator::default().validate(data)
}

/// Validate against the package name in `config`
pub fn validate_package_with(
    data: &[u8],
    config: &PackageConfig,
) -> Result<ValidationReport, ValidationError> {
    Validator::new(&config.package_name).validate(data)
}

fn check_package_header(data: &[u8]) -> Result<PackageHeader, ValidationError> {
    let header = PackageHeader::read_at(data, 0).ok_or_else(|| {
        ValidationError::out_of_range(
            ErrorKind::MalformedHeader,
            "package_header",
            0,
            format!(">= {} bytes", PackageHeader::SIZE),
            format!("{} bytes", data.len()),
        )
    })?;

    if header.format_version != PKG_FORMAT_VERSION {
        return Err(ValidationError::new(
            ErrorKind::MalformedHeader,
            "format_version",
            0,
            PKG_FORMAT_VERSION,
            header.format_version,
        ));
    }

    if header.segment_count != SEGMENT_COUNT as u32 {
        return Err(ValidationError::new(
            ErrorKind::MalformedHeader,
            "segment_count",
            4,
            SEGMENT_COUNT,
            header.segment_count,
        ));
    }

    Ok(header)
}

fn locate_segment(
    data: &[u8],
    index: usize,
    offset: u32,
) -> Result<LocatedSegment, ValidationError> {
    let total = data.len();
    let start = offset as usize;

    if start < PackageHeader::SIZE {
        return Err(ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            "segment_offset",
            PackageHeader::offset_field(index),
            format!(">= {}", PackageHeader::SIZE),
            offset,
        ));
    }

    let header = SegmentHeader::read_at(data, start).ok_or_else(|| {
        ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            "segment_header",
            start,
            format!("end <= {}", total),
            offset as u64 + SegmentHeader::SIZE as u64,
        )
    })?;

    let size_field = start + SegmentHeader::SIZE_FIELD;
    if (header.segment_size as usize) < SegmentHeader::SIZE {
        return Err(ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            "segment_size",
            size_field,
            format!(">= {}", SegmentHeader::SIZE),
            header.segment_size,
        ));
    }

    let end = offset as u64 + header.segment_size as u64;
    if end > total as u64 {
        return Err(ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            "segment_size",
            size_field,
            format!("end <= {}", total),
            end,
        ));
    }

    Ok(LocatedSegment {
        index,
        offset: start,
        header,
    })
}

/// Each header slot must point at the segment type the driver expects there
fn check_segment_type(seg: &LocatedSegment, expected: u32) -> Result<(), ValidationError> {
    if seg.header.segment_type != expected {
        return Err(ValidationError::new(
            ErrorKind::UnexpectedSegmentType,
            "segment_type",
            seg.offset,
            format!("{:#x}", expected),
            format!("{:#x}", seg.header.segment_type),
        ));
    }
    Ok(())
}

fn check_metadata_segment(
    data: &[u8],
    seg: &LocatedSegment,
) -> Result<MetadataSegment, ValidationError> {
    let too_small = || {
        ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            "segment_size",
            seg.size_field(),
            format!(">= {}", MetadataSegment::SIZE),
            seg.header.segment_size,
        )
    };

    if (seg.header.segment_size as usize) < MetadataSegment::SIZE {
        return Err(too_small());
    }
    read_bytes(data, seg.offset, MetadataSegment::SIZE)
        .and_then(MetadataSegment::from_bytes)
        .ok_or_else(too_small)
}

/// Table counts of the ICE segment and the location of its first buffer
struct DeviceTables {
    device_table_count: u32,
    nvm_table_count: u32,
    buffer_count: u32,
    buffer_offset: usize,
}

fn walk_device_tables(
    data: &[u8],
    seg: &LocatedSegment,
) -> Result<DeviceTables, ValidationError> {
    let limit = seg.end();
    let mut cursor = seg.offset + SegmentHeader::SIZE;

    let device_table_count = read_count(data, cursor, limit, "device_table_count")?;
    cursor = skip_entries(
        cursor + 4,
        device_table_count,
        DEVICE_ID_ENTRY_SIZE,
        limit,
        "device_table",
    )?;

    let nvm_table_count = read_count(data, cursor, limit, "nvm_table_count")?;
    cursor = skip_entries(
        cursor + 4,
        nvm_table_count,
        NVM_TABLE_ENTRY_SIZE,
        limit,
        "nvm_table",
    )?;

    let buffer_count = read_count(data, cursor, limit, "buffer_count")?;
    if buffer_count == 0 {
        return Err(ValidationError::new(
            ErrorKind::MalformedBuffer,
            "buffer_count",
            cursor,
            "at least 1",
            buffer_count,
        ));
    }
    let buffer_offset = cursor + 4;
    skip_entries(buffer_offset, buffer_count, PKG_BUF_SIZE, limit, "buffer_table")?;

    Ok(DeviceTables {
        device_table_count,
        nvm_table_count,
        buffer_count,
        buffer_offset,
    })
}

fn read_count(
    data: &[u8],
    at: usize,
    limit: usize,
    field: &'static str,
) -> Result<u32, ValidationError> {
    let out_of_bounds = || {
        ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            field,
            at,
            format!("end <= {}", limit),
            at + 4,
        )
    };

    if at + 4 > limit {
        return Err(out_of_bounds());
    }
    read_u32(data, at).ok_or_else(out_of_bounds)
}

/// Offset just past `count` entries of `entry_size` bytes starting at `at`
fn skip_entries(
    at: usize,
    count: u32,
    entry_size: usize,
    limit: usize,
    field: &'static str,
) -> Result<usize, ValidationError> {
    let end = at as u64 + count as u64 * entry_size as u64;
    if end > limit as u64 {
        return Err(ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            field,
            at,
            format!("end <= {}", limit),
            end,
        ));
    }
    Ok(end as usize)
}

fn check_buffer(
    data: &[u8],
    buf: usize,
) -> Result<(SectionEntry, BufferHeader), ValidationError> {
    let entry_at = buf + BufferHeader::entry_offset(0);
    let truncated = |field: &'static str, at: usize, len: usize| {
        ValidationError::out_of_range(
            ErrorKind::SegmentOutOfBounds,
            field,
            at,
            format!("end <= {}", data.len()),
            at + len,
        )
    };

    let header = BufferHeader::read_at(data, buf)
        .ok_or_else(|| truncated("buffer_header", buf, BufferHeader::SIZE))?;

    if header.section_count != 1 {
        return Err(ValidationError::new(
            ErrorKind::MalformedBuffer,
            "section_count",
            buf,
            1,
            header.section_count,
        ));
    }

    let data_start = BufferHeader::data_start(header.section_count as usize);
    let data_end = header.data_end as usize;
    if data_end < data_start || data_end > PKG_BUF_SIZE {
        return Err(ValidationError::new(
            ErrorKind::MalformedBuffer,
            "data_end",
            buf + 2,
            format!("{}..={}", data_start, PKG_BUF_SIZE),
            data_end,
        ));
    }

    let entry = SectionEntry::read_at(data, entry_at)
        .ok_or_else(|| truncated("section_entry", entry_at, SectionEntry::SIZE))?;

    if entry.section_type != ICE_SID_METADATA {
        return Err(ValidationError::new(
            ErrorKind::UnexpectedSectionType,
            "section_type",
            entry_at,
            ICE_SID_METADATA,
            entry.section_type,
        ));
    }

    if (entry.offset as usize) < data_start {
        return Err(ValidationError::out_of_range(
            ErrorKind::MalformedBuffer,
            "section_offset",
            entry_at + 4,
            format!(">= {}", data_start),
            entry.offset,
        ));
    }

    if entry.size as usize != MetadataSection::SIZE {
        return Err(ValidationError::new(
            ErrorKind::MalformedBuffer,
            "section_size",
            entry_at + 6,
            MetadataSection::SIZE,
            entry.size,
        ));
    }

    if entry.end() > PKG_BUF_SIZE {
        return Err(ValidationError::out_of_range(
            ErrorKind::MalformedBuffer,
            "section_offset",
            entry_at + 4,
            format!("end <= {}", PKG_BUF_SIZE),
            entry.end(),
        ));
    }

    Ok((entry, header))
}
