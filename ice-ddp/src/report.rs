//! Structured result of a successful validation

use std::fmt;

use serde::Serialize;

use crate::version::PkgVersion;

/// Location and identity of one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSummary {
    /// Position in the package header's offset table
    pub index: usize,
    pub offset: u32,
    pub size: u32,
    pub segment_type: u32,
    pub format_version: PkgVersion,
    pub segment_id: String,
}

/// The first buffer of the ICE segment and its lone section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferSummary {
    /// Absolute offset of the buffer within the package
    pub offset: usize,
    pub section_count: u16,
    pub data_end: u16,
    pub section_type: u32,
    pub section_offset: u16,
    pub section_size: u16,
}

/// Everything the validator decoded from a package that passed every check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total_size: usize,
    pub format_version: PkgVersion,
    pub segment_count: u32,
    pub metadata_segment: SegmentSummary,
    pub device_segment: SegmentSummary,
    /// `pkg_ver` from the metadata segment body
    pub package_version: PkgVersion,
    /// `pkg_name` from the metadata segment body
    pub package_name: String,
    pub device_table_count: u32,
    pub nvm_table_count: u32,
    pub buffer_count: u32,
    pub buffer: BufferSummary,
    /// `ver` from the metadata section
    pub metadata_version: PkgVersion,
    /// `name` from the metadata section
    pub metadata_name: String,
    pub track_id: u32,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package validated successfully:")?;
        writeln!(f, "  Total size: {} bytes", self.total_size)?;
        writeln!(f, "  Format version: {}", self.format_version)?;
        writeln!(f, "  Segments: {}", self.segment_count)?;
        writeln!(
            f,
            "  Metadata seg at offset {}, size {} ({:?})",
            self.metadata_segment.offset,
            self.metadata_segment.size,
            self.metadata_segment.segment_id
        )?;
        writeln!(
            f,
            "  ICE seg at offset {}, size {} ({:?})",
            self.device_segment.offset,
            self.device_segment.size,
            self.device_segment.segment_id
        )?;
        writeln!(
            f,
            "  Package: {} (version {})",
            self.package_name, self.package_version
        )?;
        writeln!(
            f,
            "  Tables: {} device ids, {} NVM versions, {} buffers",
            self.device_table_count, self.nvm_table_count, self.buffer_count
        )?;
        writeln!(
            f,
            "  Buffer section: type={}, offset={}, size={}, data_end={}",
            self.buffer.section_type,
            self.buffer.section_offset,
            self.buffer.section_size,
            self.buffer.data_end
        )?;
        write!(
            f,
            "  Metadata: ver={}, name={}, track_id={}",
            self.metadata_version, self.metadata_name, self.track_id
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::encode_package;
    use crate::validate_package;

    #[test]
    fn test_display_lists_every_part() {
        let report = validate_package(&encode_package()).unwrap();
        let text = report.to_string();

        assert!(text.starts_with("Package validated successfully:"));
        assert!(text.contains("Total size: 4252 bytes"));
        assert!(text.contains("Format version: 1.0.0.0"));
        assert!(text.contains("Metadata seg at offset 16, size 84 (\"ICE Metadata\")"));
        assert!(text.contains("ICE seg at offset 100, size 4152 (\"ICE Configuration Data\")"));
        assert!(text.contains("Buffer section: type=1, offset=12, size=36, data_end=48"));
        assert!(text.ends_with("Metadata: ver=1.3.0.0, name=ICE OS Default Package, track_id=0"));
    }

    #[test]
    fn test_json_shape() {
        let report = validate_package(&encode_package()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["total_size"], 4252);
        assert_eq!(json["segment_count"], 2);
        assert_eq!(json["device_segment"]["offset"], 100);
        assert_eq!(json["metadata_version"]["minor"], 3);
        assert_eq!(json["metadata_name"], "ICE OS Default Package");
    }
}
