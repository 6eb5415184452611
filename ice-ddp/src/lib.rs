//! ice-ddp: minimal DDP package encoder and validator for the Linux `ice` driver
//!
//! The `ice` driver for Intel E810 NICs refuses to leave Safe Mode unless it can
//! load a Dynamic Device Personalization (DDP) package. This crate builds the
//! smallest package that passes the driver's static structural checks, and
//! ships a strict decoder that verifies any package against the same checks.
//!
//! # Package Layout
//!
//! ```text
//! 0x0000  PackageHeader (16 bytes)
//!         format_version {1,0,0,0}, segment_count = 2, segment_offsets[2]
//! 0x0010  Metadata segment (84 bytes)
//!         SegmentHeader (44) + package_version (4) + reserved (4) + package_name (32)
//! 0x0064  ICE E810 segment (4152 bytes)
//!         SegmentHeader (44) + device_table_count (4) + nvm_table_count (4)
//!         + buffer_count (4) + buffer[0] (4096)
//! ```
//!
//! The lone buffer carries one `ICE_SID_METADATA` section at offset 12 holding
//! the package version and a 28-byte copy of the package name.
//!
//! # Usage
//!
//! ```
//! use ice_ddp::{encode_package, validate_package, PACKAGE_SIZE};
//!
//! let package = encode_package();
//! let report = validate_package(&package).unwrap();
//!
//! assert_eq!(package.len(), PACKAGE_SIZE);
//! assert_eq!(report.segment_count, 2);
//! ```
//!
//! # Scope
//!
//! Only static file structure is covered. The driver additionally negotiates
//! compatibility with the NVM over admin queue commands (`0x0C40` download,
//! `0x0C43` get package info); that exchange is not modelled here.

mod buffer;
mod config;
mod encoder;
mod error;
mod header;
mod helpers;
mod name;
mod report;
mod segment;
mod serialization;
mod validator;
mod version;

pub use buffer::{BufferHeader, MetadataSection, PkgBuffer, SectionEntry};
pub use config::{NamePolicy, PackageConfig};
pub use encoder::{PackageEncoder, encode_package, encode_package_with};
pub use error::{EncodeError, ErrorKind, ValidationError};
pub use header::{PackageHeader, SegmentHeader};
pub use name::FixedName;
pub use report::{BufferSummary, SegmentSummary, ValidationReport};
pub use segment::{DeviceSegment, MetadataSegment};
pub use serialization::BinarySerializable;
pub use validator::{Validator, validate_package, validate_package_with};
pub use version::PkgVersion;

// =============================================================================
// Field Widths
// =============================================================================

/// Size of every buffer in the ICE segment's buffer table
pub const PKG_BUF_SIZE: usize = 4096;

/// Width of package names and segment ids
pub const PKG_NAME_SIZE: usize = 32;

/// Width of the name field inside the metadata section
pub const META_SECT_NAME_SIZE: usize = 28;

/// Number of segments this generator emits (and the validator requires)
pub const SEGMENT_COUNT: usize = 2;

/// Size of one device table entry
pub const DEVICE_ID_ENTRY_SIZE: usize = 8;

/// Size of one NVM table entry
pub const NVM_TABLE_ENTRY_SIZE: usize = 4;

// =============================================================================
// Type Tags
// =============================================================================

/// Segment type of the global metadata segment
pub const SEGMENT_TYPE_METADATA: u32 = 0x0000_0001;

/// Segment type of the ICE E810 device configuration segment
pub const SEGMENT_TYPE_ICE_E810: u32 = 0x0000_0010;

/// Section id of the metadata section inside a buffer
pub const ICE_SID_METADATA: u32 = 1;

// =============================================================================
// Versions
// =============================================================================

/// Package container format version checked by `ice_verify_pkg()`
pub const PKG_FORMAT_VERSION: PkgVersion = PkgVersion::new(1, 0, 0, 0);

/// Format version written into every segment header
pub const SEGMENT_FORMAT_VERSION: PkgVersion = PkgVersion::new(1, 3, 0, 0);

/// Package version; the driver requires major 1, minor 3
pub const PACKAGE_VERSION: PkgVersion = PkgVersion::new(1, 3, 0, 0);

// =============================================================================
// Defaults
// =============================================================================

/// Package name used when none is configured
pub const DEFAULT_PACKAGE_NAME: &str = "ICE OS Default Package";

/// Segment id of the metadata segment
pub const DEFAULT_METADATA_SEGMENT_ID: &str = "ICE Metadata";

/// Segment id of the ICE E810 segment
pub const DEFAULT_DEVICE_SEGMENT_ID: &str = "ICE Configuration Data";

/// File name the driver loads from the firmware search path
pub const DEFAULT_OUTPUT_FILE: &str = "ice.pkg";

// =============================================================================
// Derived Sizes
// =============================================================================

/// Total size of an encoded package
pub const PACKAGE_SIZE: usize = PackageHeader::SIZE + MetadataSegment::SIZE + DeviceSegment::SIZE;
