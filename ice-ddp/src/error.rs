//! Error types for package encoding and validation

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while preparing package fields, before any byte is written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Name does not fit its fixed-width field and truncation is disabled
    #[error("{field} is {len} bytes long (max {max})")]
    NameTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    /// Name contains a NUL byte, which would end it early once stored
    #[error("{field} contains a NUL byte at position {position}")]
    InteriorNul { field: &'static str, position: usize },
}

/// Class of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Package header truncated, wrong format version or wrong segment count
    MalformedHeader,
    /// A segment, or a table inside one, extends past its bounds
    SegmentOutOfBounds,
    /// A segment type tag is unknown or duplicated
    UnexpectedSegmentType,
    /// The buffer's section is not a metadata section
    UnexpectedSectionType,
    /// Buffer count, section count, data end or section bounds inconsistent
    MalformedBuffer,
    /// Metadata version or name does not match what the driver expects
    MetadataMismatch,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedHeader => "malformed package header",
            Self::SegmentOutOfBounds => "segment out of bounds",
            Self::UnexpectedSegmentType => "unexpected segment type",
            Self::UnexpectedSectionType => "unexpected section type",
            Self::MalformedBuffer => "malformed buffer",
            Self::MetadataMismatch => "metadata mismatch",
        };
        f.write_str(name)
    }
}

/// First invariant a package violates
///
/// `offset` is the absolute byte offset of the offending field within the
/// package, so a hex dump is enough to locate the problem.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {field} at offset {offset:#06x}: expected {expected}, found {actual}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub field: &'static str,
    pub offset: usize,
    pub expected: String,
    pub actual: String,
    /// Set when a length or offset fell outside its container
    pub range_check: bool,
}

impl ValidationError {
    /// A field holding the wrong value
    pub(crate) fn new(
        kind: ErrorKind,
        field: &'static str,
        offset: usize,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self {
            kind,
            field,
            offset,
            expected: expected.to_string(),
            actual: actual.to_string(),
            range_check: false,
        }
    }

    /// A length or offset reaching outside the data, segment or buffer
    pub(crate) fn out_of_range(
        kind: ErrorKind,
        field: &'static str,
        offset: usize,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self {
            range_check: true,
            ..Self::new(kind, field, offset, expected, actual)
        }
    }

    /// Whether the failure comes from a range check rather than a field value
    pub fn is_bounds_error(&self) -> bool {
        self.range_check
    }
}
