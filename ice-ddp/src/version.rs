//! Four-part version tuple (`struct ice_pkg_ver`)

use std::fmt;

use serde::Serialize;

/// Version tuple stored as four consecutive bytes: major, minor, update, draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PkgVersion {
    pub major: u8,
    pub minor: u8,
    pub update: u8,
    pub draft: u8,
}

impl PkgVersion {
    pub const SIZE: usize = 4;

    pub const fn new(major: u8, minor: u8, update: u8, draft: u8) -> Self {
        Self {
            major,
            minor,
            update,
            draft,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        [self.major, self.minor, self.update, self.draft]
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [major, minor, update, draft, ..] => Some(Self::new(*major, *minor, *update, *draft)),
            _ => None,
        }
    }
}

impl fmt::Display for PkgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.update, self.draft
        )
    }
}
