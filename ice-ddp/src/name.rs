//! Fixed-width, NUL-padded name fields

use std::fmt;

use crate::config::NamePolicy;
use crate::error::EncodeError;
use crate::helpers::trim_padding;

/// A name stored in an `N`-byte field, NUL-padded on the right
///
/// Names longer than `N` bytes are cut at byte `N`. The cut is byte-based, so a
/// multi-byte UTF-8 character straddling the boundary is split; the driver
/// treats the field as raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedName<const N: usize>([u8; N]);

impl<const N: usize> FixedName<N> {
    pub const SIZE: usize = N;

    /// Store the first `N` bytes of `name`, without any checks
    pub fn truncated(name: &str) -> Self {
        let mut bytes = [0u8; N];
        let len = name.len().min(N);
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(bytes)
    }

    /// Store `name` in `field`, applying `policy` when it does not fit
    pub fn new(field: &'static str, name: &str, policy: NamePolicy) -> Result<Self, EncodeError> {
        if let Some(position) = name.bytes().position(|b| b == 0) {
            return Err(EncodeError::InteriorNul { field, position });
        }

        if name.len() > N {
            match policy {
                NamePolicy::Reject => {
                    return Err(EncodeError::NameTooLong {
                        field,
                        len: name.len(),
                        max: N,
                    });
                }
                NamePolicy::Truncate => {
                    tracing::warn!(
                        "{} is {} bytes long, truncating to {} bytes",
                        field,
                        name.len(),
                        N
                    );
                }
            }
        }

        Ok(Self::truncated(name))
    }

    /// Read a name field from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let field = bytes.get(..N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(field);
        Some(Self(out))
    }

    /// Re-fit into a field of a different width (truncating or padding)
    pub fn resize<const M: usize>(&self) -> FixedName<M> {
        let mut bytes = [0u8; M];
        let len = N.min(M);
        bytes[..len].copy_from_slice(&self.0[..len]);
        FixedName(bytes)
    }

    /// Raw field contents including padding
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Field contents before the first NUL
    pub fn trimmed(&self) -> &[u8] {
        trim_padding(&self.0)
    }
}

impl<const N: usize> Default for FixedName<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> fmt::Display for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.trimmed()))
    }
}

impl<const N: usize> fmt::Debug for FixedName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedName<{}>({:?})", N, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        let name = FixedName::<8>::truncated("abc");
        assert_eq!(name.as_bytes(), b"abc\0\0\0\0\0");
        assert_eq!(name.trimmed(), b"abc");
        assert_eq!(name.to_string(), "abc");
    }

    #[test]
    fn test_truncate_policy_keeps_prefix() {
        let long = "0123456789abcdefghijklmnopqrstuvwxyz";
        let name = FixedName::<32>::new("package_name", long, NamePolicy::Truncate).unwrap();
        assert_eq!(&name.as_bytes()[..], &long.as_bytes()[..32]);
    }

    #[test]
    fn test_reject_policy() {
        let result = FixedName::<4>::new("segment_id", "too long", NamePolicy::Reject);
        assert_eq!(
            result,
            Err(EncodeError::NameTooLong {
                field: "segment_id",
                len: 8,
                max: 4,
            })
        );
        assert!(FixedName::<8>::new("segment_id", "fits", NamePolicy::Reject).is_ok());
    }

    #[test]
    fn test_interior_nul_rejected_under_any_policy() {
        for policy in [NamePolicy::Truncate, NamePolicy::Reject] {
            let result = FixedName::<32>::new("package_name", "ab\0cd", policy);
            assert_eq!(
                result,
                Err(EncodeError::InteriorNul {
                    field: "package_name",
                    position: 2,
                })
            );
        }
    }

    #[test]
    fn test_resize() {
        let name = FixedName::<32>::truncated("ICE OS Default Package with suffix");
        let short: FixedName<28> = name.resize();
        assert_eq!(short.as_bytes(), b"ICE OS Default Package with ");

        let wide: FixedName<40> = short.resize();
        assert_eq!(wide.trimmed(), short.trimmed());
    }

    #[test]
    fn test_from_bytes() {
        assert!(FixedName::<4>::from_bytes(b"abc").is_none());
        let name = FixedName::<4>::from_bytes(b"ab\0\0tail").unwrap();
        assert_eq!(name.trimmed(), b"ab");
    }
}
