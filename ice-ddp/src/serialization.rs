//! Binary serialization trait for fixed-size package records.
//!
//! Every fixed-size record implements `BinarySerializable` so the validator can
//! bounds-check and decode records generically. Each record keeps its own
//! `to_bytes()` returning a fixed-size array.

use crate::helpers::read_bytes;

/// Trait for fixed-size, little-endian package records.
///
/// The trait returns `Vec<u8>` because associated consts cannot size a return
/// array (`[u8; Self::SIZE]`) on stable Rust.
pub trait BinarySerializable: Sized {
    /// Size of the serialized record in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from the start of `bytes`.
    ///
    /// Returns `None` if the slice is too short.
    fn deserialize(bytes: &[u8]) -> Option<Self>;

    /// Deserialize the record located at `offset` within `data`.
    ///
    /// Returns `None` unless all `SIZE` bytes lie inside `data`.
    fn read_at(data: &[u8], offset: usize) -> Option<Self> {
        Self::deserialize(read_bytes(data, offset, Self::SIZE)?)
    }
}

macro_rules! impl_binary_serializable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinarySerializable for $ty {
                const SIZE: usize = <$ty>::SIZE;

                fn serialize(&self) -> Vec<u8> {
                    self.to_bytes().to_vec()
                }

                fn deserialize(bytes: &[u8]) -> Option<Self> {
                    Self::from_bytes(bytes)
                }
            }
        )*
    };
}

impl_binary_serializable!(
    crate::PackageHeader,
    crate::SegmentHeader,
    crate::BufferHeader,
    crate::SectionEntry,
    crate::MetadataSection,
    crate::PkgVersion,
);
