//! Helper functions for reading little-endian fields at absolute offsets
//!
//! Every reader returns `None` instead of panicking when the requested range
//! does not lie entirely inside `data`.

/// Borrow `len` bytes starting at `offset`
pub(crate) fn read_bytes(data: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    let end = offset.checked_add(len)?;
    data.get(offset..end)
}

/// Read a 16-bit little-endian integer
pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = read_bytes(data, offset, 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Read a 32-bit little-endian integer
pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = read_bytes(data, offset, 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a NUL-padded fixed-width string
pub(crate) fn read_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(trim_padding(bytes)).into_owned()
}

/// Bytes before the first NUL (the whole slice if there is none)
pub(crate) fn trim_padding(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_ints() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u16(&data, 0), Some(0x1234));
        assert_eq!(read_u32(&data, 2), Some(0x1234_5678));
    }

    #[test]
    fn test_read_out_of_bounds() {
        let data = [0u8; 4];
        assert_eq!(read_u32(&data, 1), None);
        assert_eq!(read_u16(&data, 3), None);
        assert_eq!(read_bytes(&data, usize::MAX, 2), None);
        assert_eq!(read_bytes(&data, 4, 0), Some(&[][..]));
    }

    #[test]
    fn test_read_string() {
        assert_eq!(read_string(b"Hello\0World"), "Hello");
        assert_eq!(read_string(b"No null"), "No null");
        assert_eq!(read_string(b"\0\0\0"), "");
        assert_eq!(read_string(b""), "");
    }
}
