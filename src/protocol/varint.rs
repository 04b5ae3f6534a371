//! Unsigned LEB128 varint encoding.
//!
//! Each byte carries 7 value bits, least significant group first. The high
//! bit is set on every byte except the last:
//!
//! ```text
//!   127 -> 7F
//!   128 -> 80 01
//!   300 -> AC 02
//! ```

use bytes::BufMut;

use crate::error::{ProtolistError, Result};

/// Maximum encoded length of a u64 varint.
pub const MAX_VARINT_LEN: usize = 10;

const CONTINUATION: u8 = 0x80;
const VALUE_MASK: u8 = 0x7F;

/// Append `value` to `buf` as a varint.
///
/// # Example
///
/// ```
/// use protolist::protocol::encode_varint;
///
/// let mut buf = Vec::new();
/// encode_varint(128, &mut buf);
/// assert_eq!(buf, [0x80, 0x01]);
/// ```
pub fn encode_varint(mut value: u64, buf: &mut impl BufMut) {
    while value >= u64::from(CONTINUATION) {
        buf.put_u8((value as u8 & VALUE_MASK) | CONTINUATION);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Number of bytes `encode_varint` writes for `value`.
#[inline]
pub fn encoded_len_varint(value: u64) -> usize {
    // One byte per started 7-bit group; zero still needs one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `buf`.
///
/// Returns:
/// - `Ok(Some((value, consumed)))` if a complete varint was read
/// - `Ok(None)` if `buf` ends before the terminal byte
/// - `Err(...)` if the varint is longer than 10 bytes or overflows u64
pub fn decode_varint(buf: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value: u64 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(ProtolistError::Protocol(format!(
                "varint longer than {} bytes",
                MAX_VARINT_LEN
            )));
        }

        let group = u64::from(byte & VALUE_MASK);
        // The tenth byte may only contribute the single top bit.
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(ProtolistError::Protocol("varint overflows u64".to_string()));
        }
        value |= group << (7 * i);

        if byte & CONTINUATION == 0 {
            return Ok(Some((value, i + 1)));
        }
    }

    if buf.len() >= MAX_VARINT_LEN {
        return Err(ProtolistError::Protocol(format!(
            "varint longer than {} bytes",
            MAX_VARINT_LEN
        )));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        buf
    }

    #[test]
    fn test_zero_is_single_byte() {
        assert_eq!(encode(0), [0x00]);
        assert_eq!(encoded_len_varint(0), 1);
    }

    #[test]
    fn test_seven_bit_boundary() {
        assert_eq!(encode(127), [0x7F]);
        assert_eq!(encode(128), [0x80, 0x01]);
        assert_eq!(encoded_len_varint(127), 1);
        assert_eq!(encoded_len_varint(128), 2);
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode(300), [0xAC, 0x02]);
        assert_eq!(encode(16_383), [0xFF, 0x7F]);
        assert_eq!(encode(16_384), [0x80, 0x80, 0x01]);
        assert_eq!(encode(u32::MAX as u64), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_u64_max_uses_ten_bytes() {
        let bytes = encode(u64::MAX);
        assert_eq!(bytes.len(), MAX_VARINT_LEN);
        assert_eq!(bytes[9], 0x01);
        assert_eq!(encoded_len_varint(u64::MAX), MAX_VARINT_LEN);
        assert_eq!(decode_varint(&bytes).unwrap(), Some((u64::MAX, 10)));
    }

    #[test]
    fn test_encoded_len_matches_encode() {
        for shift in 0..64 {
            let value = 1u64 << shift;
            for v in [value - 1, value, value + 1] {
                assert_eq!(encoded_len_varint(v), encode(v).len(), "value {}", v);
            }
        }
    }

    #[test]
    fn test_decode_reports_consumed_bytes() {
        let buf = [0xAC, 0x02, 0xFF, 0xFF];
        assert_eq!(decode_varint(&buf).unwrap(), Some((300, 2)));
    }

    #[test]
    fn test_decode_incomplete() {
        assert_eq!(decode_varint(&[]).unwrap(), None);
        assert_eq!(decode_varint(&[0x80]).unwrap(), None);
        assert_eq!(decode_varint(&[0xFF, 0xFF, 0xFF]).unwrap(), None);
    }

    #[test]
    fn test_decode_too_long() {
        let buf = [0x80u8; 11];
        let result = decode_varint(&buf);
        assert!(result.unwrap_err().to_string().contains("longer than"));
    }

    #[test]
    fn test_decode_overflow() {
        let mut buf = vec![0xFFu8; 9];
        buf.push(0x02);
        let result = decode_varint(&buf);
        assert!(result.unwrap_err().to_string().contains("overflows"));
    }
}
