//! Length-delimited frames.
//!
//! A frame is a varint length prefix followed by exactly that many payload
//! bytes. The payload is opaque here; the prefix depends only on its length.
//!
//! # Example
//!
//! ```
//! use protolist::protocol::frame;
//!
//! let bytes = frame(&[0xB0, 0xB1]);
//! assert_eq!(&bytes[..], &[0x02, 0xB0, 0xB1]);
//! ```

use bytes::{Bytes, BytesMut};

use super::varint::{encode_varint, encoded_len_varint};

/// A decoded frame.
///
/// Produced by [`FrameBuffer`](super::FrameBuffer) when reading frames back
/// out of a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame around a payload.
    pub fn new(payload: Bytes) -> Self {
        Self { payload }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Length of the frame on the wire (prefix + payload).
    #[inline]
    pub fn encoded_len(&self) -> usize {
        framed_len(self.payload.len())
    }
}

/// Wire length of a frame carrying `payload_len` bytes.
#[inline]
pub fn framed_len(payload_len: usize) -> usize {
    encoded_len_varint(payload_len as u64) + payload_len
}

/// Frame a payload: `varint(len(payload)) ++ payload`.
///
/// An empty payload frames to the single byte `0x00`.
pub fn frame(payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(framed_len(payload.len()));
    frame_into(&mut buf, payload);
    buf.freeze()
}

/// Append a framed payload to an existing buffer.
pub fn frame_into(buf: &mut BytesMut, payload: &[u8]) {
    buf.reserve(framed_len(payload.len()));
    encode_varint(payload.len() as u64, buf);
    buf.extend_from_slice(payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_empty_payload() {
        let bytes = frame(b"");
        assert_eq!(&bytes[..], &[0x00]);
        assert_eq!(framed_len(0), 1);
    }

    #[test]
    fn test_frame_two_byte_payload() {
        let bytes = frame(&[0xB0, 0xB1]);
        assert_eq!(&bytes[..], &[0x02, 0xB0, 0xB1]);
    }

    #[test]
    fn test_frame_127_byte_payload() {
        let payload = vec![0xAA; 127];
        let bytes = frame(&payload);

        assert_eq!(bytes.len(), 128);
        assert_eq!(bytes[0], 0x7F);
        assert_eq!(&bytes[1..], &payload[..]);
    }

    #[test]
    fn test_frame_128_byte_payload() {
        let payload = vec![0xAA; 128];
        let bytes = frame(&payload);

        assert_eq!(bytes.len(), 130);
        assert_eq!(&bytes[..2], &[0x80, 0x01]);
        assert_eq!(&bytes[2..], &payload[..]);
    }

    #[test]
    fn test_prefix_independent_of_content() {
        let a = frame(&[0x00; 200]);
        let b = frame(&[0xFF; 200]);
        assert_eq!(a[..2], b[..2]);
    }

    #[test]
    fn test_frame_into_appends() {
        let mut buf = BytesMut::new();
        frame_into(&mut buf, b"ab");
        frame_into(&mut buf, b"");
        frame_into(&mut buf, b"c");

        assert_eq!(&buf[..], &[0x02, b'a', b'b', 0x00, 0x01, b'c']);
    }

    #[test]
    fn test_decoded_frame_lengths() {
        let frame = Frame::new(Bytes::from(vec![0x11; 128]));

        assert_eq!(frame.payload_len(), 128);
        assert_eq!(frame.encoded_len(), 130);
    }
}
