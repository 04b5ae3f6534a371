//! Envelope encoding for list mode.
//!
//! An envelope is one outer frame whose payload is the concatenation of
//! already-framed items:
//!
//! ```text
//! Envelope    := varint(len(innerConcat)) ++ innerConcat
//! innerConcat := Frame_1 ++ Frame_2 ++ ... ++ Frame_N   (N >= 0)
//! ```

use bytes::{Bytes, BytesMut};

use super::frame::framed_len;
use super::varint::encode_varint;

/// Wrap already-framed buffers in one outer frame.
///
/// Frames are concatenated in the given order and never merged or
/// re-framed individually. No frames yields the single byte `0x00`.
///
/// # Example
///
/// ```
/// use protolist::protocol::{frame, wrap_envelope};
///
/// let inner = frame(&[0xB0, 0xB1]);
/// let envelope = wrap_envelope(&[inner]);
/// assert_eq!(&envelope[..], &[0x03, 0x02, 0xB0, 0xB1]);
/// ```
pub fn wrap_envelope<B: AsRef<[u8]>>(frames: &[B]) -> Bytes {
    let inner_len: usize = frames.iter().map(|f| f.as_ref().len()).sum();

    let mut out = BytesMut::with_capacity(framed_len(inner_len));
    encode_varint(inner_len as u64, &mut out);
    for f in frames {
        out.extend_from_slice(f.as_ref());
    }
    debug_assert_eq!(out.len(), framed_len(inner_len));

    tracing::debug!(
        frames = frames.len(),
        inner_len,
        envelope_len = out.len(),
        "wrapped envelope"
    );

    out.freeze()
}
