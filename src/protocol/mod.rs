//! Protocol module - varint framing, envelopes, and frame decoding.
//!
//! This module implements the binary layout consumed by the bulk-load formats:
//! - LEB128 varint length prefixes
//! - Frames (`varint(len) ++ payload`) for single mode
//! - Envelopes (one frame around many frames) for list mode
//! - Frame buffer for reading frames back from a stream

mod envelope;
mod frame;
mod frame_buffer;
mod mode;
mod varint;

pub use envelope::wrap_envelope;
pub use frame::{frame, frame_into, framed_len, Frame};
pub use frame_buffer::{FrameBuffer, DEFAULT_MAX_PAYLOAD_SIZE};
pub use mode::Mode;
pub use varint::{decode_varint, encode_varint, encoded_len_varint, MAX_VARINT_LEN};
