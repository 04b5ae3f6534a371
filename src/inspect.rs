//! Decoding finished buffers back into their parts.
//!
//! Used by `protolist inspect` to check what a file will look like to the
//! bulk loader.

use prost::Message;
use serde::Serialize;

use crate::error::{ProtolistError, Result};
use crate::protocol::{FrameBuffer, Mode};
use crate::record::Record;

/// One decoded inner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageReport {
    pub index: usize,
    /// Wire length including the length prefix.
    pub frame_len: usize,
    pub payload_len: usize,
    pub payload_hex: String,
    /// Field value, if the payload parses as a record.
    pub my_uint32: Option<u32>,
}

/// Layout of a whole buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferReport {
    pub mode: Mode,
    pub total_len: usize,
    /// Outer envelope payload length (list mode only).
    pub envelope_len: Option<usize>,
    pub messages: Vec<MessageReport>,
}

/// Decode `data` as a buffer produced in `mode`.
///
/// # Errors
///
/// Returns `Protocol` if the data is not exactly one frame (single mode) or
/// one envelope of frames (list mode).
pub fn inspect(data: &[u8], mode: Mode) -> Result<BufferReport> {
    let (envelope_len, frames) = match mode {
        Mode::Single => {
            let frames = FrameBuffer::decode_all(data)?;
            if frames.len() != 1 {
                return Err(ProtolistError::Protocol(format!(
                    "single-mode buffer holds {} frames, expected 1",
                    frames.len()
                )));
            }
            (None, frames)
        }
        Mode::List => {
            let outer = FrameBuffer::decode_all(data)?;
            if outer.len() != 1 {
                return Err(ProtolistError::Protocol(format!(
                    "list-mode buffer holds {} envelopes, expected 1",
                    outer.len()
                )));
            }
            let envelope = &outer[0];
            (
                Some(envelope.payload_len()),
                FrameBuffer::decode_all(envelope.payload())?,
            )
        }
    };

    let messages = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| MessageReport {
            index,
            frame_len: frame.encoded_len(),
            payload_len: frame.payload_len(),
            payload_hex: hex::encode(frame.payload()),
            my_uint32: Record::decode(frame.payload()).ok().map(|r| r.my_uint32()),
        })
        .collect();

    Ok(BufferReport {
        mode,
        total_len: data.len(),
        envelope_len,
        messages,
    })
}
