//! Frame buffer for reading frames back out of a byte stream.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management.
//! Implements a state machine for handling fragmented frames:
//! - `WaitingForLength`: Need a complete varint length prefix
//! - `WaitingForPayload`: Length parsed, need N more payload bytes
//!
//! # Example
//!
//! ```
//! use protolist::protocol::{frame, FrameBuffer};
//!
//! let mut buffer = FrameBuffer::new();
//! let frames = buffer.push(&frame(b"hello")).unwrap();
//!
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].payload(), b"hello");
//! assert!(buffer.is_empty());
//! ```

use bytes::BytesMut;

use super::varint::decode_varint;
use super::Frame;
use crate::error::{ProtolistError, Result};

/// Default maximum payload size (64 MB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u64 = 64 * 1024 * 1024;

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for a complete varint length prefix.
    WaitingForLength,
    /// Length parsed, waiting for payload bytes.
    WaitingForPayload { remaining: usize },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed payload size.
    max_payload_size: u64,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Create a new frame buffer with custom max payload size.
    pub fn with_max_payload(max_payload_size: u64) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4 * 1024),
            state: State::WaitingForLength,
            max_payload_size,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Partial data is kept for the next push.
    ///
    /// # Errors
    ///
    /// Returns error if a length prefix is malformed or the payload exceeds
    /// `max_payload_size`.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }

        Ok(frames)
    }

    /// Decode a complete buffer that must contain only whole frames.
    ///
    /// # Errors
    ///
    /// Returns error if the data ends in the middle of a frame.
    pub fn decode_all(data: &[u8]) -> Result<Vec<Frame>> {
        let mut buffer = Self::with_max_payload(data.len() as u64);
        let frames = buffer.push(data)?;
        buffer.finish()?;
        Ok(frames)
    }

    /// Check that no partial frame is left behind.
    pub fn finish(&self) -> Result<()> {
        match &self.state {
            State::WaitingForLength if self.buffer.is_empty() => Ok(()),
            State::WaitingForLength => Err(ProtolistError::Protocol(format!(
                "truncated length prefix ({} trailing bytes)",
                self.buffer.len()
            ))),
            State::WaitingForPayload { remaining } => Err(ProtolistError::Protocol(format!(
                "truncated payload: expected {} bytes, have {}",
                remaining,
                self.buffer.len()
            ))),
        }
    }

    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        match &self.state {
            State::WaitingForLength => {
                let Some((length, consumed)) = decode_varint(&self.buffer)? else {
                    return Ok(None);
                };

                if length > self.max_payload_size {
                    return Err(ProtolistError::Protocol(format!(
                        "Payload size {} exceeds maximum {}",
                        length, self.max_payload_size
                    )));
                }

                let _ = self.buffer.split_to(consumed);
                self.state = State::WaitingForPayload {
                    remaining: length as usize,
                };

                self.try_extract_one()
            }

            State::WaitingForPayload { remaining } => {
                let remaining = *remaining;
                if self.buffer.len() < remaining {
                    return Ok(None);
                }

                let payload = self.buffer.split_to(remaining).freeze();
                self.state = State::WaitingForLength;

                Ok(Some(Frame::new(payload)))
            }
        }
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForLength => "WaitingForLength",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
