//! Protobuf schema encoder using `prost`.
//!
//! Produces the bare field encoding of a message. No length delimiter is
//! written here; framing belongs to [`crate::protocol`], so there is exactly
//! one place that computes length prefixes.
//!
//! # Example
//!
//! ```
//! use protolist::codec::{ProtobufEncoder, SchemaEncoder};
//! use protolist::Record;
//!
//! let encoder = ProtobufEncoder::new();
//! let bytes = encoder.encode(&Record::new(1)).unwrap();
//! assert_eq!(&bytes[..], &[0x08, 0x01]);
//! ```

use bytes::{Bytes, BytesMut};
use prost::Message;

use super::SchemaEncoder;
use crate::error::{ProtolistError, Result};
use crate::record::Record;

/// Default maximum encoded message size (1 MB).
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Schema encoder backed by `prost`.
#[derive(Debug, Clone, Copy)]
pub struct ProtobufEncoder {
    max_message_size: usize,
}

impl ProtobufEncoder {
    pub fn new() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Reject messages whose encoding is larger than `max_message_size`.
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self { max_message_size }
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Encode any prost message to its field bytes.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the message is over the size limit or
    /// prost refuses to encode it.
    pub fn encode_message<M: Message>(&self, message: &M) -> Result<Bytes> {
        let len = message.encoded_len();
        if len > self.max_message_size {
            return Err(ProtolistError::Serialization(format!(
                "encoded message is {} bytes, limit is {}",
                len, self.max_message_size
            )));
        }

        let mut buf = BytesMut::with_capacity(len);
        message
            .encode(&mut buf)
            .map_err(|e| ProtolistError::Serialization(e.to_string()))?;
        Ok(buf.freeze())
    }
}

impl Default for ProtobufEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaEncoder for ProtobufEncoder {
    fn encode(&self, record: &Record) -> Result<Bytes> {
        self.encode_message(record)
    }
}
