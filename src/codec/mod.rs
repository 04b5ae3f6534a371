//! Codec module - field serialization for records.
//!
//! The framing layer never looks inside a payload; it only needs the bytes a
//! schema encoder produced for one record. [`SchemaEncoder`] is that seam:
//!
//! - [`ProtobufEncoder`] - protobuf field encoding via `prost`
//!
//! # Example
//!
//! ```
//! use protolist::codec::{ProtobufEncoder, SchemaEncoder};
//! use protolist::Record;
//!
//! let payload = ProtobufEncoder::new().encode(&Record::new(2)).unwrap();
//! assert_eq!(&payload[..], &[0x08, 0x02]);
//! ```

mod protobuf;

use bytes::Bytes;

use crate::error::Result;
use crate::record::Record;

pub use protobuf::{ProtobufEncoder, DEFAULT_MAX_MESSAGE_SIZE};

/// Turns a record into wire-format field bytes.
///
/// Implementations must be deterministic and side-effect free. A rejected
/// record is reported as `ProtolistError::Serialization`.
pub trait SchemaEncoder {
    fn encode(&self, record: &Record) -> Result<Bytes>;
}

impl<E: SchemaEncoder + ?Sized> SchemaEncoder for &E {
    fn encode(&self, record: &Record) -> Result<Bytes> {
        (**self).encode(record)
    }
}
