//! # protolist
//!
//! Varint-framed protobuf encoding for ClickHouse bulk inserts.
//!
//! ClickHouse reads protobuf input in two shapes:
//!
//! - **`Protobuf`** (single mode): one length-delimited message
//! - **`ProtobufList`** (list mode): one outer length-delimited envelope whose
//!   payload is a run of length-delimited messages
//!
//! ```text
//! Frame       := varint(len(payload)) ++ payload
//! Envelope    := varint(len(innerConcat)) ++ innerConcat
//! innerConcat := Frame_1 ++ ... ++ Frame_N
//! ```
//!
//! ## Example
//!
//! ```
//! use protolist::{Encoder, EncoderConfig, Mode, Record, RecordSource};
//!
//! let encoder = Encoder::new(EncoderConfig::new(Mode::Single));
//! let buffer = encoder.encode(&RecordSource::One(Record::new(1))).unwrap();
//!
//! assert_eq!(buffer.as_bytes(), &[0x02, 0x08, 0x01]);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod inspect;
pub mod protocol;
pub mod sink;

mod encoder;
mod record;

pub use config::{ClickHouseConfig, Config, EncoderConfig, OutputTarget};
pub use encoder::{EncodedBuffer, Encoder, RecordSource};
pub use error::{ProtolistError, Result, Stage};
pub use protocol::Mode;
pub use record::{Record, RECORD_COLUMNS, RECORD_MESSAGE_NAME};
