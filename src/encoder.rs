//! Record-to-buffer encoding.
//!
//! The [`Encoder`] runs the whole core for one invocation:
//!
//! ```text
//! Record -> SchemaEncoder -> frame -> (wrap_envelope) -> EncodedBuffer
//! ```
//!
//! All inner frames are produced first; the envelope is built once from the
//! finished set. Either a complete buffer comes back or an error does.
//!
//! # Example
//!
//! ```
//! use protolist::{Encoder, EncoderConfig, Mode, Record, RecordSource};
//!
//! let encoder = Encoder::new(EncoderConfig::new(Mode::List));
//! let buffer = encoder
//!     .encode(&RecordSource::Batch(vec![Record::new(1), Record::new(2)]))
//!     .unwrap();
//!
//! assert_eq!(buffer.mode(), Mode::List);
//! assert_eq!(buffer.as_bytes(), &[0x06, 0x02, 0x08, 0x01, 0x02, 0x08, 0x02]);
//! ```

use bytes::Bytes;

use crate::codec::{ProtobufEncoder, SchemaEncoder};
use crate::config::EncoderConfig;
use crate::error::{ProtolistError, Result};
use crate::protocol::{frame, wrap_envelope, Mode};
use crate::record::Record;

/// Records available to one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// A context that only ever supplies one record.
    One(Record),
    /// An ordered batch of records.
    Batch(Vec<Record>),
}

impl RecordSource {
    pub fn len(&self) -> usize {
        match self {
            RecordSource::One(_) => 1,
            RecordSource::Batch(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this source can feed a list envelope.
    pub fn supports_batch(&self) -> bool {
        matches!(self, RecordSource::Batch(_))
    }

    pub fn records(&self) -> &[Record] {
        match self {
            RecordSource::One(record) => std::slice::from_ref(record),
            RecordSource::Batch(records) => records,
        }
    }
}

impl From<Record> for RecordSource {
    fn from(record: Record) -> Self {
        RecordSource::One(record)
    }
}

impl From<Vec<Record>> for RecordSource {
    fn from(records: Vec<Record>) -> Self {
        RecordSource::Batch(records)
    }
}

/// A finished buffer and the mode that produced it.
///
/// Sinks treat the bytes as opaque and take the format declaration from
/// [`mode`](Self::mode) only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBuffer {
    bytes: Bytes,
    mode: Mode,
    records: usize,
}

impl EncodedBuffer {
    pub fn new(bytes: Bytes, mode: Mode, records: usize) -> Self {
        Self {
            bytes,
            mode,
            records,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Cheap clone of the underlying bytes.
    #[inline]
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of records carried.
    #[inline]
    pub fn record_count(&self) -> usize {
        self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encodes record sources into framed buffers.
pub struct Encoder<E = ProtobufEncoder> {
    config: EncoderConfig,
    schema: E,
}

impl Encoder<ProtobufEncoder> {
    /// Create an encoder using the protobuf schema encoder.
    pub fn new(config: EncoderConfig) -> Self {
        let schema = ProtobufEncoder::with_max_message_size(config.max_message_size);
        Self { config, schema }
    }
}

impl<E: SchemaEncoder> Encoder<E> {
    /// Create an encoder with a custom schema encoder.
    pub fn with_schema(config: EncoderConfig, schema: E) -> Self {
        Self { config, schema }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode a record source in the configured mode.
    ///
    /// # Errors
    ///
    /// - `UnsupportedMode` if list mode is requested from a single-record
    ///   source, or single mode is given a batch that isn't exactly one record
    /// - `EmptyBatch` if a batch has no records
    /// - `Serialization` if the schema encoder rejects any record
    pub fn encode(&self, source: &RecordSource) -> Result<EncodedBuffer> {
        let mode = self.config.mode;
        check_source(mode, source)?;

        let records = source.records();
        let bytes = match mode {
            Mode::Single => self.frame_record(&records[0])?,
            Mode::List => {
                let frames = records
                    .iter()
                    .map(|record| self.frame_record(record))
                    .collect::<Result<Vec<_>>>()?;
                wrap_envelope(&frames)
            }
        };

        tracing::debug!(
            %mode,
            records = records.len(),
            bytes = bytes.len(),
            "encoded buffer"
        );

        Ok(EncodedBuffer::new(bytes, mode, records.len()))
    }

    fn frame_record(&self, record: &Record) -> Result<Bytes> {
        let payload = self.schema.encode(record)?;
        Ok(frame(&payload))
    }
}

fn check_source(mode: Mode, source: &RecordSource) -> Result<()> {
    if source.is_empty() {
        return Err(ProtolistError::EmptyBatch);
    }
    match mode {
        Mode::Single if source.len() != 1 => Err(ProtolistError::UnsupportedMode(format!(
            "single mode carries exactly one record, got {}",
            source.len()
        ))),
        Mode::List if !source.supports_batch() => Err(ProtolistError::UnsupportedMode(
            "list mode requires a batch record source".to_string(),
        )),
        _ => Ok(()),
    }
}
