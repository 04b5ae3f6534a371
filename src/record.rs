//! The record type written to the remote table.
//!
//! Field tags match the `clickhouse_protolist.v1.Record` schema that the
//! table's `format_schema` setting points at:
//!
//! ```text
//! message Record {
//!   uint32 my_uint32 = 1;
//! }
//! ```

use prost::Message;

/// Fully-qualified protobuf message name, as used in `format_schema`.
pub const RECORD_MESSAGE_NAME: &str = "clickhouse_protolist.v1.Record";

/// Column names the record's fields map to, in tag order.
pub const RECORD_COLUMNS: &[&str] = &["my_uint32"];

/// One row. Built once from external input and consumed by the serializer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Message)]
pub struct Record {
    #[prost(uint32, tag = "1")]
    my_uint32: u32,
}

impl Record {
    pub fn new(my_uint32: u32) -> Self {
        Self { my_uint32 }
    }

    #[inline]
    pub fn my_uint32(&self) -> u32 {
        self.my_uint32
    }
}

impl From<u32> for Record {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}
