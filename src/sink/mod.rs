//! Sink module - delivering finished buffers.
//!
//! A sink receives an [`EncodedBuffer`] and persists or transmits it as-is.
//! It never re-frames, truncates, or inspects the bytes; the format it
//! declares downstream comes from the buffer's mode.
//!
//! - [`FileSink`] - write the buffer to a file
//! - [`ClickHouseSink`] - insert the buffer into a table over HTTP
//!
//! Delivery is not retried here. A failed delivery leaves the buffer valid,
//! so callers may deliver the same buffer again.

mod clickhouse;
mod file;

use crate::config::OutputTarget;
use crate::encoder::EncodedBuffer;
use crate::error::Result;

pub use clickhouse::ClickHouseSink;
pub use file::FileSink;

/// Destination for encoded buffers.
pub trait Sink {
    fn deliver(&self, buffer: &EncodedBuffer) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn deliver(&self, buffer: &EncodedBuffer) -> Result<()> {
        (**self).deliver(buffer)
    }
}

/// Build the sink for a configured output target.
///
/// # Errors
///
/// Returns `Config` if the remote settings are invalid.
pub fn open_sink(target: &OutputTarget) -> Result<Box<dyn Sink>> {
    match target {
        OutputTarget::File(path) => Ok(Box::new(FileSink::new(path))),
        OutputTarget::ClickHouse(config) => Ok(Box::new(ClickHouseSink::new(config.clone())?)),
    }
}
