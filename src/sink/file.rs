//! File sink.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Sink;
use crate::encoder::EncodedBuffer;
use crate::error::Result;

/// Writes each delivered buffer to a file, replacing previous contents.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn deliver(&self, buffer: &EncodedBuffer) -> Result<()> {
        let mut file = File::create(&self.path)?;
        file.write_all(buffer.as_bytes())?;
        file.flush()?;

        tracing::info!(
            path = %self.path.display(),
            bytes = buffer.len(),
            mode = %buffer.mode(),
            "wrote buffer to file"
        );
        Ok(())
    }
}
