//! Error types for protolist.
//!
//! Every error knows which [`Stage`] of an invocation produced it, so the
//! binary can report the failing stage and exit with a stable status code.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for all protolist operations.
#[derive(Debug, Error)]
pub enum ProtolistError {
    /// The schema encoder rejected the record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The requested mode cannot be produced from the given record source.
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// A batch was requested with no records in it.
    #[error("Empty batch: at least one record is required")]
    EmptyBatch,

    /// Malformed framing while decoding (truncated varint, overflow, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error while writing a buffer to a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport failure talking to the remote table.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote table answered with a non-success status.
    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// An input file could not be read.
    #[error("Input error: cannot read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding of an inspection report failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtolistError {
    /// The stage of the invocation this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            ProtolistError::Serialization(_) => Stage::Serialize,
            ProtolistError::UnsupportedMode(_)
            | ProtolistError::EmptyBatch
            | ProtolistError::Protocol(_) => Stage::Frame,
            ProtolistError::Io(_)
            | ProtolistError::Http(_)
            | ProtolistError::Remote { .. }
            | ProtolistError::Json(_) => Stage::Sink,
            ProtolistError::Config(_) => Stage::Config,
            ProtolistError::Input { .. } => Stage::Input,
        }
    }
}

/// Stage of a single encode-and-deliver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Serialize,
    Frame,
    Sink,
    Input,
}

impl Stage {
    /// Process exit code for a failure in this stage.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::Config => 2,
            Stage::Serialize => 3,
            Stage::Frame => 4,
            Stage::Sink => 5,
            Stage::Input => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::Serialize => "serialize",
            Stage::Frame => "frame",
            Stage::Sink => "sink",
            Stage::Input => "input",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias using ProtolistError.
pub type Result<T> = std::result::Result<T, ProtolistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_mapping() {
        assert_eq!(
            ProtolistError::Serialization("bad".into()).stage(),
            Stage::Serialize
        );
        assert_eq!(
            ProtolistError::UnsupportedMode("list".into()).stage(),
            Stage::Frame
        );
        assert_eq!(ProtolistError::EmptyBatch.stage(), Stage::Frame);
        assert_eq!(
            ProtolistError::Remote {
                status: 500,
                body: String::new()
            }
            .stage(),
            Stage::Sink
        );
        assert_eq!(ProtolistError::Config("x".into()).stage(), Stage::Config);
    }

    #[test]
    fn test_input_error_names_path() {
        let err = ProtolistError::Input {
            path: PathBuf::from("/missing/protoBytes.bin"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };

        assert_eq!(err.stage(), Stage::Input);
        assert!(err.to_string().contains("/missing/protoBytes.bin"));
    }

    #[test]
    fn test_exit_codes_are_stable_and_nonzero() {
        let cases = [
            (Stage::Config, 2),
            (Stage::Serialize, 3),
            (Stage::Frame, 4),
            (Stage::Sink, 5),
            (Stage::Input, 6),
        ];

        for (stage, code) in cases {
            assert_eq!(stage.exit_code(), code);
        }
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Serialize.to_string(), "serialize");
        assert_eq!(Stage::Sink.to_string(), "sink");
    }
}
