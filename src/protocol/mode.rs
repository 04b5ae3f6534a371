//! Output mode selector.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ProtolistError;

/// Which encoding a buffer carries.
///
/// The mode travels with the buffer to the sink, which must declare the
/// matching bulk format to the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One length-delimited message.
    #[default]
    Single,
    /// One outer frame wrapping many length-delimited messages.
    List,
}

impl Mode {
    /// ClickHouse input format name for this mode.
    pub fn format_name(self) -> &'static str {
        match self {
            Mode::Single => "Protobuf",
            Mode::List => "ProtobufList",
        }
    }

    pub fn from_list_flag(list: bool) -> Self {
        if list {
            Mode::List
        } else {
            Mode::Single
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Single => f.write_str("single"),
            Mode::List => f.write_str("list"),
        }
    }
}

impl FromStr for Mode {
    type Err = ProtolistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "protobuf" => Ok(Mode::Single),
            "list" | "protobuflist" => Ok(Mode::List),
            other => Err(ProtolistError::Config(format!("unknown mode '{}'", other))),
        }
    }
}
