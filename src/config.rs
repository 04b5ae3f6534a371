//! Immutable configuration values.
//!
//! Everything an invocation needs (mode, output target, remote table) is
//! passed in explicitly through these types. The binary builds them from
//! command-line flags; library callers build them directly.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::codec::DEFAULT_MAX_MESSAGE_SIZE;
use crate::error::{ProtolistError, Result};
use crate::protocol::Mode;
use crate::record::RECORD_MESSAGE_NAME;

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "protoBytes.bin";

/// Default ClickHouse HTTP endpoint.
pub const DEFAULT_CLICKHOUSE_URL: &str = "http://127.0.0.1:8123";

/// Default database and table for inserts.
pub const DEFAULT_DATABASE: &str = "clickhouse_protolist";
pub const DEFAULT_TABLE: &str = "clickhouse_protolist";

/// Default schema file on the ClickHouse server.
pub const DEFAULT_SCHEMA_FILE: &str = "clickhouse_protolist.proto";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for turning records into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Single frame or list envelope.
    pub mode: Mode,
    /// Largest accepted encoded record.
    pub max_message_size: usize,
}

impl EncoderConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    pub fn max_message_size(mut self, limit: usize) -> Self {
        self.max_message_size = limit;
        self
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new(Mode::Single)
    }
}

/// Connection and table settings for remote inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHouseConfig {
    /// HTTP interface base URL.
    pub url: String,
    pub database: String,
    pub table: String,
    /// Value of the `format_schema` setting (`file.proto:Message`).
    pub format_schema: String,
    pub user: String,
    pub password: String,
    pub timeout: Duration,
}

impl ClickHouseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn format_schema(mut self, format_schema: impl Into<String>) -> Self {
        self.format_schema = format_schema.into();
        self
    }

    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse and check the base URL.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the URL is malformed, not http(s), or the
    /// database/table names are empty.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| ProtolistError::Config(format!("invalid url '{}': {}", self.url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ProtolistError::Config(format!(
                "url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if !is_identifier(&self.database) {
            return Err(ProtolistError::Config(format!(
                "invalid database name '{}'",
                self.database
            )));
        }
        if !is_identifier(&self.table) {
            return Err(ProtolistError::Config(format!(
                "invalid table name '{}'",
                self.table
            )));
        }
        Ok(url)
    }
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CLICKHOUSE_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            table: DEFAULT_TABLE.to_string(),
            format_schema: format!("{}:{}", DEFAULT_SCHEMA_FILE, RECORD_MESSAGE_NAME),
            user: "default".to_string(),
            password: String::new(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Where the finished buffer goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    ClickHouse(ClickHouseConfig),
}

impl Default for OutputTarget {
    fn default() -> Self {
        OutputTarget::File(PathBuf::from(DEFAULT_OUTPUT_FILE))
    }
}

/// Full configuration for one encode-and-deliver invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub encoder: EncoderConfig,
    pub target: OutputTarget,
    /// Also write the encoded buffer here before delivery.
    pub dump_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.encoder.mode, Mode::Single);
        assert_eq!(
            config.target,
            OutputTarget::File(PathBuf::from("protoBytes.bin"))
        );
        assert!(config.dump_path.is_none());
    }

    #[test]
    fn test_default_format_schema() {
        let ch = ClickHouseConfig::default();
        assert_eq!(
            ch.format_schema,
            "clickhouse_protolist.proto:clickhouse_protolist.v1.Record"
        );
    }

    #[test]
    fn test_builder() {
        let ch = ClickHouseConfig::new("http://db:8123")
            .database("metrics")
            .table("events")
            .credentials("dave", "secret")
            .timeout(Duration::from_secs(3));

        assert_eq!(ch.url, "http://db:8123");
        assert_eq!(ch.database, "metrics");
        assert_eq!(ch.table, "events");
        assert_eq!(ch.user, "dave");
        assert_eq!(ch.timeout, Duration::from_secs(3));
        assert!(ch.base_url().is_ok());
    }

    #[test]
    fn test_base_url_rejects_bad_scheme() {
        let ch = ClickHouseConfig::new("tcp://127.0.0.1:9001");
        let err = ch.base_url().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_base_url_rejects_bad_table() {
        let ch = ClickHouseConfig::default().table("t; DROP TABLE x");
        assert!(ch.base_url().is_err());
    }
}
