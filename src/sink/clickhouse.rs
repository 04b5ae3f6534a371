//! ClickHouse HTTP sink.
//!
//! Sends the buffer as the body of an `INSERT ... FORMAT <fmt>` request:
//!
//! ```text
//! POST /?query=INSERT INTO db.table (my_uint32) FORMAT ProtobufList
//!       &format_schema=clickhouse_protolist.proto:clickhouse_protolist.v1.Record
//! X-ClickHouse-User: ...
//! X-ClickHouse-Key: ...
//!
//! <buffer bytes>
//! ```
//!
//! The format name is chosen from the buffer's [`Mode`], never by looking at
//! the bytes.

use url::Url;

use super::Sink;
use crate::config::ClickHouseConfig;
use crate::encoder::EncodedBuffer;
use crate::error::{ProtolistError, Result};
use crate::protocol::Mode;
use crate::record::RECORD_COLUMNS;

/// Inserts buffers into a ClickHouse table over the HTTP interface.
pub struct ClickHouseSink {
    config: ClickHouseConfig,
    base_url: Url,
    agent: ureq::Agent,
}

impl ClickHouseSink {
    /// Create a sink for the given table.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the URL or table settings are invalid.
    pub fn new(config: ClickHouseConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            config,
            base_url,
            agent,
        })
    }

    pub fn config(&self) -> &ClickHouseConfig {
        &self.config
    }

    /// Insert statement for a buffer of the given mode.
    pub fn insert_query(&self, mode: Mode) -> String {
        format!(
            "INSERT INTO {}.{} ({}) FORMAT {}",
            self.config.database,
            self.config.table,
            RECORD_COLUMNS.join(", "),
            mode.format_name()
        )
    }

    /// Request URL carrying the insert statement and schema setting.
    pub fn insert_url(&self, mode: Mode) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("query", &self.insert_query(mode))
            .append_pair("format_schema", &self.config.format_schema);
        url
    }
}

impl Sink for ClickHouseSink {
    fn deliver(&self, buffer: &EncodedBuffer) -> Result<()> {
        let url = self.insert_url(buffer.mode());
        tracing::debug!(query = %self.insert_query(buffer.mode()), "sending insert");

        let response = self
            .agent
            .request_url("POST", &url)
            .set("X-ClickHouse-User", &self.config.user)
            .set("X-ClickHouse-Key", &self.config.password)
            .set("Content-Type", "application/octet-stream")
            .send_bytes(buffer.as_bytes());

        match response {
            Ok(_) => {
                tracing::info!(
                    database = %self.config.database,
                    table = %self.config.table,
                    format = buffer.mode().format_name(),
                    records = buffer.record_count(),
                    bytes = buffer.len(),
                    "inserted buffer"
                );
                Ok(())
            }
            Err(ureq::Error::Status(status, resp)) => Err(ProtolistError::Remote {
                status,
                body: resp.into_string().unwrap_or_default().trim().to_string(),
            }),
            Err(ureq::Error::Transport(err)) => Err(ProtolistError::Http(err.to_string())),
        }
    }
}
