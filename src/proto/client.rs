//! Per-query TCP transport
//!
//! Each query opens its own connection: the request goes out as a single
//! JSON line, the send side is closed, and the server streams back
//! newline-delimited messages until it finishes the query.

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;

use super::message::{parse_message, Message, MessageSource};

/// A query request as sent on the wire.
///
/// `repr` asks the server to render property and tag values as
/// display-ready strings instead of raw typed values.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// The query text to execute.
    pub text: String,
    /// Request display-ready value rendering.
    pub repr: bool,
}

/// Client for a delve query server.
///
/// Holds only the server address; every call to [`Client::query`] opens a
/// fresh connection, so dropping the returned stream abandons that query
/// without disturbing any other.
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
}

impl Client {
    /// Create a client for the server at `addr` (a `host:port` pair).
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// The server address this client talks to.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Execute a query and return the message stream for its results.
    pub async fn query(&self, text: &str) -> Result<QueryStream<BufReader<OwnedReadHalf>>> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .with_context(|| format!("Failed to connect to {}", self.addr))?;
        let (read_half, mut write_half) = stream.into_split();

        let request = QueryRequest {
            text: text.to_string(),
            repr: true,
        };
        let mut line = serde_json::to_string(&request).context("Failed to encode query")?;
        line.push('\n');

        write_half
            .write_all(line.as_bytes())
            .await
            .context("Failed to send query")?;
        write_half
            .shutdown()
            .await
            .context("Failed to close the send side")?;

        Ok(QueryStream::new(BufReader::new(read_half)))
    }
}

/// Message stream for one query execution.
///
/// Wraps any buffered byte source, so tests can drive the interpreter from
/// in-memory scripts while the client feeds it a socket.
#[derive(Debug)]
pub struct QueryStream<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> QueryStream<R> {
    /// Wrap a buffered reader carrying newline-delimited messages.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> MessageSource for QueryStream<R> {
    async fn next_message(&mut self) -> Result<Option<Message>> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .context("Failed to read from query stream")?
        {
            if let Some(mesg) = parse_message(&line)? {
                return Ok(Some(mesg));
            }
        }
        Ok(None)
    }
}
