//! Transport abstraction: a framed, full-duplex byte-message channel.
//!
//! Both transports push whole decoded messages onto an internal queue that
//! `recv` pulls from, so the JSON-RPC client never needs to know whether the
//! bytes underneath came from a pipe or an SSE stream.

pub mod sse;
pub mod stdio;
pub mod validate;

use crate::errors::TransportResult;
use async_trait::async_trait;

/// One line/event off the wire, or a transport-level error observed while
/// reading. Transport errors surfaced this way do not terminate the reader
/// loop by themselves; `recv` returning `None` means the transport closed.
pub type Incoming = TransportResult<String>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one already-serialized JSON-RPC message.
    async fn send(&self, message: &str) -> TransportResult<()>;

    /// Pull the next message (or transport error) off the wire. Returns
    /// `None` once the transport is closed and no further messages remain.
    async fn recv(&self) -> Option<Incoming>;

    async fn close(&self) -> TransportResult<()>;

    fn is_connected(&self) -> bool;
}

pub use sse::HttpSseTransport;
pub use stdio::StdioTransport;
