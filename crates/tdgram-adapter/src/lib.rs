//! ---
//! tdg_section: "02-transport"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Transport contract and loopback transport."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
//! Transport contract between the tdgram client and a TdLib instance.
#![warn(missing_docs)]

use std::time::Duration;

use serde_json::Value as JsonValue;
use tdgram_schema::Request;

pub mod memory;

/// Shared result type for transport operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Wrapper for IO errors raised by the underlying channel.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Raw data coming from TdLib was not valid JSON.
    #[error("invalid json from tdlib: {0}")]
    Json(#[from] serde_json::Error),
    /// A request could not be encoded for the wire.
    #[error("schema error: {0}")]
    Schema(#[from] tdgram_schema::SchemaError),
    /// The transport was shut down.
    #[error("transport closed")]
    Closed,
}

/// Blocking send/receive/execute surface of a single TdLib instance.
pub trait Adapter {
    /// Queue a request for asynchronous processing. Responses arrive through
    /// [`Adapter::receive`].
    fn send(&self, request: &Request) -> Result<()>;

    /// Wait up to `timeout` for the next raw payload. `Ok(None)` means nothing
    /// arrived in time.
    fn receive(&self, timeout: Duration) -> Result<Option<JsonValue>>;

    /// Synchronously execute a request that needs no response correlation.
    fn execute(&self, request: &Request) -> Result<()>;
}

impl<A: Adapter + ?Sized> Adapter for Box<A> {
    fn send(&self, request: &Request) -> Result<()> {
        (**self).send(request)
    }

    fn receive(&self, timeout: Duration) -> Result<Option<JsonValue>> {
        (**self).receive(timeout)
    }

    fn execute(&self, request: &Request) -> Result<()> {
        (**self).execute(request)
    }
}

pub use memory::InMemoryAdapter;
