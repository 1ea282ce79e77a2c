//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
//! Synchronous TdLib client.
//!
//! TdLib pushes every response and update through one receive stream. The
//! [`TdClient`] tags outgoing requests with an `@extra` correlation token, polls
//! the stream until the matching response shows up, and parks everything else in
//! a FIFO backlog that plain [`TdClient::receive`] calls drain later.
#![warn(missing_docs)]

use tdgram_schema::{Request, TdError, TdType};

pub mod backlog;
pub mod client;
pub mod config;
pub mod handshake;
pub mod logging;
pub mod tagging;

/// Shared result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Every way a client call can fail. None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The transport failed to send or receive.
    #[error("transport error: {0}")]
    Transport(#[from] tdgram_adapter::AdapterError),
    /// A received payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] tdgram_schema::SchemaError),
    /// TdLib answered with an `error` object.
    #[error("Received Error Packet {}: \"{}\"", .error.code, .error.message)]
    ErrorReceived {
        /// The error payload.
        error: TdError,
        /// Correlation token the error carried, if any.
        extra: Option<String>,
    },
    /// No response with the request's token arrived before the deadline.
    #[error("Query for \"{}\" packet received timeout", .request.type_name())]
    QueryTimeout {
        /// The request that timed out, token included.
        request: Box<Request>,
    },
    /// Startup verification failed; the client must not be used further.
    #[error(transparent)]
    HandshakeMismatch(#[from] handshake::HandshakeMismatch),
}

impl ClientError {
    /// TdLib error code when this is [`ClientError::ErrorReceived`].
    pub fn code(&self) -> Option<i32> {
        match self {
            ClientError::ErrorReceived { error, .. } => Some(error.code),
            _ => None,
        }
    }

    /// Whether the failure was a query deadline expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::QueryTimeout { .. })
    }
}

pub use backlog::Backlog;
pub use client::TdClient;
pub use config::{ClientConfig, HandshakeConfig, LogStreamConfig, QueryConfig, TdLibLogConfig};
pub use handshake::{verify_handshake, HandshakeMismatch};
pub use logging::{init as init_logging, log_packet, PacketDirection};
pub use tagging::ExtraGenerator;
