//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
//! Startup version check.
//!
//! TdLib unconditionally emits `updateOption { name: "version", .. }` as its
//! first packet. The client compares that value with the schema version it was
//! built against before any query runs.

use std::time::Duration;

use tdgram_schema::{Object, Response, TdType};

/// Why the first packet failed verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandshakeMismatch {
    /// TdLib said nothing at all within the handshake timeout.
    #[error("no packet received from TdLib within {timeout:?}")]
    NoPacket {
        /// How long the client waited.
        timeout: Duration,
    },
    /// The first packet was not an option update.
    #[error("First packet supposed to be \"UpdateOption\" received \"{received}\"")]
    UnexpectedPacket {
        /// Wire type of the packet that did arrive.
        received: String,
    },
    /// The option update carried a non-string value.
    #[error("Client TdLib version arrived as \"{value_type}\" instead of a string")]
    NonStringVersion {
        /// Wire type of the option value.
        value_type: String,
    },
    /// TdLib and schema versions differ.
    #[error("Client TdLib version \"{client}\" doesn't match Schema version \"{schema}\"")]
    VersionMismatch {
        /// Version reported by TdLib.
        client: String,
        /// Version the schema was built for.
        schema: String,
    },
}

/// Check the first packet TdLib produced against `expected`.
pub fn verify_handshake(
    first: Option<&Response>,
    expected: &str,
    timeout: Duration,
) -> Result<(), HandshakeMismatch> {
    let first = first.ok_or(HandshakeMismatch::NoPacket { timeout })?;

    let Object::UpdateOption(update) = &first.body else {
        return Err(HandshakeMismatch::UnexpectedPacket {
            received: first.type_name().to_owned(),
        });
    };

    let client = update
        .value
        .as_str()
        .ok_or_else(|| HandshakeMismatch::NonStringVersion {
            value_type: update.value.type_name().to_owned(),
        })?;

    if client != expected {
        return Err(HandshakeMismatch::VersionMismatch {
            client: client.to_owned(),
            schema: expected.to_owned(),
        });
    }

    tracing::debug!(version = client, "TdLib version verified");
    Ok(())
}
