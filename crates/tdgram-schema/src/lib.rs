//! ---
//! tdg_section: "01-schema"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Typed TDLib schema and JSON envelope codec."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
//! Schema registry for the tdgram workspace.
//!
//! TDLib speaks JSON objects tagged with `@type` and, optionally, an `@extra`
//! correlation value echoed back on responses. This crate models the closed set
//! of requests ([`Function`]) and objects ([`Object`]) the client understands and
//! converts between them and raw [`serde_json::Value`] payloads.
#![warn(missing_docs)]

pub mod functions;
pub mod objects;
pub mod packet;
pub mod registry;

/// Shared result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Failures raised while decoding raw payloads or encoding requests.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The payload is not an object or carries no string `@type` field.
    #[error("payload has no \"@type\" tag")]
    MissingType,
    /// The `@type` tag names a type this registry does not know.
    #[error("unknown TdLib type \"{0}\"")]
    UnknownType(String),
    /// The payload is tagged with a known type but its fields do not match.
    #[error("malformed \"{type_name}\" payload: {source}")]
    Malformed {
        /// Wire type of the offending payload.
        type_name: String,
        /// Underlying serde failure.
        #[source]
        source: serde_json::Error,
    },
    /// Serialization of an outgoing request failed.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

pub use functions::Function;
pub use objects::{
    AuthorizationStateUpdate, LogStream, LogVerbosityLevel, Object, OptionValue, TdError,
    UpdateOption,
};
pub use packet::{Packet, Request, Response, TdType};
pub use registry::{decode, encode, SCHEMA_VERSION};
