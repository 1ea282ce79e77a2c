//! ---
//! tdg_section: "01-schema"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Typed TDLib schema and JSON envelope codec."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use serde_json::Value as JsonValue;

use crate::{Object, Request, Response, Result, SchemaError};

/// TdLib version this schema was generated for. The client refuses to talk to
/// any other version.
pub const SCHEMA_VERSION: &str = "1.6.0";

/// Decode a raw TdLib payload into a typed [`Response`].
pub fn decode(raw: JsonValue) -> Result<Response> {
    let type_name = raw
        .get("@type")
        .and_then(JsonValue::as_str)
        .ok_or(SchemaError::MissingType)?
        .to_owned();

    if !Object::is_known(&type_name) {
        return Err(SchemaError::UnknownType(type_name));
    }

    serde_json::from_value(raw).map_err(|source| SchemaError::Malformed { type_name, source })
}

/// Encode a typed [`Request`] into the raw form TdLib expects.
pub fn encode(request: &Request) -> Result<JsonValue> {
    serde_json::to_value(request).map_err(SchemaError::Encode)
}
