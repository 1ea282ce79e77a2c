//! ---
//! tdg_section: "01-schema"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Typed TDLib schema and JSON envelope codec."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::{Function, Object};

/// Anything carrying a wire `@type` tag.
pub trait TdType {
    /// The `@type` name as it appears on the wire.
    fn type_name(&self) -> &'static str;
}

/// Envelope pairing a typed body with its optional `@extra` correlation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet<T> {
    /// Correlation token. `None` for unsolicited updates and untagged requests.
    #[serde(rename = "@extra", default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    /// The `@type`-tagged body.
    #[serde(flatten)]
    pub body: T,
}

/// Outgoing request envelope.
pub type Request = Packet<Function>;

/// Incoming response or update envelope.
pub type Response = Packet<Object>;

impl<T> Packet<T> {
    /// Wrap a body without a correlation token.
    pub fn new(body: T) -> Self {
        Self { extra: None, body }
    }

    /// Wrap a body with a pre-assigned correlation token.
    pub fn with_extra(body: T, extra: impl Into<String>) -> Self {
        Self {
            extra: Some(extra.into()),
            body,
        }
    }

    /// Borrow the correlation token, if any.
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }
}

impl<T: TdType> TdType for Packet<T> {
    fn type_name(&self) -> &'static str {
        self.body.type_name()
    }
}

impl From<Function> for Request {
    fn from(body: Function) -> Self {
        Packet::new(body)
    }
}

impl From<Object> for Response {
    fn from(body: Object) -> Self {
        Packet::new(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_is_omitted_when_unset() {
        let request = Request::new(Function::GetOption {
            name: "version".into(),
        });
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value, json!({"@type": "getOption", "name": "version"}));
    }

    #[test]
    fn extra_is_flattened_next_to_type() {
        let response = Response::with_extra(Object::Ok, "42");
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value, json!({"@type": "ok", "@extra": "42"}));
        assert_eq!(response.extra(), Some("42"));
        assert_eq!(response.type_name(), "ok");
    }
}
