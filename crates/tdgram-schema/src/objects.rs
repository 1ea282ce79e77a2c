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
use serde_json::Value as JsonValue;
use serde_with::{serde_as, DisplayFromStr};

use crate::TdType;

/// Objects TdLib emits: responses to functions and unsolicited updates.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum Object {
    /// An error reported by TdLib.
    Error(TdError),
    /// Generic success acknowledgement.
    Ok,
    /// A TdLib option changed; the first packet TdLib ever emits is the `version` option.
    UpdateOption(UpdateOption),
    /// Authorization state transition. The state itself is kept opaque.
    UpdateAuthorizationState(AuthorizationStateUpdate),
    /// Current verbosity of the internal TdLib log.
    LogVerbosityLevel(LogVerbosityLevel),
    /// Boolean option value.
    OptionValueBoolean {
        /// The value.
        value: bool,
    },
    /// Option has no value.
    OptionValueEmpty,
    /// Integer option value; int64 travels as a decimal string.
    OptionValueInteger {
        /// The value.
        #[serde_as(as = "DisplayFromStr")]
        value: i64,
    },
    /// String option value.
    OptionValueString {
        /// The value.
        value: String,
    },
    /// Log goes to stderr or the OS log.
    LogStreamDefault,
    /// Log goes to a file.
    LogStreamFile {
        /// Path to the log file.
        path: String,
        /// Rotation threshold in bytes.
        max_file_size: i64,
        /// Whether stderr is redirected into the file as well.
        #[serde(default)]
        redirect_stderr: bool,
    },
    /// Log is discarded.
    LogStreamEmpty,
}

impl Object {
    /// Every `@type` this registry can decode into an [`Object`].
    pub const TYPE_NAMES: &'static [&'static str] = &[
        "error",
        "ok",
        "updateOption",
        "updateAuthorizationState",
        "logVerbosityLevel",
        "optionValueBoolean",
        "optionValueEmpty",
        "optionValueInteger",
        "optionValueString",
        "logStreamDefault",
        "logStreamFile",
        "logStreamEmpty",
    ];

    /// Whether `type_name` is decodable by this registry.
    pub fn is_known(type_name: &str) -> bool {
        Self::TYPE_NAMES.contains(&type_name)
    }

    /// Borrow the error payload when this object is an [`Object::Error`].
    pub fn as_error(&self) -> Option<&TdError> {
        match self {
            Object::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Reinterpret an `optionValue*` object as an [`OptionValue`].
    pub fn as_option_value(&self) -> Option<OptionValue> {
        match self {
            Object::OptionValueBoolean { value } => Some(OptionValue::Boolean { value: *value }),
            Object::OptionValueEmpty => Some(OptionValue::Empty),
            Object::OptionValueInteger { value } => Some(OptionValue::Integer { value: *value }),
            Object::OptionValueString { value } => Some(OptionValue::String {
                value: value.clone(),
            }),
            _ => None,
        }
    }
}

impl TdType for Object {
    fn type_name(&self) -> &'static str {
        match self {
            Object::Error(_) => "error",
            Object::Ok => "ok",
            Object::UpdateOption(_) => "updateOption",
            Object::UpdateAuthorizationState(_) => "updateAuthorizationState",
            Object::LogVerbosityLevel(_) => "logVerbosityLevel",
            Object::OptionValueBoolean { .. } => "optionValueBoolean",
            Object::OptionValueEmpty => "optionValueEmpty",
            Object::OptionValueInteger { .. } => "optionValueInteger",
            Object::OptionValueString { .. } => "optionValueString",
            Object::LogStreamDefault => "logStreamDefault",
            Object::LogStreamFile { .. } => "logStreamFile",
            Object::LogStreamEmpty => "logStreamEmpty",
        }
    }
}

/// Error object carrying a numeric code and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TdError {
    /// TdLib error code.
    pub code: i32,
    /// Error description.
    pub message: String,
}

impl TdError {
    /// Construct an error payload.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// `updateOption` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOption {
    /// Option name.
    pub name: String,
    /// New option value.
    pub value: OptionValue,
}

impl UpdateOption {
    /// Construct an option update.
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// `updateAuthorizationState` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationStateUpdate {
    /// The new state, kept as raw JSON.
    pub authorization_state: JsonValue,
}

/// `logVerbosityLevel` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogVerbosityLevel {
    /// Current verbosity.
    pub verbosity_level: i32,
}

/// Value of a TdLib option, as embedded in `updateOption` and `setOption`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum OptionValue {
    /// `optionValueBoolean`.
    #[serde(rename = "optionValueBoolean")]
    Boolean {
        /// The value.
        value: bool,
    },
    /// `optionValueEmpty`.
    #[serde(rename = "optionValueEmpty")]
    Empty,
    /// `optionValueInteger`.
    #[serde(rename = "optionValueInteger")]
    Integer {
        /// The value.
        #[serde_as(as = "DisplayFromStr")]
        value: i64,
    },
    /// `optionValueString`.
    #[serde(rename = "optionValueString")]
    String {
        /// The value.
        value: String,
    },
}

impl OptionValue {
    /// Convenience constructor for string values.
    pub fn string(value: impl Into<String>) -> Self {
        OptionValue::String {
            value: value.into(),
        }
    }

    /// Borrow the string contents of an `optionValueString`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String { value } => Some(value),
            _ => None,
        }
    }
}

impl TdType for OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Boolean { .. } => "optionValueBoolean",
            OptionValue::Empty => "optionValueEmpty",
            OptionValue::Integer { .. } => "optionValueInteger",
            OptionValue::String { .. } => "optionValueString",
        }
    }
}

/// Destination of the internal TdLib log, as embedded in `setLogStream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum LogStream {
    /// `logStreamDefault`: stderr or the platform log.
    #[serde(rename = "logStreamDefault")]
    Default,
    /// `logStreamFile`: a size-rotated file.
    #[serde(rename = "logStreamFile")]
    File {
        /// Path to the log file.
        path: String,
        /// Rotation threshold in bytes.
        max_file_size: i64,
        /// Whether stderr is redirected into the file as well.
        #[serde(default)]
        redirect_stderr: bool,
    },
    /// `logStreamEmpty`: discard everything.
    #[serde(rename = "logStreamEmpty")]
    Empty,
}

impl TdType for LogStream {
    fn type_name(&self) -> &'static str {
        match self {
            LogStream::Default => "logStreamDefault",
            LogStream::File { .. } => "logStreamFile",
            LogStream::Empty => "logStreamEmpty",
        }
    }
}
