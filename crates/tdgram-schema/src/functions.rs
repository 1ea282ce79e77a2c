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

use crate::objects::{LogStream, OptionValue};
use crate::TdType;

/// Requests that can be sent to or executed by TdLib.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum Function {
    /// Read the value of an option.
    GetOption {
        /// Option name.
        name: String,
    },
    /// Change the value of an option.
    SetOption {
        /// Option name.
        name: String,
        /// New value; [`OptionValue::Empty`] resets the option.
        value: OptionValue,
    },
    /// Change the verbosity of the internal TdLib log.
    SetLogVerbosityLevel {
        /// 0 = fatal, 1 = errors, 2 = warnings, 3 = info, 4 = debug, 5 = verbose,
        /// up to 1023 for even more output.
        new_verbosity_level: i32,
    },
    /// Read the verbosity of the internal TdLib log.
    GetLogVerbosityLevel,
    /// Redirect the internal TdLib log.
    SetLogStream {
        /// New destination.
        log_stream: LogStream,
    },
    /// Read the current log destination.
    GetLogStream,
    /// Change the verbosity of a single internal log tag.
    SetLogTagVerbosityLevel {
        /// Log tag name.
        tag: String,
        /// New verbosity for that tag.
        new_verbosity_level: i32,
    },
    /// Close the TdLib instance.
    Close,
}

impl TdType for Function {
    fn type_name(&self) -> &'static str {
        match self {
            Function::GetOption { .. } => "getOption",
            Function::SetOption { .. } => "setOption",
            Function::SetLogVerbosityLevel { .. } => "setLogVerbosityLevel",
            Function::GetLogVerbosityLevel => "getLogVerbosityLevel",
            Function::SetLogStream { .. } => "setLogStream",
            Function::GetLogStream => "getLogStream",
            Function::SetLogTagVerbosityLevel { .. } => "setLogTagVerbosityLevel",
            Function::Close => "close",
        }
    }
}
