//! Invocation — a decoded `{tool, args}` pair.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// The action a reply asked for, and the named arguments to call it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub tool: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl Invocation {
    pub fn new(tool: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            tool: tool.into(),
            args,
        }
    }

    /// Interpret a parsed JSON value as an invocation.
    ///
    /// The value must be an object with a string `tool`. A missing or `null`
    /// `args` means no arguments; any other non-object `args` is rejected.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let Value::Object(mut obj) = value else {
            return Err(DecodeError::MissingTool);
        };

        let tool = match obj.remove("tool") {
            Some(Value::String(tool)) => tool,
            _ => return Err(DecodeError::MissingTool),
        };

        let args = match obj.remove("args") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(args)) => args,
            Some(other) => return Err(DecodeError::InvalidArgs(other.to_string())),
        };

        Ok(Self { tool, args })
    }

    /// The arguments as a JSON object value, as handlers receive them.
    pub fn args_value(&self) -> Value {
        Value::Object(self.args.clone())
    }
}
