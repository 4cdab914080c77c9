//! Parameter schema helpers.
//!
//! A small reflection layer that derives JSON Schema `parameters` objects
//! from Rust types, so an action's schema can be written as
//! `ObjectSchema::new().param::<String>("file_name")` instead of a literal.
//! It only produces a `serde_json::Value`; the catalog never depends on it.

use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};

/// The JSON Schema primitive types used in action parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Integer => "integer",
            JsonType::Number => "number",
            JsonType::Boolean => "boolean",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

/// Maps a Rust type onto its JSON Schema type.
///
/// `REQUIRED` is false only for `Option<T>`, which makes the parameter
/// optional in the generated schema.
pub trait JsonSchemaType {
    const JSON_TYPE: JsonType;
    const REQUIRED: bool = true;
}

macro_rules! json_schema_type {
    ($json:expr => $($ty:ty),+ $(,)?) => {
        $(impl JsonSchemaType for $ty {
            const JSON_TYPE: JsonType = $json;
        })+
    };
}

json_schema_type!(JsonType::String => String, char, std::path::PathBuf);
json_schema_type!(JsonType::Integer => i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
json_schema_type!(JsonType::Number => f32, f64);
json_schema_type!(JsonType::Boolean => bool);
json_schema_type!(JsonType::Object => Value, Map<String, Value>);

impl JsonSchemaType for &str {
    const JSON_TYPE: JsonType = JsonType::String;
}

impl<T> JsonSchemaType for Vec<T> {
    const JSON_TYPE: JsonType = JsonType::Array;
}

impl<V> JsonSchemaType for HashMap<String, V> {
    const JSON_TYPE: JsonType = JsonType::Object;
}

impl<V> JsonSchemaType for BTreeMap<String, V> {
    const JSON_TYPE: JsonType = JsonType::Object;
}

impl<T: JsonSchemaType> JsonSchemaType for Option<T> {
    const JSON_TYPE: JsonType = T::JSON_TYPE;
    const REQUIRED: bool = false;
}

/// Builder for an object-typed parameter schema.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter typed after `T`.
    pub fn param<T: JsonSchemaType>(self, name: &str) -> Self {
        self.insert::<T>(name, json!({ "type": T::JSON_TYPE.as_str() }))
    }

    /// Add a parameter typed after `T` with a description for the model.
    pub fn param_with_description<T: JsonSchemaType>(self, name: &str, description: &str) -> Self {
        self.insert::<T>(
            name,
            json!({ "type": T::JSON_TYPE.as_str(), "description": description }),
        )
    }

    fn insert<T: JsonSchemaType>(mut self, name: &str, property: Value) -> Self {
        self.properties.insert(name.to_string(), property);
        self.required.retain(|r| r != name);
        if T::REQUIRED {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        })
    }
}

/// The schema of an action that takes no arguments.
pub fn empty_object_schema() -> Value {
    ObjectSchema::new().build()
}
