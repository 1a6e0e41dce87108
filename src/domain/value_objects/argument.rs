//! Typed module arguments
//!
//! Module manifests declare the arguments their templates consume. Each
//! declaration carries a schema type that is checked when the manifest is
//! parsed (unknown types are rejected) and again after resolution, when the
//! root manifest's values are validated against every declaration.

use std::fmt;

use serde_yaml_ng::Value;

/// The value type an argument accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    List,
    Map,
}

impl ArgumentType {
    /// Parse a schema type name. `array`/`object` are accepted as aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "integer" | "int" => Some(Self::Integer),
            "number" | "float" => Some(Self::Number),
            "boolean" | "bool" => Some(Self::Boolean),
            "list" | "array" => Some(Self::List),
            "map" | "object" => Some(Self::Map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Whether a YAML value has this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Number, Value::Number(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::List, Value::Sequence(_)) => true,
            (Self::Map, Value::Mapping(_)) => true,
            (_, Value::Tagged(tagged)) => self.accepts(&tagged.value),
            _ => false,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "map",
        Value::Tagged(tagged) => describe_value(&tagged.value),
    }
}

/// Argument validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("argument '{name}' is required by {module} but was not provided")]
    Missing { name: String, module: String },

    #[error("argument '{name}' (declared by {module}) must be a {expected}, got a {found}")]
    TypeMismatch {
        name: String,
        module: String,
        expected: ArgumentType,
        found: &'static str,
    },

    #[error("argument '{name}' declares unknown schema type '{schema}'")]
    UnknownType { name: String, schema: String },
}

/// An argument declared by a module manifest.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Argument {
    pub description: String,
    pub required: bool,
    pub schema: ArgumentType,
    pub default: Option<Value>,
    /// Name of another module whose argument of the same name supplies the value.
    pub from: Option<String>,
}

impl Argument {
    pub fn new(schema: ArgumentType) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Check a provided value (or its absence) against this declaration.
    pub fn check(
        &self,
        name: &str,
        module: &str,
        value: Option<&Value>,
    ) -> Result<(), ArgumentError> {
        match value {
            None | Some(Value::Null) => {
                if self.required && self.default.is_none() && self.from.is_none() {
                    return Err(ArgumentError::Missing {
                        name: name.to_string(),
                        module: module.to_string(),
                    });
                }
                Ok(())
            }
            Some(v) if self.schema.accepts(v) => Ok(()),
            Some(v) => Err(ArgumentError::TypeMismatch {
                name: name.to_string(),
                module: module.to_string(),
                expected: self.schema,
                found: describe_value(v),
            }),
        }
    }
}
