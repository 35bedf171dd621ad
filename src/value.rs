//! Runtime values
//!
//! The tagged union a well-typed expression evaluates to. The type resolver
//! decides which variant is expected at every point; the evaluator asserts
//! the variant and reports a diagnostic on mismatch.

use serde::{Deserialize, Serialize};

use crate::types::ScriptType;

/// A concrete script value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Boolean(bool),
    Bytes(Vec<u8>),
    Opt(Option<Box<Value>>),
}

impl Value {
    pub fn some(inner: Value) -> Self {
        Value::Opt(Some(Box::new(inner)))
    }

    pub fn none() -> Self {
        Value::Opt(None)
    }

    /// Runtime type of this value. An empty option reports
    /// `OPTION[NOTHING]`, which unifies with any resolved option type.
    pub fn type_of(&self) -> ScriptType {
        match self {
            Value::Int(_) => ScriptType::Int,
            Value::Boolean(_) => ScriptType::Boolean,
            Value::Bytes(_) => ScriptType::ByteVector,
            Value::Opt(None) => ScriptType::option(ScriptType::Nothing),
            Value::Opt(Some(inner)) => ScriptType::option(inner.type_of()),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(format!("Expected INT, found {}", other.type_of())),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(format!("Expected BOOLEAN, found {}", other.type_of())),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bytes(bytes) => Ok(bytes),
            other => Err(format!("Expected BYTEVECTOR, found {}", other.type_of())),
        }
    }
}

impl TryFrom<Value> for Option<Box<Value>> {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Opt(option) => Ok(option),
            other => Err(format!("Expected OPTION[_], found {}", other.type_of())),
        }
    }
}
