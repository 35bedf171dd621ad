//! Script type system
//!
//! The closed set of types a script expression can resolve to, and the
//! unification rule deciding whether two types are compatible.
//!
//! `NOTHING` is the inner type of the `NONE` literal: `NONE` has type
//! `OPTION[NOTHING]`, and `NOTHING` unifies with any type. This is what
//! makes `if (c) then NONE else SOME(1)` well-typed as `OPTION[INT]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type of a script expression or runtime value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptType {
    /// Signed 64-bit integer
    Int,
    Boolean,
    /// Immutable byte sequence of arbitrary length
    ByteVector,
    /// Zero-or-one of the inner type
    Option(Box<ScriptType>),
    /// Inner type of the `NONE` literal; unifies with any type
    Nothing,
}

impl ScriptType {
    /// Wrap a type into `OPTION[_]`
    pub fn option(inner: ScriptType) -> Self {
        ScriptType::Option(Box::new(inner))
    }
}

/// Unify two types, returning the more-specific common type.
///
/// Returns `None` when the types are incompatible. `NOTHING` absorbs into
/// the other side, so `OPTION[NOTHING]` unifies with any `OPTION[T]`
/// yielding `OPTION[T]`.
pub fn unify(t1: &ScriptType, t2: &ScriptType) -> Option<ScriptType> {
    match (t1, t2) {
        (ScriptType::Nothing, other) | (other, ScriptType::Nothing) => Some(other.clone()),
        (ScriptType::Option(inner1), ScriptType::Option(inner2)) => {
            unify(inner1, inner2).map(ScriptType::option)
        }
        (left, right) if left == right => Some(left.clone()),
        _ => None,
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptType::Int => write!(f, "INT"),
            ScriptType::Boolean => write!(f, "BOOLEAN"),
            ScriptType::ByteVector => write!(f, "BYTEVECTOR"),
            ScriptType::Option(inner) => write!(f, "OPTION[{}]", inner),
            ScriptType::Nothing => write!(f, "NOTHING"),
        }
    }
}
