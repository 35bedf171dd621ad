//! Script expression algebra
//!
//! The closed set of terms a validation script is built from. Both the type
//! resolver and the evaluator dispatch on this shape; expression trees are
//! immutable for the duration of an evaluation.
//!
//! Constructor helpers keep callers and tests from spelling out `Box` at
//! every node:
//!
//! ```
//! use txscript::ast::Expression;
//!
//! // let x = 7; x + 1
//! let script = Expression::let_in(
//!     "x",
//!     Expression::constant(7),
//!     Expression::sum(Expression::reference("x"), Expression::constant(1)),
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::types::ScriptType;

/// Transaction field selector for [`Expression::TxField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxField {
    Id,
    Type,
    SenderPk,
    BodyBytes,
    /// Proof slot by index; absent slots project to `NONE`
    Proof(u8),
}

impl TxField {
    /// Type of the projected field
    pub fn field_type(&self) -> ScriptType {
        match self {
            TxField::Id | TxField::SenderPk | TxField::BodyBytes => ScriptType::ByteVector,
            TxField::Type => ScriptType::Int,
            TxField::Proof(_) => ScriptType::option(ScriptType::ByteVector),
        }
    }
}

/// A `let` binding carried by a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetBinding {
    pub name: String,
    pub value: Box<Expression>,
}

/// Core expression type for validation scripts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Integer literal
    Const(i64),
    /// Byte-vector literal
    Bytes(Vec<u8>),
    True,
    False,
    /// The empty option literal, of type `OPTION[NOTHING]`
    None,
    /// Wrap a value into an option
    Some(Box<Expression>),
    /// Reference to a definition bound in the enclosing scope
    Ref(String),
    Sum(Box<Expression>, Box<Expression>),
    Ge(Box<Expression>, Box<Expression>),
    Gt(Box<Expression>, Box<Expression>),
    /// Polymorphic equality over any pair of unifiable operand types
    Eq(Box<Expression>, Box<Expression>),
    /// Short-circuiting conjunction
    And(Box<Expression>, Box<Expression>),
    /// Short-circuiting disjunction
    Or(Box<Expression>, Box<Expression>),
    /// Conditional; the branch types must unify and the untaken branch is
    /// never evaluated
    If {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    IsDefined(Box<Expression>),
    /// Unwrap an option; fails on `NONE` at evaluation time
    Get(Box<Expression>),
    /// Optional `let` binding plus a body evaluated in the extended scope
    Block {
        binding: Option<LetBinding>,
        body: Box<Expression>,
    },
    /// Curve signature check over three byte vectors
    SigVerify {
        message: Box<Expression>,
        signature: Box<Expression>,
        public_key: Box<Expression>,
    },
    /// Current chain height, from the domain
    Height,
    /// Transaction field projection, from the domain
    TxField(TxField),
}

impl Expression {
    pub fn constant(value: i64) -> Self {
        Expression::Const(value)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Expression::Bytes(bytes.into())
    }

    pub fn boolean(value: bool) -> Self {
        if value {
            Expression::True
        } else {
            Expression::False
        }
    }

    pub fn none() -> Self {
        Expression::None
    }

    pub fn some(inner: Expression) -> Self {
        Expression::Some(Box::new(inner))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Ref(name.into())
    }

    pub fn sum(left: Expression, right: Expression) -> Self {
        Expression::Sum(Box::new(left), Box::new(right))
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Expression::Ge(Box::new(left), Box::new(right))
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Expression::Gt(Box::new(left), Box::new(right))
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Expression::Eq(Box::new(left), Box::new(right))
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn if_else(
        condition: Expression,
        then_branch: Expression,
        else_branch: Expression,
    ) -> Self {
        Expression::If {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn is_defined(inner: Expression) -> Self {
        Expression::IsDefined(Box::new(inner))
    }

    pub fn get(inner: Expression) -> Self {
        Expression::Get(Box::new(inner))
    }

    pub fn block(binding: Option<LetBinding>, body: Expression) -> Self {
        Expression::Block {
            binding,
            body: Box::new(body),
        }
    }

    /// `let name = value` followed by `body` in the extended scope
    pub fn let_in(name: impl Into<String>, value: Expression, body: Expression) -> Self {
        Expression::Block {
            binding: Some(LetBinding {
                name: name.into(),
                value: Box::new(value),
            }),
            body: Box::new(body),
        }
    }

    pub fn sig_verify(message: Expression, signature: Expression, public_key: Expression) -> Self {
        Expression::SigVerify {
            message: Box::new(message),
            signature: Box::new(signature),
            public_key: Box::new(public_key),
        }
    }

    pub fn height() -> Self {
        Expression::Height
    }

    pub fn tx_field(field: TxField) -> Self {
        Expression::TxField(field)
    }

    /// Type of this term when it does not depend on subterms or the
    /// environment.
    ///
    /// `REF`, `BLOCK`, `IF`, `EQ`, `GET` and `SOME` are context-dependent
    /// and return `None`; the type resolver handles them.
    pub fn predefined_type(&self) -> Option<ScriptType> {
        match self {
            Expression::Const(_) | Expression::Height | Expression::Sum(..) => {
                Some(ScriptType::Int)
            }
            Expression::True
            | Expression::False
            | Expression::Ge(..)
            | Expression::Gt(..)
            | Expression::And(..)
            | Expression::Or(..)
            | Expression::IsDefined(_)
            | Expression::SigVerify { .. } => Some(ScriptType::Boolean),
            Expression::Bytes(_) => Some(ScriptType::ByteVector),
            Expression::None => Some(ScriptType::option(ScriptType::Nothing)),
            Expression::TxField(field) => Some(field.field_type()),
            Expression::Some(_)
            | Expression::Ref(_)
            | Expression::Eq(..)
            | Expression::If { .. }
            | Expression::Get(_)
            | Expression::Block { .. } => None,
        }
    }
}
