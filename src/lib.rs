//! Typed expression evaluator for transaction validation scripts.
//!
//! Given an expression tree and a [`Context`] (a read-only domain view plus
//! a definition environment), the crate resolves the static type of every
//! subexpression and evaluates the tree to a concrete value of that type,
//! or reports a human-readable diagnostic for either phase.
//!
//! Both phases run on explicit work stacks, so scripts of arbitrary depth
//! never exhaust the native stack.

#![cfg_attr(test, allow(warnings))]

pub mod ast;
pub mod context;
pub mod crypto; // Curve signature check backing sigVerify
pub mod evaluator;
pub mod logging; // Opt-in file logging (library code stays off stdio)
pub mod type_checker;
pub mod types;
pub mod value;

pub use ast::{Expression, LetBinding, TxField};
pub use context::{Binding, Context, Domain, Environment, TxSnapshot};
pub use evaluator::eval;
pub use type_checker::resolve;
pub use types::{unify, ScriptType};
pub use value::Value;

/// Evaluate `expr` against `ctx` and convert the result to the statically
/// expected type.
///
/// A mismatch between the expression's resolved type and `T` is reported as
/// a diagnostic, exactly like any script-level failure.
///
/// ```
/// use txscript::{evaluate, Context, Expression, TxSnapshot};
///
/// let domain = TxSnapshot::default();
/// let ctx = Context::new(&domain);
/// let script = Expression::sum(Expression::constant(2), Expression::constant(3));
///
/// assert_eq!(evaluate::<i64>(&ctx, &script), Ok(5));
/// ```
pub fn evaluate<T>(ctx: &Context<'_>, expr: &Expression) -> Result<T, String>
where
    T: TryFrom<Value>,
    T::Error: std::fmt::Display,
{
    match evaluator::eval(ctx, expr) {
        Ok(value) => T::try_from(value).map_err(|e| e.to_string()),
        Err(message) => {
            crate::eval_log!("script evaluation failed: {}", message);
            Err(message)
        }
    }
}
