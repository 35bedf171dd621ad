//! Type resolver
//!
//! Resolves an expression to exactly one type in a lexical scope of bound
//! definitions, before any evaluation is attempted. Resolution is pure and
//! independent of values: `let` bindings are entered with their resolved
//! type and an empty value slot.
//!
//! Rebinding a name is allowed here. The evaluator rejects redefinition at
//! binding time, because that is where values are actually installed;
//! resolution has to be free to visit sub-environments of scopes it has not
//! evaluated.
//!
//! The descent is trampolined: nested expressions push work onto an explicit
//! task stack instead of the native call stack, so arbitrarily deep scripts
//! resolve in O(1) native stack frames and O(depth) heap.

use crate::ast::{Expression, LetBinding};
use crate::context::{Binding, Environment};
use crate::types::{unify, ScriptType};

/// Pending work: resolve a subexpression, or consume already-resolved
/// subexpression types
enum Task<'a> {
    Resolve(Environment, &'a Expression),
    Apply(Step<'a>),
}

/// Continuation over the resolved-type stack.
///
/// At any point of the descent, the `Apply` entries on the task stack are
/// exactly the continuations of the enclosing expressions, innermost on top;
/// pending `Resolve` entries are unvisited siblings.
enum Step<'a> {
    /// Bind the resolved `let` value type and resolve the block body
    EnterBlock {
        env: Environment,
        name: &'a str,
        body: &'a Expression,
    },
    /// Unify the two branch types of an `if`
    UnifyBranches,
    /// Require the operand types of `==` to unify
    UnifyEquality,
    /// Unwrap `OPTION[T]` to `T` for `get`
    UnwrapOption,
    /// Wrap `T` into `OPTION[T]` for `Some`
    WrapOption,
    /// Require an option operand for `isDefined`
    RequireOption,
}

/// Resolve the type of `expr` under `env`, or report a diagnostic.
pub fn resolve(env: &Environment, expr: &Expression) -> Result<ScriptType, String> {
    let mut tasks = vec![Task::Resolve(env.clone(), expr)];
    let mut resolved: Vec<ScriptType> = Vec::new();

    while let Some(task) = tasks.pop() {
        let outcome = match task {
            Task::Resolve(env, expr) => resolve_step(env, expr, &mut tasks, &mut resolved),
            Task::Apply(step) => apply_step(step, &mut tasks, &mut resolved),
        };
        if let Err(message) = outcome {
            return Err(unwind(message, &mut tasks));
        }
    }

    resolved
        .pop()
        .ok_or_else(|| "Typecheck failed: resolver produced no type".to_string())
}

fn resolve_step<'a>(
    env: Environment,
    expr: &'a Expression,
    tasks: &mut Vec<Task<'a>>,
    resolved: &mut Vec<ScriptType>,
) -> Result<(), String> {
    match expr {
        Expression::Ref(name) => match env.binding(name) {
            Some(binding) => resolved.push(binding.tpe.clone()),
            None => return Err(format!("Typecheck failed: Cannot resolve type of {}", name)),
        },
        Expression::Block {
            binding: None,
            body,
        } => {
            tasks.push(Task::Resolve(env, body));
        }
        Expression::Block {
            binding: Some(LetBinding { name, value }),
            body,
        } => {
            tasks.push(Task::Apply(Step::EnterBlock {
                env: env.clone(),
                name,
                body,
            }));
            tasks.push(Task::Resolve(env, value));
        }
        Expression::If {
            then_branch,
            else_branch,
            ..
        } => {
            tasks.push(Task::Apply(Step::UnifyBranches));
            tasks.push(Task::Resolve(env.clone(), else_branch));
            tasks.push(Task::Resolve(env, then_branch));
        }
        Expression::Eq(left, right) => {
            tasks.push(Task::Apply(Step::UnifyEquality));
            tasks.push(Task::Resolve(env.clone(), right));
            tasks.push(Task::Resolve(env, left));
        }
        Expression::Get(inner) => {
            tasks.push(Task::Apply(Step::UnwrapOption));
            tasks.push(Task::Resolve(env, inner));
        }
        Expression::Some(inner) => {
            tasks.push(Task::Apply(Step::WrapOption));
            tasks.push(Task::Resolve(env, inner));
        }
        Expression::IsDefined(inner) => {
            tasks.push(Task::Apply(Step::RequireOption));
            tasks.push(Task::Resolve(env, inner));
        }
        other => match other.predefined_type() {
            Some(tpe) => resolved.push(tpe),
            None => return Err(format!("Typecheck failed: no rule for {:?}", other)),
        },
    }
    Ok(())
}

fn apply_step<'a>(
    step: Step<'a>,
    tasks: &mut Vec<Task<'a>>,
    resolved: &mut Vec<ScriptType>,
) -> Result<(), String> {
    match step {
        Step::EnterBlock { env, name, body } => {
            let value_type = pop_type(resolved)?;
            let extended = env.bind(name, Binding::typed(value_type));
            tasks.push(Task::Resolve(extended, body));
        }
        Step::UnifyBranches => {
            let else_type = pop_type(resolved)?;
            let then_type = pop_type(resolved)?;
            match unify(&then_type, &else_type) {
                Some(unified) => resolved.push(unified),
                None => {
                    return Err(format!(
                        "Typecheck failed for IF: RType({}) differs from LType({})",
                        else_type, then_type
                    ))
                }
            }
        }
        Step::UnifyEquality => {
            let right_type = pop_type(resolved)?;
            let left_type = pop_type(resolved)?;
            if unify(&left_type, &right_type).is_none() {
                return Err(format!(
                    "Typecheck failed for EQ: RType({}) differs from LType({})",
                    right_type, left_type
                ));
            }
            resolved.push(ScriptType::Boolean);
        }
        Step::UnwrapOption => match pop_type(resolved)? {
            ScriptType::Option(inner) => resolved.push(*inner),
            other => {
                return Err(format!(
                    "Typecheck failed: GET called on {}, but only call on OPTION[_] is allowed",
                    other
                ))
            }
        },
        Step::WrapOption => {
            let inner = pop_type(resolved)?;
            resolved.push(ScriptType::option(inner));
        }
        Step::RequireOption => match pop_type(resolved)? {
            ScriptType::Option(_) => resolved.push(ScriptType::Boolean),
            other => {
                return Err(format!(
                    "Typecheck failed: IS_DEFINED called on {}, but only call on OPTION[_] is allowed",
                    other
                ))
            }
        },
    }
    Ok(())
}

fn pop_type(resolved: &mut Vec<ScriptType>) -> Result<ScriptType, String> {
    resolved
        .pop()
        .ok_or_else(|| "Typecheck failed: resolver state underflow".to_string())
}

/// Wrap the failure once per enclosing `get`/`Some`, innermost first.
fn unwind(mut message: String, tasks: &mut Vec<Task<'_>>) -> String {
    while let Some(task) = tasks.pop() {
        if let Task::Apply(Step::UnwrapOption | Step::WrapOption) = task {
            message = format!("Typecheck failed: {}", message);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TxField;

    fn empty() -> Environment {
        Environment::new()
    }

    #[test]
    fn test_literals_resolve_to_predefined_types() {
        assert_eq!(resolve(&empty(), &Expression::constant(1)), Ok(ScriptType::Int));
        assert_eq!(resolve(&empty(), &Expression::True), Ok(ScriptType::Boolean));
        assert_eq!(
            resolve(&empty(), &Expression::bytes(vec![1])),
            Ok(ScriptType::ByteVector)
        );
        assert_eq!(
            resolve(&empty(), &Expression::none()),
            Ok(ScriptType::option(ScriptType::Nothing))
        );
        assert_eq!(
            resolve(&empty(), &Expression::tx_field(TxField::Proof(0))),
            Ok(ScriptType::option(ScriptType::ByteVector))
        );
    }

    #[test]
    fn test_bound_reference_resolves() {
        let env = empty().bind("x", Binding::typed(ScriptType::Int));
        assert_eq!(
            resolve(&env, &Expression::reference("x")),
            Ok(ScriptType::Int)
        );
    }

    #[test]
    fn test_unbound_reference_fails() {
        let err = resolve(&empty(), &Expression::reference("balance")).unwrap_err();
        assert_eq!(err, "Typecheck failed: Cannot resolve type of balance");
    }

    #[test]
    fn test_block_binding_types_the_body() {
        let script = Expression::let_in(
            "x",
            Expression::constant(7),
            Expression::reference("x"),
        );
        assert_eq!(resolve(&empty(), &script), Ok(ScriptType::Int));
    }

    #[test]
    fn test_if_branches_unify() {
        let script = Expression::if_else(
            Expression::True,
            Expression::none(),
            Expression::some(Expression::constant(1)),
        );
        assert_eq!(
            resolve(&empty(), &script),
            Ok(ScriptType::option(ScriptType::Int))
        );
    }

    #[test]
    fn test_if_branch_mismatch_fails() {
        let script = Expression::if_else(
            Expression::True,
            Expression::constant(1),
            Expression::False,
        );
        let err = resolve(&empty(), &script).unwrap_err();
        assert_eq!(
            err,
            "Typecheck failed for IF: RType(BOOLEAN) differs from LType(INT)"
        );
    }

    #[test]
    fn test_eq_requires_unifiable_operands() {
        let ok = Expression::eq(
            Expression::some(Expression::constant(1)),
            Expression::none(),
        );
        assert_eq!(resolve(&empty(), &ok), Ok(ScriptType::Boolean));

        let bad = Expression::eq(Expression::constant(1), Expression::True);
        let err = resolve(&empty(), &bad).unwrap_err();
        assert_eq!(
            err,
            "Typecheck failed for EQ: RType(BOOLEAN) differs from LType(INT)"
        );
    }

    #[test]
    fn test_get_unwraps_option() {
        let script = Expression::get(Expression::some(Expression::constant(1)));
        assert_eq!(resolve(&empty(), &script), Ok(ScriptType::Int));
    }

    #[test]
    fn test_get_on_non_option_fails() {
        let script = Expression::get(Expression::constant(1));
        let err = resolve(&empty(), &script).unwrap_err();
        assert_eq!(
            err,
            "Typecheck failed: GET called on INT, but only call on OPTION[_] is allowed"
        );
    }

    #[test]
    fn test_get_wraps_inner_failure() {
        let script = Expression::get(Expression::reference("missing"));
        let err = resolve(&empty(), &script).unwrap_err();
        assert_eq!(
            err,
            "Typecheck failed: Typecheck failed: Cannot resolve type of missing"
        );
    }

    #[test]
    fn test_some_wraps_resolved_type() {
        let script = Expression::some(Expression::some(Expression::True));
        assert_eq!(
            resolve(&empty(), &script),
            Ok(ScriptType::option(ScriptType::option(ScriptType::Boolean)))
        );
    }

    #[test]
    fn test_is_defined_requires_option() {
        let ok = Expression::is_defined(Expression::none());
        assert_eq!(resolve(&empty(), &ok), Ok(ScriptType::Boolean));

        let bad = Expression::is_defined(Expression::constant(1));
        let err = resolve(&empty(), &bad).unwrap_err();
        assert!(err.contains("only call on OPTION[_] is allowed"), "{}", err);
    }

    #[test]
    fn test_rebinding_is_allowed_during_resolution() {
        // The evaluator rejects this at binding time; resolution does not.
        let script = Expression::let_in(
            "x",
            Expression::constant(1),
            Expression::let_in("x", Expression::constant(2), Expression::reference("x")),
        );
        assert_eq!(resolve(&empty(), &script), Ok(ScriptType::Int));
    }
}
