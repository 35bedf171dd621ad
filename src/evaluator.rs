//! Script evaluator
//!
//! Evaluates an expression to a concrete value of its resolved type, or a
//! diagnostic describing why evaluation failed.
//!
//! The machine is a work stack of pending operations plus a stack of
//! intermediate values: every descent pushes operations instead of
//! recursing, so a chain of N nested blocks completes in O(1) native stack
//! frames and O(N) heap.
//!
//! Argument evaluation is strictly left-to-right and halts at the first
//! error. `&&` and `||` inspect their left operand before the right one is
//! ever scheduled; `if` resolves its own type first (a type-mismatched
//! conditional fails even when the chosen branch would succeed), then
//! evaluates the condition and exactly one branch.

use crate::ast::{Expression, LetBinding, TxField};
use crate::context::{Binding, Context, Environment};
use crate::crypto;
use crate::type_checker::resolve;
use crate::types::ScriptType;
use crate::value::Value;

/// Pending work: evaluate a subexpression, or consume already-computed
/// values
enum Op<'a> {
    Eval(Environment, &'a Expression),
    Apply(Step<'a>),
}

/// Continuation over the value stack
enum Step<'a> {
    Sum,
    Ge,
    Gt,
    Equals,
    /// Inspect the left operand of `&&`/`||`: short-circuit, or schedule
    /// the right operand
    LogicalRight {
        and: bool,
        env: Environment,
        right: &'a Expression,
    },
    /// Assert the non-short-circuited logical result is a boolean
    RequireBool,
    /// Inspect the condition and schedule exactly one branch
    SelectBranch {
        env: Environment,
        then_branch: &'a Expression,
        else_branch: &'a Expression,
    },
    WrapSome,
    UnwrapOption,
    IsDefined,
    /// Bind the evaluated `let` value and schedule the block body
    BindName {
        env: Environment,
        name: &'a str,
        tpe: ScriptType,
        body: &'a Expression,
    },
    VerifySignature,
}

/// Evaluate `expr` against `ctx`, producing a value of its resolved type or
/// a diagnostic.
pub fn eval(ctx: &Context<'_>, expr: &Expression) -> Result<Value, String> {
    let mut ops = vec![Op::Eval(ctx.env.clone(), expr)];
    let mut values: Vec<Value> = Vec::new();

    while let Some(op) = ops.pop() {
        match op {
            Op::Eval(env, expr) => eval_step(ctx, env, expr, &mut ops, &mut values)?,
            Op::Apply(step) => apply_step(step, &mut ops, &mut values)?,
        }
    }

    values
        .pop()
        .ok_or_else(|| "Evaluation produced no result".to_string())
}

fn eval_step<'a>(
    ctx: &Context<'_>,
    env: Environment,
    expr: &'a Expression,
    ops: &mut Vec<Op<'a>>,
    values: &mut Vec<Value>,
) -> Result<(), String> {
    match expr {
        Expression::Const(n) => values.push(Value::Int(*n)),
        Expression::Bytes(bytes) => values.push(Value::Bytes(bytes.clone())),
        Expression::True => values.push(Value::Boolean(true)),
        Expression::False => values.push(Value::Boolean(false)),
        Expression::None => values.push(Value::none()),
        Expression::Some(inner) => {
            ops.push(Op::Apply(Step::WrapSome));
            ops.push(Op::Eval(env, inner));
        }
        Expression::Ref(name) => match env.binding(name).and_then(|b| b.value.clone()) {
            Some(value) => values.push(value),
            None => return Err(format!("Definition '{}' not found", name)),
        },
        Expression::Sum(left, right) => push_binary(Step::Sum, env, left, right, ops),
        Expression::Ge(left, right) => push_binary(Step::Ge, env, left, right, ops),
        Expression::Gt(left, right) => push_binary(Step::Gt, env, left, right, ops),
        Expression::Eq(left, right) => {
            // Validates that the operand types unify before either side runs.
            resolve(&env, expr)?;
            push_binary(Step::Equals, env, left, right, ops);
        }
        Expression::And(left, right) => {
            ops.push(Op::Apply(Step::LogicalRight {
                and: true,
                env: env.clone(),
                right,
            }));
            ops.push(Op::Eval(env, left));
        }
        Expression::Or(left, right) => {
            ops.push(Op::Apply(Step::LogicalRight {
                and: false,
                env: env.clone(),
                right,
            }));
            ops.push(Op::Eval(env, left));
        }
        Expression::If {
            condition,
            then_branch,
            else_branch,
        } => {
            // A type-mismatched conditional fails before the condition runs,
            // even when the chosen branch would succeed.
            resolve(&env, expr)?;
            ops.push(Op::Apply(Step::SelectBranch {
                env: env.clone(),
                then_branch,
                else_branch,
            }));
            ops.push(Op::Eval(env, condition));
        }
        Expression::IsDefined(inner) => {
            ops.push(Op::Apply(Step::IsDefined));
            ops.push(Op::Eval(env, inner));
        }
        Expression::Get(inner) => {
            ops.push(Op::Apply(Step::UnwrapOption));
            ops.push(Op::Eval(env, inner));
        }
        Expression::Block {
            binding: None,
            body,
        } => ops.push(Op::Eval(env, body)),
        Expression::Block {
            binding: Some(LetBinding { name, value }),
            body,
        } => {
            let tpe = resolve(&env, value)?;
            if env.contains(name) {
                return Err(format!("Value '{}' already defined in the scope", name));
            }
            ops.push(Op::Apply(Step::BindName {
                env: env.clone(),
                name,
                tpe,
                body,
            }));
            ops.push(Op::Eval(env, value));
        }
        Expression::SigVerify {
            message,
            signature,
            public_key,
        } => {
            ops.push(Op::Apply(Step::VerifySignature));
            ops.push(Op::Eval(env.clone(), public_key));
            ops.push(Op::Eval(env.clone(), signature));
            ops.push(Op::Eval(env, message));
        }
        Expression::Height => values.push(Value::Int(ctx.domain.height())),
        Expression::TxField(field) => values.push(project_field(ctx, *field)),
    }
    Ok(())
}

fn apply_step<'a>(
    step: Step<'a>,
    ops: &mut Vec<Op<'a>>,
    values: &mut Vec<Value>,
) -> Result<(), String> {
    match step {
        Step::Sum => {
            let right = expect_int(pop_value(values)?)?;
            let left = expect_int(pop_value(values)?)?;
            values.push(Value::Int(left.wrapping_add(right)));
        }
        Step::Ge => {
            let right = expect_int(pop_value(values)?)?;
            let left = expect_int(pop_value(values)?)?;
            values.push(Value::Boolean(left >= right));
        }
        Step::Gt => {
            let right = expect_int(pop_value(values)?)?;
            let left = expect_int(pop_value(values)?)?;
            values.push(Value::Boolean(left > right));
        }
        Step::Equals => {
            let right = pop_value(values)?;
            let left = pop_value(values)?;
            values.push(Value::Boolean(left == right));
        }
        Step::LogicalRight { and, env, right } => {
            let left = expect_bool(pop_value(values)?)?;
            if left == and {
                ops.push(Op::Apply(Step::RequireBool));
                ops.push(Op::Eval(env, right));
            } else {
                values.push(Value::Boolean(left));
            }
        }
        Step::RequireBool => {
            let result = expect_bool(pop_value(values)?)?;
            values.push(Value::Boolean(result));
        }
        Step::SelectBranch {
            env,
            then_branch,
            else_branch,
        } => {
            let condition = expect_bool(pop_value(values)?)?;
            let branch = if condition { then_branch } else { else_branch };
            ops.push(Op::Eval(env, branch));
        }
        Step::WrapSome => {
            let inner = pop_value(values)?;
            values.push(Value::some(inner));
        }
        Step::UnwrapOption => match expect_option(pop_value(values)?)? {
            Some(inner) => values.push(*inner),
            None => return Err("get(NONE)".to_string()),
        },
        Step::IsDefined => {
            let option = expect_option(pop_value(values)?)?;
            values.push(Value::Boolean(option.is_some()));
        }
        Step::BindName {
            env,
            name,
            tpe,
            body,
        } => {
            let value = pop_value(values)?;
            let extended = env.bind(name, Binding::defined(tpe, value));
            ops.push(Op::Eval(extended, body));
        }
        Step::VerifySignature => {
            let public_key = expect_bytes(pop_value(values)?)?;
            let signature = expect_bytes(pop_value(values)?)?;
            let message = expect_bytes(pop_value(values)?)?;
            values.push(Value::Boolean(crypto::verify_signature(
                &message,
                &signature,
                &public_key,
            )));
        }
    }
    Ok(())
}

fn push_binary<'a>(
    step: Step<'a>,
    env: Environment,
    left: &'a Expression,
    right: &'a Expression,
    ops: &mut Vec<Op<'a>>,
) {
    ops.push(Op::Apply(step));
    ops.push(Op::Eval(env.clone(), right));
    ops.push(Op::Eval(env, left));
}

fn project_field(ctx: &Context<'_>, field: TxField) -> Value {
    match field {
        TxField::Id => Value::Bytes(ctx.domain.id().to_vec()),
        TxField::Type => Value::Int(ctx.domain.tx_type()),
        TxField::SenderPk => Value::Bytes(ctx.domain.sender_pk().to_vec()),
        TxField::BodyBytes => Value::Bytes(ctx.domain.body_bytes().to_vec()),
        TxField::Proof(index) => match ctx.domain.proof(index) {
            Some(bytes) => Value::some(Value::Bytes(bytes)),
            None => Value::none(),
        },
    }
}

fn pop_value(values: &mut Vec<Value>) -> Result<Value, String> {
    values
        .pop()
        .ok_or_else(|| "Evaluation stack underflow".to_string())
}

fn expect_int(value: Value) -> Result<i64, String> {
    match value {
        Value::Int(n) => Ok(n),
        other => Err(format!("Expected INT, found {}", other.type_of())),
    }
}

fn expect_bool(value: Value) -> Result<bool, String> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(format!("Expected BOOLEAN, found {}", other.type_of())),
    }
}

fn expect_bytes(value: Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(format!("Expected BYTEVECTOR, found {}", other.type_of())),
    }
}

fn expect_option(value: Value) -> Result<Option<Box<Value>>, String> {
    match value {
        Value::Opt(option) => Ok(option),
        other => Err(format!("Expected OPTION[_], found {}", other.type_of())),
    }
}
