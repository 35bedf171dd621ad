//! Short-circuit semantics of `&&` and `||`, including the ordering
//! guarantees around failing operands.

use txscript::{evaluate, Context, Expression, TxSnapshot};

fn boom() -> Expression {
    // A right operand that fails loudly if it is ever evaluated.
    Expression::reference("undefined")
}

#[test]
fn test_and_truth_table() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let cases = [
        (true, true, true),
        (true, false, false),
        (false, true, false),
        (false, false, false),
    ];
    for (left, right, expected) in cases {
        let script = Expression::and(Expression::boolean(left), Expression::boolean(right));
        assert_eq!(evaluate::<bool>(&ctx, &script), Ok(expected));
    }
}

#[test]
fn test_or_truth_table() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let cases = [
        (true, true, true),
        (true, false, true),
        (false, true, true),
        (false, false, false),
    ];
    for (left, right, expected) in cases {
        let script = Expression::or(Expression::boolean(left), Expression::boolean(right));
        assert_eq!(evaluate::<bool>(&ctx, &script), Ok(expected));
    }
}

#[test]
fn test_and_false_skips_right_operand() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let script = Expression::and(Expression::False, boom());
    assert_eq!(evaluate::<bool>(&ctx, &script), Ok(false));
}

#[test]
fn test_or_true_skips_right_operand() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let script = Expression::or(Expression::True, boom());
    assert_eq!(evaluate::<bool>(&ctx, &script), Ok(true));
}

#[test]
fn test_and_true_surfaces_right_error() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let script = Expression::and(Expression::True, boom());
    let err = evaluate::<bool>(&ctx, &script).unwrap_err();
    assert_eq!(err, "Definition 'undefined' not found");
}

#[test]
fn test_or_false_surfaces_right_error() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let script = Expression::or(Expression::False, boom());
    let err = evaluate::<bool>(&ctx, &script).unwrap_err();
    assert_eq!(err, "Definition 'undefined' not found");
}

#[test]
fn test_left_error_wins_over_short_circuit() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let script = Expression::and(boom(), Expression::False);
    let err = evaluate::<bool>(&ctx, &script).unwrap_err();
    assert_eq!(err, "Definition 'undefined' not found");
}

#[test]
fn test_non_boolean_operand_is_a_diagnostic() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    let left_bad = Expression::and(Expression::constant(1), Expression::True);
    assert_eq!(
        evaluate::<bool>(&ctx, &left_bad).unwrap_err(),
        "Expected BOOLEAN, found INT"
    );

    let right_bad = Expression::and(Expression::True, Expression::constant(1));
    assert_eq!(
        evaluate::<bool>(&ctx, &right_bad).unwrap_err(),
        "Expected BOOLEAN, found INT"
    );
}

#[test]
fn test_nested_conditions_compose() {
    let domain = TxSnapshot::default();
    let ctx = Context::new(&domain);

    // (1 >= 1 && 2 > 1) || undefined
    let script = Expression::or(
        Expression::and(
            Expression::ge(Expression::constant(1), Expression::constant(1)),
            Expression::gt(Expression::constant(2), Expression::constant(1)),
        ),
        boom(),
    );
    assert_eq!(evaluate::<bool>(&ctx, &script), Ok(true));
}
