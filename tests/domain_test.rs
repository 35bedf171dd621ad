//! Domain projections: chain height and transaction fields.

use txscript::{evaluate, Context, Expression, TxField, TxSnapshot, Value};

fn sample_tx() -> TxSnapshot {
    TxSnapshot {
        height: 150,
        id: vec![0xaa, 0xbb],
        tx_type: 4,
        sender_pk: vec![1; 32],
        body_bytes: vec![9, 8, 7],
        proofs: vec![vec![0x01], vec![0x02]],
    }
}

#[test]
fn test_height_projection() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    assert_eq!(evaluate::<i64>(&ctx, &Expression::height()), Ok(150));
}

#[test]
fn test_height_comparison_scripts() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    let mature = Expression::ge(Expression::height(), Expression::constant(100));
    assert_eq!(evaluate::<bool>(&ctx, &mature), Ok(true));

    let future = Expression::gt(Expression::height(), Expression::constant(150));
    assert_eq!(evaluate::<bool>(&ctx, &future), Ok(false));
}

#[test]
fn test_byte_field_projections() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    assert_eq!(
        evaluate::<Vec<u8>>(&ctx, &Expression::tx_field(TxField::Id)),
        Ok(vec![0xaa, 0xbb])
    );
    assert_eq!(
        evaluate::<Vec<u8>>(&ctx, &Expression::tx_field(TxField::SenderPk)),
        Ok(vec![1; 32])
    );
    assert_eq!(
        evaluate::<Vec<u8>>(&ctx, &Expression::tx_field(TxField::BodyBytes)),
        Ok(vec![9, 8, 7])
    );
}

#[test]
fn test_type_projection() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    let script = Expression::eq(
        Expression::tx_field(TxField::Type),
        Expression::constant(4),
    );
    assert_eq!(evaluate::<bool>(&ctx, &script), Ok(true));
}

#[test]
fn test_present_proof_projects_to_some() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    assert_eq!(
        txscript::eval(&ctx, &Expression::tx_field(TxField::Proof(1))),
        Ok(Value::some(Value::Bytes(vec![0x02])))
    );
    assert_eq!(
        evaluate::<Vec<u8>>(
            &ctx,
            &Expression::get(Expression::tx_field(TxField::Proof(0)))
        ),
        Ok(vec![0x01])
    );
}

#[test]
fn test_absent_proof_projects_to_none() {
    let domain = sample_tx();
    let ctx = Context::new(&domain);

    assert_eq!(
        txscript::eval(&ctx, &Expression::tx_field(TxField::Proof(7))),
        Ok(Value::none())
    );

    let defined = Expression::is_defined(Expression::tx_field(TxField::Proof(7)));
    assert_eq!(evaluate::<bool>(&ctx, &defined), Ok(false));

    let unwrap_absent = Expression::get(Expression::tx_field(TxField::Proof(7)));
    assert_eq!(
        evaluate::<Vec<u8>>(&ctx, &unwrap_absent).unwrap_err(),
        "get(NONE)"
    );
}
