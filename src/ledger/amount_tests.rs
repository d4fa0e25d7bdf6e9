#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;
use serde_json::json;

fn exact(raw: Value) -> Decimal {
    match parse_amount(Some(&raw)).unwrap() {
        Amount::Exact(d) => d,
        other => panic!("expected an exact amount for {raw}, got {other:?}"),
    }
}

fn message(err: LedgerError) -> String {
    match err {
        LedgerError::InvalidInput(msg) => msg,
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_parse_amount_string() {
    assert_eq!(exact(json!("5000")), dec!(5000));
    assert_eq!(exact(json!("12.34")), dec!(12.34));
    assert_eq!(exact(json!("  250 ")), dec!(250));
    assert_eq!(exact(json!("-7.5")), dec!(-7.5));
}

#[test]
fn test_parse_amount_number() {
    assert_eq!(exact(json!(5000)), dec!(5000));
    assert_eq!(exact(json!(99.5)), dec!(99.5));
    assert_eq!(exact(json!(0)), Decimal::ZERO);
}

#[test]
fn test_parse_amount_scientific() {
    assert_eq!(exact(json!("1e3")), dec!(1000));
    assert_eq!(exact(json!(1.5e5)), dec!(150000));
}

#[test]
fn test_parse_amount_missing() {
    assert_eq!(message(parse_amount(None).unwrap_err()), "Amount is required");
    assert_eq!(
        message(parse_amount(Some(&Value::Null)).unwrap_err()),
        "Amount is required"
    );
}

#[test]
fn test_parse_amount_not_a_number() {
    for raw in [
        json!("abc"),
        json!(""),
        json!("   "),
        json!("12abc"),
        json!("nan"),
        json!("inf"),
        json!(true),
        json!([1]),
        json!({"value": 1}),
    ] {
        assert_eq!(
            message(parse_amount(Some(&raw)).unwrap_err()),
            "Amount must be a number",
            "{raw}"
        );
    }
}

#[test]
fn test_parse_amount_too_large() {
    for raw in [json!(1e300), json!("1e300"), json!("1000000000000000000000000000000")] {
        assert_eq!(
            parse_amount(Some(&raw)).unwrap(),
            Amount::OutOfRange { negative: false },
            "{raw}"
        );
    }
    assert_eq!(
        parse_amount(Some(&json!(-1e300))).unwrap(),
        Amount::OutOfRange { negative: true }
    );
}

#[test]
fn test_parse_amount_too_small_rounds_to_zero() {
    assert_eq!(exact(json!(1e-30)), Decimal::ZERO);
    assert_eq!(exact(json!("-1e-29")), Decimal::ZERO);
    assert_eq!(exact(json!("5e-28")), dec!(0.0000000000000000000000000005));
}

