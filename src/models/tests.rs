#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Budget ────────────────────────────────────────────────────

fn sales() -> Budget {
    Budget {
        department: "Sales".into(),
        total_budget: dec!(50000),
        used_budget: dec!(10000),
        remaining_budget: dec!(40000),
    }
}

#[test]
fn test_new_budget_is_untouched() {
    let b = Budget::new("Ops".into(), dec!(1200.50));
    assert_eq!(b.used_budget, Decimal::ZERO);
    assert_eq!(b.remaining_budget, dec!(1200.50));
    assert!(b.is_consistent());
}

#[test]
fn test_debited_moves_amount_from_remaining_to_used() {
    let after = sales().debited(dec!(5000));
    assert_eq!(after.used_budget, dec!(15000));
    assert_eq!(after.remaining_budget, dec!(35000));
    assert_eq!(after.total_budget, dec!(50000));
    assert!(after.is_consistent());
}

#[test]
fn test_debited_keeps_cents_exact() {
    let after = sales().debited(dec!(0.10)).debited(dec!(0.20));
    assert_eq!(after.remaining_budget, dec!(39999.70));
    assert!(after.is_consistent());
}

#[test]
fn test_inconsistent_budget_detected() {
    let mut b = sales();
    b.remaining_budget = dec!(39000);
    assert!(!b.is_consistent());

    let overdrawn = sales().debited(dec!(40000.01));
    assert!(!overdrawn.is_consistent());
}

#[test]
fn test_budget_serializes_as_numbers() {
    let json = serde_json::to_value(sales()).unwrap();
    assert_eq!(json["department"], "Sales");
    assert_eq!(json["total_budget"].as_f64(), Some(50000.0));
    assert_eq!(json["used_budget"].as_f64(), Some(10000.0));
    assert_eq!(json["remaining_budget"].as_f64(), Some(40000.0));
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_status_round_trips_through_text() {
    for status in [TxStatus::Approved, TxStatus::Rejected] {
        assert_eq!(TxStatus::parse(status.as_str()), Some(status));
    }
    assert_eq!(TxStatus::parse("approved"), None);
    assert_eq!(TxStatus::Rejected.to_string(), "Rejected");
}

#[test]
fn test_approved_record_has_no_reason() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let txn = Transaction::approved("Sales".into(), dec!(5000), at);
    assert_eq!(txn.id, None);
    assert_eq!(txn.status, TxStatus::Approved);
    assert!(txn.reason.is_none());
    assert_eq!(txn.timestamp, at);
}
