#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn rejected(reason: RejectReason) -> Decision {
    Decision::Rejected { reason }
}

// ── Role ──────────────────────────────────────────────────────

#[test]
fn test_role_parse_exact() {
    assert_eq!(Role::parse(Some("Officer")), Role::Officer);
    assert_eq!(Role::parse(Some("Admin")), Role::Admin);
    assert_eq!(Role::parse(Some("admin")), Role::Other);
    assert_eq!(Role::parse(Some(" Officer")), Role::Other);
    assert_eq!(Role::parse(Some("")), Role::Other);
    assert_eq!(Role::parse(None), Role::Other);
}

#[test]
fn test_threshold_value() {
    assert_eq!(ESCALATION_THRESHOLD, dec!(100000));
}

// ── Rules ─────────────────────────────────────────────────────

#[test]
fn test_approves_within_budget() {
    assert_eq!(evaluate(Role::Officer, dec!(5000), dec!(40000)), Decision::Approved);
    assert_eq!(evaluate(Role::Admin, dec!(0.01), dec!(0.01)), Decision::Approved);
}

#[test]
fn test_unauthorized_role_checked_first() {
    for amount in [dec!(-5), Decimal::ZERO, dec!(50), dec!(999999)] {
        assert_eq!(
            evaluate(Role::Other, amount, dec!(10)),
            rejected(RejectReason::UnauthorizedRole)
        );
    }
}

#[test]
fn test_non_positive_amount_rejected() {
    for role in [Role::Officer, Role::Admin] {
        assert_eq!(
            evaluate(role, Decimal::ZERO, dec!(100)),
            rejected(RejectReason::InvalidAmount)
        );
        assert_eq!(
            evaluate(role, dec!(-1), dec!(100)),
            rejected(RejectReason::InvalidAmount)
        );
        // Even with nothing left, a non-positive amount is reported as invalid.
        assert_eq!(
            evaluate(role, dec!(-1), Decimal::ZERO),
            rejected(RejectReason::InvalidAmount)
        );
    }
}

#[test]
fn test_budget_exceeded() {
    assert_eq!(
        evaluate(Role::Admin, dec!(40000.01), dec!(40000)),
        rejected(RejectReason::BudgetExceeded)
    );
}

#[test]
fn test_budget_checked_before_escalation() {
    assert_eq!(
        evaluate(Role::Admin, dec!(150000), dec!(40000)),
        rejected(RejectReason::BudgetExceeded)
    );
}

#[test]
fn test_escalation_threshold() {
    assert_eq!(
        evaluate(Role::Officer, dec!(100000.01), dec!(500000)),
        rejected(RejectReason::RequiresHigherApproval)
    );
    // Exactly at the threshold still auto-approves.
    assert_eq!(
        evaluate(Role::Officer, dec!(100000), dec!(500000)),
        Decision::Approved
    );
}

#[test]
fn test_exact_remaining_is_approvable() {
    assert_eq!(
        evaluate(Role::Officer, dec!(40000), dec!(40000)),
        Decision::Approved
    );
}

#[test]
fn test_deterministic() {
    let first = evaluate(Role::Admin, dec!(123.45), dec!(200));
    for _ in 0..10 {
        assert_eq!(evaluate(Role::Admin, dec!(123.45), dec!(200)), first);
    }
}

#[test]
fn test_reason_strings() {
    assert_eq!(RejectReason::UnauthorizedRole.to_string(), "Unauthorized role");
    assert_eq!(RejectReason::InvalidAmount.to_string(), "Invalid amount");
    assert_eq!(RejectReason::BudgetExceeded.to_string(), "Budget exceeded");
    assert_eq!(
        RejectReason::RequiresHigherApproval.to_string(),
        "Requires higher approval"
    );
    assert_eq!(
        RejectReason::DepartmentNotFound.to_string(),
        "Department not found"
    );
}

#[test]
fn test_out_of_range_follows_rule_order() {
    assert_eq!(
        evaluate_out_of_range(Role::Other, false),
        RejectReason::UnauthorizedRole
    );
    assert_eq!(
        evaluate_out_of_range(Role::Other, true),
        RejectReason::UnauthorizedRole
    );
    assert_eq!(
        evaluate_out_of_range(Role::Officer, true),
        RejectReason::InvalidAmount
    );
    assert_eq!(
        evaluate_out_of_range(Role::Admin, false),
        RejectReason::BudgetExceeded
    );
}
