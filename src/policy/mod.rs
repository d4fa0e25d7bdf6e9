//! Approval rules applied to every submission.
//!
//! Evaluation is pure: the same role, amount and remaining budget always
//! produce the same [`Decision`], so a submission that failed to commit can be
//! retried without the answer changing underneath it.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Amounts above this never auto-approve, whatever the remaining budget.
pub(crate) const ESCALATION_THRESHOLD: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Officer,
    Admin,
    Other,
}

impl Role {
    /// Role names are matched exactly. Missing or unknown roles are `Other`.
    pub(crate) fn parse(s: Option<&str>) -> Self {
        match s {
            Some("Officer") => Self::Officer,
            Some("Admin") => Self::Admin,
            _ => Self::Other,
        }
    }

    pub(crate) fn may_approve(&self) -> bool {
        matches!(self, Self::Officer | Self::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RejectReason {
    UnauthorizedRole,
    InvalidAmount,
    BudgetExceeded,
    RequiresHigherApproval,
    DepartmentNotFound,
}

impl RejectReason {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedRole => "Unauthorized role",
            Self::InvalidAmount => "Invalid amount",
            Self::BudgetExceeded => "Budget exceeded",
            Self::RequiresHigherApproval => "Requires higher approval",
            Self::DepartmentNotFound => "Department not found",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RejectReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Approved,
    Rejected { reason: RejectReason },
}

impl Decision {
    fn reject(reason: RejectReason) -> Self {
        Self::Rejected { reason }
    }
}

/// Check a proposed debit. Rules run in a fixed order and the first failure
/// names the rejection, so an unauthorized role is reported before anything
/// about the amount.
pub(crate) fn evaluate(role: Role, amount: Decimal, remaining_budget: Decimal) -> Decision {
    if !role.may_approve() {
        return Decision::reject(RejectReason::UnauthorizedRole);
    }
    if amount <= Decimal::ZERO {
        return Decision::reject(RejectReason::InvalidAmount);
    }
    if amount > remaining_budget {
        return Decision::reject(RejectReason::BudgetExceeded);
    }
    if amount > ESCALATION_THRESHOLD {
        return Decision::reject(RejectReason::RequiresHigherApproval);
    }
    Decision::Approved
}

/// Same rule order for an amount too large in magnitude to represent. It can
/// never be approved: a negative one is invalid, a positive one exceeds any
/// remaining budget.
pub(crate) fn evaluate_out_of_range(role: Role, negative: bool) -> RejectReason {
    if !role.may_approve() {
        RejectReason::UnauthorizedRole
    } else if negative {
        RejectReason::InvalidAmount
    } else {
        RejectReason::BudgetExceeded
    }
}

#[cfg(test)]
mod tests;
