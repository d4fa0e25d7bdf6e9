use rust_decimal::Decimal;
use serde::Serialize;

/// A department's allocation and how much of it has been consumed.
///
/// Serializes as the budget lookup body: every column, amounts as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    pub department: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub used_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
}

impl Budget {
    /// A freshly provisioned budget: nothing used, everything remaining.
    pub fn new(department: String, total_budget: Decimal) -> Self {
        Self {
            department,
            total_budget,
            used_budget: Decimal::ZERO,
            remaining_budget: total_budget,
        }
    }

    /// The state after debiting `amount`. Does not check the policy.
    pub fn debited(&self, amount: Decimal) -> Self {
        Self {
            department: self.department.clone(),
            total_budget: self.total_budget,
            used_budget: self.used_budget + amount,
            remaining_budget: self.remaining_budget - amount,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.used_budget + self.remaining_budget == self.total_budget
            && self.used_budget >= Decimal::ZERO
            && self.remaining_budget >= Decimal::ZERO
    }
}
