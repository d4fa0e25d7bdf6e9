//! Transaction processing and budget queries on top of the store.

mod amount;
mod error;

use amount::{parse_amount, Amount};
pub(crate) use error::LedgerError;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::db::{Database, Settlement};
use crate::models::{Budget, Transaction};
use crate::policy::{self, RejectReason, Role};

/// A submission as it arrives from the caller. Every field may be absent or
/// of the wrong JSON type; a non-string department or role is simply unknown.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) department: Option<Value>,
    pub(crate) amount: Option<Value>,
    pub(crate) role: Option<Value>,
}

impl SubmitRequest {
    /// Parse a request body. Anything other than a JSON object is a 400.
    pub(crate) fn from_json(body: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(body)
            .map_err(|_| LedgerError::invalid("Request body must be a JSON object"))
    }

    fn department(&self) -> Option<&str> {
        self.department.as_ref().and_then(Value::as_str)
    }

    fn role(&self) -> Option<&str> {
        self.role.as_ref().and_then(Value::as_str)
    }
}

/// Outcome of a submission that got as far as a decision.
///
/// Serializes as `{"status": "Approved", "remaining_budget": ...}` or
/// `{"status": "Rejected", "reason": "..."}`. There is no transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub(crate) enum SubmitResponse {
    Approved {
        #[serde(with = "rust_decimal::serde::float")]
        remaining_budget: Decimal,
    },
    Rejected {
        reason: RejectReason,
    },
}

pub(crate) struct Ledger<'a, C = SystemClock> {
    db: &'a Database,
    clock: C,
}

impl<'a> Ledger<'a> {
    pub(crate) fn new(db: &'a Database) -> Self {
        Self::with_clock(db, SystemClock)
    }
}

impl<'a, C: Clock> Ledger<'a, C> {
    pub(crate) fn with_clock(db: &'a Database, clock: C) -> Self {
        Self { db, clock }
    }

    /// Validate, decide and, when approved, debit the department and append
    /// an audit record in one atomic step.
    ///
    /// Rejections (including an unknown department) are `Ok`; only malformed
    /// input and storage failures are errors.
    pub(crate) fn submit(&self, req: &SubmitRequest) -> Result<SubmitResponse, LedgerError> {
        let amount = parse_amount(req.amount.as_ref())?;
        let role = Role::parse(req.role());

        let Some(department) = req.department() else {
            return Ok(reject(RejectReason::DepartmentNotFound));
        };

        let amount = match amount {
            Amount::Exact(amount) => amount,
            Amount::OutOfRange { negative } => {
                return self.reject_out_of_range(department, role, negative);
            }
        };

        let settlement = self
            .db
            .settle(department, amount, self.clock.now(), |budget| {
                policy::evaluate(role, amount, budget.remaining_budget)
            })
            .map_err(|e| {
                tracing::warn!(department, %amount, error = %e, "transaction not committed");
                LedgerError::from(e)
            })?;

        Ok(match settlement {
            Settlement::NotFound => {
                tracing::info!(department, %amount, "rejected: unknown department");
                reject(RejectReason::DepartmentNotFound)
            }
            Settlement::Rejected { budget, reason } => {
                tracing::info!(
                    department,
                    %amount,
                    remaining = %budget.remaining_budget,
                    %reason,
                    "transaction rejected"
                );
                reject(reason)
            }
            Settlement::Approved {
                budget,
                transaction_id,
            } => {
                tracing::info!(
                    department,
                    %amount,
                    remaining = %budget.remaining_budget,
                    transaction_id,
                    "transaction approved"
                );
                SubmitResponse::Approved {
                    remaining_budget: budget.remaining_budget,
                }
            }
        })
    }

    /// An unrepresentable amount never debits anything, so only the lookup
    /// and the policy run.
    fn reject_out_of_range(
        &self,
        department: &str,
        role: Role,
        negative: bool,
    ) -> Result<SubmitResponse, LedgerError> {
        if self.db.get_budget(department)?.is_none() {
            tracing::info!(department, "rejected: unknown department");
            return Ok(reject(RejectReason::DepartmentNotFound));
        }
        let reason = policy::evaluate_out_of_range(role, negative);
        tracing::info!(department, negative, %reason, "out-of-range amount rejected");
        Ok(reject(reason))
    }

    /// Current committed state of one department.
    pub(crate) fn budget(&self, department: &str) -> Result<Budget, LedgerError> {
        self.db
            .get_budget(department)?
            .ok_or_else(|| LedgerError::DepartmentNotFound(department.to_string()))
    }

    pub(crate) fn budgets(&self) -> Result<Vec<Budget>, LedgerError> {
        Ok(self.db.list_budgets()?)
    }

    /// Create a department with nothing spent yet.
    pub(crate) fn provision(&self, department: &str, total: Decimal) -> Result<Budget, LedgerError> {
        let department = department.trim();
        if department.is_empty() {
            return Err(LedgerError::invalid("Department is required"));
        }
        if total < Decimal::ZERO {
            return Err(LedgerError::invalid("Total budget must not be negative"));
        }
        let budget = Budget::new(department.to_string(), total);
        self.db.provision_budget(&budget)?;
        tracing::info!(department, %total, "department provisioned");
        Ok(budget)
    }

    /// Audit records, oldest first, for one department or for all of them.
    pub(crate) fn history(&self, department: Option<&str>) -> Result<Vec<Transaction>, LedgerError> {
        match department {
            Some(d) => {
                self.budget(d)?;
                Ok(self.db.transactions_for(d)?)
            }
            None => Ok(self.db.all_transactions()?),
        }
    }
}

fn reject(reason: RejectReason) -> SubmitResponse {
    SubmitResponse::Rejected { reason }
}
