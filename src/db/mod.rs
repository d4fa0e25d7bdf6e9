mod schema;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Budget, Transaction, TxStatus};
use crate::policy::{Decision, RejectReason};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Department already exists: {0}")]
    DepartmentExists(String),

    #[error("Budget for {0} changed during update")]
    Conflict(String),
}

/// Result of one read-decide-write pass over a department's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Settlement {
    NotFound,
    Rejected {
        budget: Budget,
        reason: RejectReason,
    },
    Approved {
        budget: Budget,
        transaction_id: i64,
    },
}

/// Budget store. One handle per process, shared by reference; the
/// connection is serialized behind a mutex so `&Database` can cross threads.
///
/// Writes for different departments do not run in parallel: the mutex and
/// SQLite's single write lock put every `settle` in one queue.
pub(crate) struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::init(conn)
    }

    fn init(mut conn: Connection) -> Result<Self, StoreError> {
        migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panicking holder cannot leave an open transaction behind: rusqlite
        // rolls back on drop.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.conn().execute_batch(sql)?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budget(&self, department: &str) -> Result<Option<Budget>, StoreError> {
        let conn = self.conn();
        let budget = select_budget(&conn, department)?;
        tracing::debug!(department, found = budget.is_some(), "budget lookup");
        Ok(budget)
    }

    pub(crate) fn list_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT department, total_budget, used_budget, remaining_budget
             FROM budgets ORDER BY department",
        )?;
        let rows = stmt.query_map([], budget_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Out-of-band provisioning. A department is created once; its total is
    /// never changed by the ledger afterwards.
    pub(crate) fn provision_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO budgets (department, total_budget, used_budget, remaining_budget)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                budget.department,
                budget.total_budget.to_string(),
                budget.used_budget.to_string(),
                budget.remaining_budget.to_string(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::DepartmentExists(budget.department.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load, decide and debit as one unit.
    ///
    /// The IMMEDIATE transaction takes SQLite's write lock before the budget
    /// is read, so no other writer can observe the same `remaining_budget`
    /// until this one commits or rolls back. The debit and the audit row are
    /// committed together; any error drops the transaction and rolls both back.
    pub(crate) fn settle<F>(
        &self,
        department: &str,
        amount: Decimal,
        at: DateTime<Utc>,
        decide: F,
    ) -> Result<Settlement, StoreError>
    where
        F: FnOnce(&Budget) -> Decision,
    {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(current) = select_budget(&tx, department)? else {
            return Ok(Settlement::NotFound);
        };

        if let Decision::Rejected { reason } = decide(&current) {
            return Ok(Settlement::Rejected {
                budget: current,
                reason,
            });
        }

        let next = current.debited(amount);
        debug_assert!(next.is_consistent(), "debit broke budget invariant");

        let updated = tx.execute(
            "UPDATE budgets SET used_budget = ?1, remaining_budget = ?2
             WHERE department = ?3 AND remaining_budget = ?4",
            params![
                next.used_budget.to_string(),
                next.remaining_budget.to_string(),
                department,
                current.remaining_budget.to_string(),
            ],
        )?;
        if updated != 1 {
            return Err(StoreError::Conflict(department.to_string()));
        }

        let record = Transaction::approved(department.to_string(), amount, at);
        tx.execute(
            "INSERT INTO transactions (department, amount, status, reason, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.department,
                record.amount.to_string(),
                record.status.as_str(),
                record.reason,
                record.timestamp.to_rfc3339(),
            ],
        )?;
        let transaction_id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(Settlement::Approved {
            budget: next,
            transaction_id,
        })
    }

    // ── Audit log ─────────────────────────────────────────────

    pub(crate) fn transactions_for(&self, department: &str) -> Result<Vec<Transaction>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, department, amount, status, reason, timestamp
             FROM transactions WHERE department = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![department], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, department, amount, status, reason, timestamp
             FROM transactions ORDER BY id",
        )?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn migrate(conn: &mut Connection) -> Result<(), StoreError> {
    let has_version_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !has_version_table {
        tracing::debug!(version = schema::CURRENT_VERSION, "creating schema");
        let tx = conn.transaction()?;
        tx.execute_batch(schema::SCHEMA_V1)?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        return Ok(());
    }

    let current: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?
        .unwrap_or(0);

    for &(from_version, sql) in schema::MIGRATIONS {
        if current <= from_version {
            tracing::debug!(from_version, "applying migration");
            conn.execute_batch(sql)?;
        }
    }

    if current < schema::CURRENT_VERSION {
        conn.execute(
            "UPDATE schema_version SET version = ?1",
            params![schema::CURRENT_VERSION],
        )?;
    }

    Ok(())
}

fn select_budget(conn: &Connection, department: &str) -> rusqlite::Result<Option<Budget>> {
    conn.query_row(
        "SELECT department, total_budget, used_budget, remaining_budget
         FROM budgets WHERE department = ?1",
        params![department],
        budget_from_row,
    )
    .optional()
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        department: row.get(0)?,
        total_budget: decimal_column(row, 1)?,
        used_budget: decimal_column(row, 2)?,
        remaining_budget: decimal_column(row, 3)?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let status_str: String = row.get(3)?;
    let status = TxStatus::parse(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown transaction status '{status_str}'").into(),
        )
    })?;
    let ts_str: String = row.get(5)?;
    let timestamp = DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        department: row.get(1)?,
        amount: decimal_column(row, 2)?,
        status,
        reason: row.get(4)?,
        timestamp,
    })
}

/// Amounts are stored as TEXT so they round-trip exactly.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
