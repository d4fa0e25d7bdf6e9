use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::Transaction;

/// One `department,total_budget` row from a provisioning file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetRow {
    pub(crate) department: String,
    pub(crate) total_budget: Decimal,
}

/// Read provisioning rows. A first row whose second column is not a number
/// is treated as a header and skipped; blank departments are ignored.
pub(crate) fn read_budget_rows(path: &Path) -> Result<Vec<BudgetRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.context("Failed to read CSV record")?;
        let department = record.get(0).unwrap_or("").to_string();
        let raw_total = record.get(1).unwrap_or("");

        let total = parse_total(raw_total);
        if i == 0 && total.is_none() {
            continue;
        }
        if department.is_empty() {
            continue;
        }
        let total_budget = total
            .ok_or_else(|| anyhow::anyhow!("Row {}: invalid total '{}'", i + 1, raw_total))?;
        rows.push(BudgetRow {
            department,
            total_budget,
        });
    }

    if rows.is_empty() {
        anyhow::bail!("CSV file has no budget rows");
    }
    Ok(rows)
}

fn parse_total(s: &str) -> Option<Decimal> {
    let cleaned = s.replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned).ok()
}

/// Write the audit log, oldest first. Returns the number of rows written.
pub(crate) fn write_transactions(path: &Path, txns: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    wtr.write_record(["id", "department", "amount", "status", "reason", "timestamp"])?;
    for txn in txns {
        wtr.write_record([
            txn.id.map(|id| id.to_string()).unwrap_or_default(),
            txn.department.clone(),
            txn.amount.to_string(),
            txn.status.as_str().to_string(),
            txn.reason.clone().unwrap_or_default(),
            txn.timestamp.to_rfc3339(),
        ])?;
    }
    wtr.flush().context("Failed to flush CSV file")?;
    Ok(txns.len())
}

#[cfg(test)]
#[path = "csv_io_tests.rs"]
mod tests;
