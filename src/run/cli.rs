use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

use crate::db::Database;
use crate::ledger::{Ledger, LedgerError, SubmitRequest};

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let ledger = Ledger::new(db);
    match args.get(1).map(String::as_str) {
        Some("submit") => cli_submit(&args[2..], &ledger),
        Some("submit-json") => cli_submit_json(&args[2..], &ledger),
        Some("budget") => cli_budget(&args[2..], &ledger),
        Some("provision") => cli_provision(&args[2..], &ledger),
        Some("departments") => cli_departments(&ledger),
        Some("history") => cli_history(&args[2..], &ledger),
        Some("export") => cli_export(&args[2..], &ledger),
        Some("--help" | "-h" | "help") | None => {
            print_usage();
            Ok(())
        }
        Some("--version" | "-V" | "version") => {
            println!("budget-ledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(other) => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budget-ledger - policy-checked department budget ledger");
    println!();
    println!("Usage: budget-ledger [--db <path>] <command>");
    println!();
    println!("Commands:");
    println!("  submit <department> <amount> <role>   Submit a transaction for approval");
    println!("  submit-json <json|->                  Submit a JSON request body (- reads stdin)");
    println!("  budget <department>                   Show a department's budget");
    println!("  provision <department> <total>        Create a department budget");
    println!("  provision --csv <file.csv>            Create budgets from department,total rows");
    println!("  departments                           List all department budgets");
    println!("  history [department]                  List approved transactions");
    println!("  export <file.csv>                     Write the audit log to CSV");
    println!("  --help, -h                            Show this help");
    println!("  --version, -V                         Show version");
    println!();
    println!("Environment:");
    println!("  {}                      Database path (overridden by --db)", crate::config::DB_ENV_VAR);
    println!("  RUST_LOG                              Log filter, e.g. info");
}

/// Print a JSON body on stdout. Error bodies also fail the command so the
/// exit status reflects the outcome.
fn respond<T: Serialize>(result: Result<T, LedgerError>) -> Result<()> {
    match result {
        Ok(body) => {
            println!("{}", serde_json::to_string(&body)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string(&e.body())?);
            anyhow::bail!("request failed with status {}: {e}", e.status_code())
        }
    }
}

fn cli_submit(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: budget-ledger submit <department> <amount> <role>");
    }
    let req = SubmitRequest {
        department: Some(Value::String(args[0].clone())),
        amount: Some(Value::String(args[1].clone())),
        role: args.get(2).cloned().map(Value::String),
    };
    respond(ledger.submit(&req))
}

fn cli_submit_json(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    let body = match args.first().map(String::as_str) {
        Some("-") | None => std::io::read_to_string(std::io::stdin())
            .context("Failed to read request body from stdin")?,
        Some(json) => json.to_string(),
    };
    respond(SubmitRequest::from_json(&body).and_then(|req| ledger.submit(&req)))
}

fn cli_budget(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    let department = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: budget-ledger budget <department>"))?;
    respond(ledger.budget(department))
}

fn cli_provision(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    if let Some(file) = args
        .windows(2)
        .find(|w| w[0] == "--csv")
        .map(|w| w[1].as_str())
    {
        return provision_from_csv(Path::new(file), ledger);
    }

    if args.len() < 2 {
        anyhow::bail!("Usage: budget-ledger provision <department> <total> | --csv <file.csv>");
    }
    let total = Decimal::from_str(args[1].trim())
        .with_context(|| format!("Total must be a number: {}", args[1]))?;
    respond(ledger.provision(&args[0], total))
}

fn provision_from_csv(path: &Path, ledger: &Ledger<'_>) -> Result<()> {
    let rows = crate::csv_io::read_budget_rows(path)?;
    let mut created = 0;
    let mut skipped = Vec::new();
    for row in &rows {
        match ledger.provision(&row.department, row.total_budget) {
            Ok(_) => created += 1,
            Err(LedgerError::DepartmentExists(d)) => skipped.push(d),
            Err(e) => return Err(e).with_context(|| format!("Failed to provision {}", row.department)),
        }
    }
    println!("Provisioned {created} departments ({} already existed)", skipped.len());
    if !skipped.is_empty() {
        println!("  Skipped: {}", skipped.join(", "));
    }
    Ok(())
}

fn cli_departments(ledger: &Ledger<'_>) -> Result<()> {
    let budgets = ledger.budgets()?;
    if budgets.is_empty() {
        println!("No departments");
        return Ok(());
    }

    println!(
        "{:<20} {:>14} {:>14} {:>14}",
        "Department", "Total", "Used", "Remaining"
    );
    println!("{}", "─".repeat(65));
    for b in &budgets {
        println!(
            "{:<20} {:>14.2} {:>14.2} {:>14.2}",
            b.department, b.total_budget, b.used_budget, b.remaining_budget
        );
    }
    Ok(())
}

fn cli_history(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    let department = args.first().map(String::as_str);
    let txns = match ledger.history(department) {
        Ok(txns) => txns,
        Err(e) => return respond::<()>(Err(e)),
    };
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<6} {:<20} {:>14} {:<9} Timestamp",
        "ID", "Department", "Amount", "Status"
    );
    println!("{}", "─".repeat(80));
    for t in &txns {
        println!(
            "{:<6} {:<20} {:>14.2} {:<9} {}",
            t.id.unwrap_or(0),
            t.department,
            t.amount,
            t.status,
            t.timestamp.to_rfc3339(),
        );
    }
    Ok(())
}

fn cli_export(args: &[String], ledger: &Ledger<'_>) -> Result<()> {
    let output = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: budget-ledger export <file.csv>"))?;
    let path = shellexpand(output);
    let txns = ledger.history(None)?;
    let count = crate::csv_io::write_transactions(Path::new(&path), &txns)?;
    println!("Exported {count} transactions to {path}");
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
