use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV_VAR: &str = "BUDGET_LEDGER_DB";

/// Pull `--db <path>` out of the argument list, returning the remaining args
/// and the flag value if it was present.
pub(crate) fn take_db_flag(args: &[String]) -> Result<(Vec<String>, Option<PathBuf>)> {
    let mut rest = Vec::with_capacity(args.len());
    let mut db = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--db" {
            let value = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--db requires a path"))?;
            db = Some(PathBuf::from(value));
        } else {
            rest.push(arg.clone());
        }
    }
    Ok((rest, db))
}

/// Flag beats environment beats the per-user data directory.
pub(crate) fn resolve_db_path(flag: Option<PathBuf>, env: Option<String>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = env.filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_db_path()
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budget-ledger", "BudgetLedger")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("budget-ledger.db"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
