mod clock;
mod config;
mod csv_io;
mod db;
mod ledger;
mod models;
mod policy;
mod run;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (args, db_flag) = config::take_db_flag(&args)?;
    let db_path = config::resolve_db_path(db_flag, std::env::var(config::DB_ENV_VAR).ok())?;
    tracing::debug!(path = %db_path.display(), "opening ledger database");

    let db = db::Database::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    run::as_cli(&args, &db)
}
