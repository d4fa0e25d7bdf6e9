pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    department        TEXT PRIMARY KEY NOT NULL,
    total_budget      TEXT NOT NULL,
    used_budget       TEXT NOT NULL,
    remaining_budget  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    department  TEXT NOT NULL REFERENCES budgets(department),
    amount      TEXT NOT NULL,
    status      TEXT NOT NULL,
    reason      TEXT,
    timestamp   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_department ON transactions(department);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
