#![allow(clippy::unwrap_used)]

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_take_db_flag_absent() {
    let (rest, db) = take_db_flag(&args(&["budget-ledger", "budget", "Sales"])).unwrap();
    assert_eq!(rest, args(&["budget-ledger", "budget", "Sales"]));
    assert!(db.is_none());
}

#[test]
fn test_take_db_flag_anywhere() {
    let (rest, db) =
        take_db_flag(&args(&["budget-ledger", "budget", "--db", "/tmp/l.db", "Sales"])).unwrap();
    assert_eq!(rest, args(&["budget-ledger", "budget", "Sales"]));
    assert_eq!(db, Some(PathBuf::from("/tmp/l.db")));
}

#[test]
fn test_take_db_flag_missing_value() {
    assert!(take_db_flag(&args(&["budget-ledger", "departments", "--db"])).is_err());
}

#[test]
fn test_flag_beats_env() {
    let path = resolve_db_path(
        Some(PathBuf::from("flag.db")),
        Some("env.db".into()),
    )
    .unwrap();
    assert_eq!(path, PathBuf::from("flag.db"));
}

#[test]
fn test_env_used_without_flag() {
    let path = resolve_db_path(None, Some("env.db".into())).unwrap();
    assert_eq!(path, PathBuf::from("env.db"));
}
