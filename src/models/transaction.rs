use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Approved,
    Rejected,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Append-only audit record. Rows are written once and never updated.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub department: String,
    pub amount: Decimal,
    pub status: TxStatus,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn approved(department: String, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            department,
            amount,
            status: TxStatus::Approved,
            reason: None,
            timestamp,
        }
    }
}
