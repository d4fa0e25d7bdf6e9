use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::error::{LedgerError, AMOUNT_NOT_A_NUMBER, AMOUNT_REQUIRED};

const SMALLEST_STEP: f64 = 1e-28;

/// A submitted amount that parsed as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Amount {
    Exact(Decimal),
    /// Finite, but larger in magnitude than a `Decimal` can hold.
    OutOfRange { negative: bool },
}

/// Turn the raw `amount` field into an [`Amount`].
///
/// Accepts JSON numbers and numeric strings (surrounding whitespace and
/// scientific notation allowed). Sign and magnitude are left to the policy:
/// values too large for `Decimal` come back as `OutOfRange`, values too small
/// round to the nearest representable one (possibly zero).
pub(crate) fn parse_amount(raw: Option<&Value>) -> Result<Amount, LedgerError> {
    let text = match raw {
        None | Some(Value::Null) => return Err(LedgerError::invalid(AMOUNT_REQUIRED)),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(LedgerError::invalid(AMOUNT_NOT_A_NUMBER)),
    };
    parse_number(&text).ok_or_else(|| LedgerError::invalid(AMOUNT_NOT_A_NUMBER))
}

fn parse_number(s: &str) -> Option<Amount> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Some(Amount::Exact(d));
    }

    // Numeric but outside what Decimal parses directly.
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // Below the smallest step Decimal can represent.
    if value.abs() < SMALLEST_STEP {
        return Some(Amount::Exact(Decimal::ZERO));
    }
    let negative = value.is_sign_negative();
    Some(match Decimal::try_from(value) {
        Ok(d) => Amount::Exact(d),
        Err(_) => Amount::OutOfRange { negative },
    })
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
