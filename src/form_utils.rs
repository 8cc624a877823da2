//! Parsing and validation of HTML form input.
//!
//! Invalid amounts and dates are rejected here, before anything reaches
//! storage or the aggregation code.

use serde::{Deserialize, Deserializer};

use crate::date_utils::{parse_date, DATE_FORMAT};
use crate::error::{AppError, AppResult};
use crate::models::transaction::to_cents;

/// Blank or whitespace-only text fields become `None`; others are trimmed.
pub fn deserialize_optional_trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

/// Largest accepted amount, in major units.
pub const MAX_AMOUNT: f64 = 1e12;

/// Parse a positive decimal amount in major units into cents.
pub fn parse_amount_cents(raw: &str) -> AppResult<i64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid amount '{}'", raw.trim())))?;
    if !amount.is_finite() {
        return Err(AppError::Validation("Amount must be a finite number".into()));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "Amount must not exceed {}",
            MAX_AMOUNT
        )));
    }
    let cents = to_cents(amount);
    if cents <= 0 {
        return Err(AppError::Validation("Amount must be greater than zero".into()));
    }
    Ok(cents)
}

/// Validate a `YYYY-MM-DD` date, returning it normalized.
pub fn parse_form_date(raw: &str) -> AppResult<String> {
    if raw.trim().is_empty() {
        return Err(AppError::Validation("Date is required".into()));
    }
    parse_date(raw)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| AppError::Validation(format!("Invalid date '{}'", raw.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct NoteForm {
        #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
        note: Option<String>,
    }

    #[test]
    fn test_optional_trimmed() {
        let form: NoteForm = serde_json::from_str(r#"{"note": "  lunch "}"#).unwrap();
        assert_eq!(form.note.as_deref(), Some("lunch"));
        let form: NoteForm = serde_json::from_str(r#"{"note": "   "}"#).unwrap();
        assert_eq!(form.note, None);
        let form: NoteForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form.note, None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount_cents("12.34").unwrap(), 1234);
        assert_eq!(parse_amount_cents(" 5 ").unwrap(), 500);
        assert_eq!(parse_amount_cents("0.125").unwrap(), 13);
        assert!(parse_amount_cents("0").is_err());
        assert!(parse_amount_cents("-3").is_err());
        assert!(parse_amount_cents("0.001").is_err());
        assert!(parse_amount_cents("abc").is_err());
        assert!(parse_amount_cents("inf").is_err());
        assert!(parse_amount_cents("NaN").is_err());
    }

    #[test]
    fn test_parse_amount_upper_bound() {
        assert_eq!(parse_amount_cents("1e12").unwrap(), 100_000_000_000_000);
        assert!(matches!(
            parse_amount_cents("1e20"),
            Err(AppError::Validation(_))
        ));
        assert!(parse_amount_cents("1000000000000.01").is_err());
    }

    #[test]
    fn test_parse_form_date() {
        assert_eq!(parse_form_date("2026-03-05").unwrap(), "2026-03-05");
        assert!(matches!(parse_form_date(""), Err(AppError::Validation(_))));
        assert!(parse_form_date("2026-02-30").is_err());
        assert!(parse_form_date("05/03/2026").is_err());
    }
}
