//! Field constraint checks shared by create and update inputs.

use crate::error::{LedgerError, LedgerResult};

/// Non-blank and at most `max` characters.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::Validation(format!("{field} must not be empty")));
    }
    max_chars(field, value, max)
}

pub(crate) fn optional_text(field: &str, value: Option<&str>, max: usize) -> LedgerResult<()> {
    match value {
        Some(value) => max_chars(field, value, max),
        None => Ok(()),
    }
}

/// Strictly positive and finite.
pub(crate) fn positive(field: &str, value: f64) -> LedgerResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!(
            "{field} must be greater than 0"
        )))
    }
}

pub(crate) fn finite(field: &str, value: f64) -> LedgerResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::Validation(format!("{field} must be a finite number")))
    }
}

fn max_chars(field: &str, value: &str, max: usize) -> LedgerResult<()> {
    if value.chars().count() > max {
        return Err(LedgerError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}
