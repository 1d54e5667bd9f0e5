use std::collections::HashSet;

use chrono::NaiveDate;
use common::MonthFilter;

use crate::error::AppError;

/// Upper bound on students in one attendance submission.
pub const MAX_BATCH_SIZE: usize = 500;

/// Validate a subject code (1-16 ASCII letters or digits).
pub fn validate_subject_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > 16 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(
            "Subject code must be 1-16 letters or digits".into(),
        ));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

pub fn validate_month_year(month: u32, year: i32) -> Result<MonthFilter, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("Month must be between 1 and 12".into()));
    }
    if !(1900..=9999).contains(&year) {
        return Err(AppError::Validation(
            "Year must be between 1900 and 9999".into(),
        ));
    }
    Ok(MonthFilter::new(month, year))
}

/// Validate an ID list for bulk operations (non-empty, no duplicates, max length).
pub fn validate_bulk_ids(ids: &[i32], name: &str, max: usize) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    if ids.len() > max {
        return Err(AppError::Validation(format!("Too many {name}: max {max}")));
    }
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("Duplicate {name} ID: {id}")));
        }
    }
    Ok(())
}
