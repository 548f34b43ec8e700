use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, Result};

use super::reminder_models::ReminderKind;

/// Required fields are optional here so their absence maps to a validation
/// error rather than a deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReminderRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "09:00")]
    pub time: Option<String>,
    #[serde(default)]
    pub days: Vec<i16>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReminderRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub days: Option<Vec<i16>>,
    #[serde(alias = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReminderFilters {
    #[serde(alias = "isActive")]
    pub is_active: Option<bool>,
}

pub fn validate_kind(kind: &str) -> Result<()> {
    ReminderKind::from_str(kind)
        .map(|_| ())
        .map_err(AppError::Validation)
}

/// Days are weekday numbers, 0=Sunday..6=Saturday; at least one is required.
pub fn validate_days(days: &[i16]) -> Result<()> {
    if days.is_empty() {
        return Err(AppError::Validation(
            "At least one day must be selected".to_string(),
        ));
    }
    if days.iter().any(|day| !(0..=6).contains(day)) {
        return Err(AppError::Validation(
            "Days must be between 0 (Sunday) and 6 (Saturday)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_days_rejected() {
        assert!(matches!(validate_days(&[]), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_day_rejected() {
        assert!(validate_days(&[1, 7]).is_err());
        assert!(validate_days(&[-1]).is_err());
    }

    #[test]
    fn test_valid_days_accepted() {
        assert!(validate_days(&[0, 6]).is_ok());
        assert!(validate_days(&[1, 3, 5]).is_ok());
    }

    #[test]
    fn test_kind_validation() {
        assert!(validate_kind("medication").is_ok());
        assert!(validate_kind("Medication").is_err());
        assert!(validate_kind("snack").is_err());
    }
}
