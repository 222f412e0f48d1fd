//! Business rules for a submitted campaign. Checks run in a fixed order and
//! the first failing rule decides the message shown to the user.

use crate::models::{CampaignInput, CampaignRecord};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Campaign name is required")]
    NameRequired,
    #[error("A campaign with this name already exists")]
    DuplicateName,
    #[error("Impressions must be a positive number")]
    ImpressionsNotPositive,
    #[error("Clicks must be a whole number")]
    ClicksInvalid,
    #[error("Clicks cannot be negative")]
    ClicksNegative,
    #[error("Clicks cannot exceed impressions")]
    ClicksExceedImpressions,
    #[error("Budget must be a positive number")]
    BudgetNotPositive,
    #[error(
        "Cannot calculate CPC with zero clicks. Either increase clicks or set budget to zero."
    )]
    ZeroClicksWithBudget,
}

/// Flat accept/reject view of a validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    pub reason: String,
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                reason: String::new(),
            },
            Err(err) => Self {
                ok: false,
                reason: err.to_string(),
            },
        }
    }
}

pub fn validate(input: &CampaignInput, existing: &[CampaignRecord]) -> Result<(), ValidationError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let lowered = name.to_lowercase();
    if existing
        .iter()
        .any(|record| record.name.to_lowercase() == lowered)
    {
        return Err(ValidationError::DuplicateName);
    }

    let impressions = match input.impressions {
        Some(value) if value > 0 => value,
        _ => return Err(ValidationError::ImpressionsNotPositive),
    };

    let clicks = input.clicks.ok_or(ValidationError::ClicksInvalid)?;
    if clicks < 0 {
        return Err(ValidationError::ClicksNegative);
    }
    if clicks > impressions {
        return Err(ValidationError::ClicksExceedImpressions);
    }

    let budget = match input.budget {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => return Err(ValidationError::BudgetNotPositive),
    };

    // Always fires for zero clicks since budget is positive by now.
    if clicks == 0 && budget > 0.0 {
        return Err(ValidationError::ZeroClicksWithBudget);
    }

    Ok(())
}
