//! Input validation for planting problems.
//!
//! Checks structural integrity of crop definitions and garden parameters
//! before catalog expansion and model construction. Detects:
//! - Duplicate crop names
//! - Zero lifespans (which would break cycle-multiplier and overlap math)
//! - Self-companionship (degenerate compound crops)
//! - Unknown companion and yield-target references
//! - Non-finite or negative rates and budgets
//! - Degenerate horizons and areas
//!
//! All findings are collected; nothing is reported piecemeal.

use std::collections::HashSet;

use crate::models::{BaseCrop, GardenPlan};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two crops share the same name.
    DuplicateName,
    /// A crop's lifespan is zero weeks.
    ZeroLifespan,
    /// A crop lists itself as a companion.
    SelfCompanion,
    /// A companion reference matches no base crop.
    UnknownCompanion,
    /// A yield, water-use, or nitrogen rate is not a finite number,
    /// or a yield/water-use rate is negative.
    InvalidRate,
    /// The planning horizon is zero weeks.
    DegenerateHorizon,
    /// The garden area is not a positive finite number.
    InvalidArea,
    /// A water budget is negative or not finite.
    InvalidWaterBudget,
    /// A yield target names no base crop.
    UnknownYieldTarget,
    /// A yield target's bounds are inconsistent.
    InvalidYieldBound,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the crop library.
///
/// Checks:
/// 1. No duplicate crop names
/// 2. Every lifespan is at least one week
/// 3. Yield and water-use rates are finite and non-negative; nitrogen
///    deltas are finite (they may be negative)
/// 4. No crop lists itself as a companion
/// 5. Every companion reference names an existing crop
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_crops(crops: &[BaseCrop]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for crop in crops {
        if !names.insert(crop.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateName,
                format!("Duplicate crop name: {}", crop.name),
            ));
        }
    }

    for crop in crops {
        if crop.lifespan == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroLifespan,
                format!("Crop '{}' has a zero-week lifespan", crop.name),
            ));
        }

        if !crop.yield_per_sqft.is_finite() || crop.yield_per_sqft < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRate,
                format!("Crop '{}' has an invalid yield rate", crop.name),
            ));
        }
        if !crop.water_use.is_finite() || crop.water_use < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRate,
                format!("Crop '{}' has an invalid water-use rate", crop.name),
            ));
        }
        if !crop.delta_n.is_finite() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidRate,
                format!("Crop '{}' has a non-finite nitrogen delta", crop.name),
            ));
        }

        for companion in &crop.companions {
            if companion == &crop.name {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfCompanion,
                    format!("Crop '{}' lists itself as a companion", crop.name),
                ));
            } else if !names.contains(companion.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCompanion,
                    format!(
                        "Crop '{}' references unknown companion '{companion}'",
                        crop.name
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates garden parameters against the crop library.
///
/// Checks:
/// 1. The horizon is at least one week
/// 2. The area is a positive finite number
/// 3. Water budgets are finite and non-negative
/// 4. Every yield target names an existing base crop
/// 5. Yield bounds are finite, non-negative, and mutually consistent
pub fn validate_garden(garden: &GardenPlan, crops: &[BaseCrop]) -> ValidationResult {
    let mut errors = Vec::new();

    if garden.weeks == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::DegenerateHorizon,
            "Planning horizon must be at least one week",
        ));
    }

    if !garden.sqft.is_finite() || garden.sqft <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidArea,
            format!("Garden area must be positive, got {}", garden.sqft),
        ));
    }

    for (label, budget) in [("greywater", garden.greywater), ("rainwater", garden.rainwater)] {
        if !budget.is_finite() || budget < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWaterBudget,
                format!("Weekly {label} budget must be non-negative, got {budget}"),
            ));
        }
    }

    let names: HashSet<&str> = crops.iter().map(|c| c.name.as_str()).collect();
    for target in &garden.yields {
        if !names.contains(target.plant.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownYieldTarget,
                format!("Yield target references unknown crop '{}'", target.plant),
            ));
        }

        if !target.min_yield.is_finite() || target.min_yield < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidYieldBound,
                format!("Yield target '{}' has an invalid minimum", target.plant),
            ));
        }
        if let Some(max) = target.max_yield {
            if !max.is_finite() || max < target.min_yield {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidYieldBound,
                    format!("Yield target '{}' has max below min", target.plant),
                ));
            }
        }
        if let Some(pct) = target.max_yield_pct {
            if !pct.is_finite() || pct <= 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidYieldBound,
                    format!("Yield target '{}' has a non-positive percentage cap", target.plant),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates crops and garden together.
pub fn validate_input(crops: &[BaseCrop], garden: &GardenPlan) -> ValidationResult {
    let mut errors = Vec::new();
    if let Err(mut e) = validate_crops(crops) {
        errors.append(&mut e);
    }
    if let Err(mut e) = validate_garden(garden, crops) {
        errors.append(&mut e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
