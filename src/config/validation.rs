//! Semantic validation of sampling-settings blocks.
//!
//! # Responsibilities
//! - Semantic checks (serde handles syntactic)
//! - Value ranges: fractions within [0.0, 1.0], ranges ordered
//! - Mode exclusivity between explicit and fractional hash ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function over the config block; no side effects

use thiserror::Error;

use crate::config::schema::ShadowSettingsConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("key_fraction_range must satisfy 0.0 <= start <= end <= 1.0, got [{start}, {end}]")]
    FractionRangeOutOfBounds { start: f64, end: f64 },

    #[error("key_range must satisfy low <= high, got [{low}, {high}]")]
    KeyRangeInverted { low: u32, high: u32 },

    #[error("key_range and key_fraction_range are mutually exclusive")]
    ConflictingRanges,
}

/// Validate one settings block, collecting every error found.
pub fn validate_settings(config: &ShadowSettingsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.key_range.is_some() && config.key_fraction_range.is_some() {
        errors.push(ValidationError::ConflictingRanges);
    }
    if let Some([low, high]) = config.key_range {
        if low > high {
            errors.push(ValidationError::KeyRangeInverted { low, high });
        }
    }
    if let Some([start, end]) = config.key_fraction_range {
        if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) || start > end {
            errors.push(ValidationError::FractionRangeOutOfBounds { start, end });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
