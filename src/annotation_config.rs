//! # Annotation Configuration Module
//!
//! This module defines the options that drive quantity conversion and rounding
//! when recipe text is annotated.

use crate::errors::{AnnotateError, AnnotateResult};

// Constants for annotation configuration
pub const DEFAULT_TOLERANCE: f64 = 0.05;
pub const DEFAULT_VOLUME_MASS_PRECISION: u32 = 7;
pub const DEFAULT_TEMPERATURE_PRECISION: u32 = 1;
pub const MAX_PRECISION: u32 = 15;

/// Configuration options for quantity annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    /// Convert US customary quantities to metric
    pub convert_to_metric: bool,
    /// Round converted values to human-pleasing numbers
    pub round_satisfying: bool,
    /// Relative tolerance for satisfying rounding, in (0, 1)
    pub tolerance: f64,
    /// Decimal places kept for volume/mass conversions when rounding is off
    pub volume_mass_precision: u32,
    /// Decimal places kept for temperature conversions when rounding is off
    pub temperature_precision: u32,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            convert_to_metric: true,
            round_satisfying: true,
            tolerance: DEFAULT_TOLERANCE,
            volume_mass_precision: DEFAULT_VOLUME_MASS_PRECISION,
            temperature_precision: DEFAULT_TEMPERATURE_PRECISION,
        }
    }
}

impl AnnotationConfig {
    /// Annotate quantities in their original units only
    pub fn plain() -> Self {
        Self {
            convert_to_metric: false,
            ..Default::default()
        }
    }

    /// Metric conversion with explicit rounding choice
    pub fn metric(round_satisfying: bool) -> Self {
        Self {
            convert_to_metric: true,
            round_satisfying,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> AnnotateResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(AnnotateError::Config(format!(
                "tolerance must be between 0.0 and 1.0 (exclusive), got {}",
                self.tolerance
            )));
        }

        if self.volume_mass_precision > MAX_PRECISION {
            return Err(AnnotateError::Config(format!(
                "volume_mass_precision must be at most {MAX_PRECISION}, got {}",
                self.volume_mass_precision
            )));
        }

        if self.temperature_precision > MAX_PRECISION {
            return Err(AnnotateError::Config(format!(
                "temperature_precision must be at most {MAX_PRECISION}, got {}",
                self.temperature_precision
            )));
        }

        Ok(())
    }
}
