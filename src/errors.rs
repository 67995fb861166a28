//! # Error Types Module
//!
//! This module defines the error type shared by every stage of the annotation
//! pipeline: numeric parsing, unit conversion, rounding, ingredient database
//! loading and configuration validation.

use thiserror::Error;

/// Errors raised by the annotation core
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Numeric literal matched none of the supported notations
    #[error("Invalid number format: {0}")]
    InvalidFormat(String),

    /// Fraction with a zero denominator
    #[error("Division by zero in fraction")]
    DivisionByZero,

    /// Conversion requested across measurement kinds (e.g. volume to mass)
    #[error("Cannot convert {from} to {to}: incompatible measurement kinds")]
    IncompatibleUnits { from: String, to: String },

    /// Conversion between two units of the same kind that has no formula
    #[error("Unsupported conversion path: {from} to {to}")]
    UnsupportedPath { from: String, to: String },

    /// Out-of-range argument (negative value, tolerance outside (0, 1), ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Ingredient database line that cannot be compiled into a match rule
    #[error("Invalid ingredient pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Annotation configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scanner pattern rejected by the regex engine
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Failure reading an ingredient database from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type AnnotateResult<T> = Result<T, AnnotateError>;
