//! # Error Module
//!
//! The engine itself is total over validated input. Errors only arise at the
//! boundary: raw observations outside their declared ranges, and policy
//! configurations outside their clinically allowed ranges.

use thiserror::Error;

/// Errors raised while building engine inputs or validating a policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BronchioError {
    /// A raw observation field is outside its declared range.
    ///
    /// Values are reported, never clamped: clamping a vital sign could hide
    /// a Severe classification.
    #[error("invalid observation: {field} = {value} (allowed {min}..={max})")]
    InvalidObservation {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A policy value is outside its allowed range.
    #[error("invalid policy: {field}: {reason}")]
    InvalidPolicy { field: &'static str, reason: String },

    /// No preset with this name exists.
    #[error("unknown policy preset: {0}")]
    UnknownPreset(String),
}

impl BronchioError {
    /// Name of the offending field, if the error is tied to one.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidObservation { field, .. } | Self::InvalidPolicy { field, .. } => {
                Some(field)
            }
            Self::UnknownPreset(_) => None,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BronchioError>;
