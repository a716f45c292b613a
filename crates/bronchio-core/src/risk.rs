//! # Risk Module
//!
//! Age and comorbidity inputs that raise the saturation threshold.
//!
//! Only membership matters: a profile with one risk factor is treated exactly
//! like a profile with five. Factors live in a `BTreeSet` so duplicates
//! collapse and iteration order is stable.

use crate::policy::AgeCutoff;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pre-existing comorbidity tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskFactor {
    /// Born before 37 weeks gestation.
    Preterm,
    ChronicLungDisease,
    CongenitalHeartDisease,
    Trisomy21,
    Immunodeficiency,
    TobaccoSmokeExposure,
    Neuromuscular,
}

impl RiskFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::Preterm => "preterm birth (< 37 weeks)",
            RiskFactor::ChronicLungDisease => "chronic lung disease",
            RiskFactor::CongenitalHeartDisease => "congenital heart disease",
            RiskFactor::Trisomy21 => "trisomy 21",
            RiskFactor::Immunodeficiency => "immunodeficiency",
            RiskFactor::TobaccoSmokeExposure => "tobacco smoke exposure",
            RiskFactor::Neuromuscular => "neuromuscular disease",
        }
    }
}

/// Raw risk fields from a form or request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInput {
    /// Age in days. Takes precedence over `high_risk_age` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<u32>,
    /// Explicit high-risk-age flag, for callers that only know the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_age: Option<bool>,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
}

/// Immutable risk profile for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    is_high_risk_age: bool,
    risk_factors: BTreeSet<RiskFactor>,
}

impl RiskProfile {
    /// Create a profile from an already-decided age flag.
    #[must_use]
    pub fn new(is_high_risk_age: bool, risk_factors: impl IntoIterator<Item = RiskFactor>) -> Self {
        Self {
            is_high_risk_age,
            risk_factors: risk_factors.into_iter().collect(),
        }
    }

    /// Resolve a raw input against the configured age cutoff.
    ///
    /// An explicit age wins over the flag. With neither, the infant is not
    /// treated as high-risk by age.
    #[must_use]
    pub fn from_input(input: &RiskInput, cutoff: AgeCutoff) -> Self {
        let is_high_risk_age = match (input.age_days, input.high_risk_age) {
            (Some(days), _) => cutoff.is_below(days),
            (None, Some(flag)) => flag,
            (None, None) => false,
        };
        Self::new(is_high_risk_age, input.risk_factors.iter().copied())
    }

    #[must_use]
    pub fn is_high_risk_age(&self) -> bool {
        self.is_high_risk_age
    }

    #[must_use]
    pub fn risk_factors(&self) -> &BTreeSet<RiskFactor> {
        &self.risk_factors
    }

    #[must_use]
    pub fn has_risk_factors(&self) -> bool {
        !self.risk_factors.is_empty()
    }
}
