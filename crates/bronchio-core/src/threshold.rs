//! # Threshold Module
//!
//! The risk-adjusted minimum acceptable SpO2 on room air. Runs first; every
//! later component reads its output.

use crate::policy::PolicyConfig;
use crate::risk::RiskProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Threshold for infants without age or comorbidity risk.
pub const STANDARD_THRESHOLD: u8 = 90;

/// Threshold for high-risk infants.
pub const HIGH_RISK_THRESHOLD: u8 = 92;

/// Target oxygen saturation, percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Threshold(pub u8);

impl Threshold {
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.0 >= HIGH_RISK_THRESHOLD
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Compute the threshold: 92 for high-risk age or any risk factor, else 90.
///
/// When the policy disables `risk_factors_raise_threshold`, only age counts.
#[must_use]
pub fn compute_threshold(risk: &RiskProfile, policy: &PolicyConfig) -> Threshold {
    let factor_risk = policy.risk_factors_raise_threshold && risk.has_risk_factors();
    if risk.is_high_risk_age() || factor_risk {
        Threshold(HIGH_RISK_THRESHOLD)
    } else {
        Threshold(STANDARD_THRESHOLD)
    }
}
