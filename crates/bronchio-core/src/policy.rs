//! # Policy Module
//!
//! Named rule variants and clinical constants.
//!
//! Successive revisions of the bronchiolitis pathway disagree on a handful of
//! details: the high-risk age cutoff, whether poor feeding alone makes the
//! respiratory axis Severe, whether feeding folds into a single combined
//! tier, and where the saturation boundaries sit. Each of those choices is a
//! field here instead of an accident of branch order. `PolicyConfig::default()`
//! is the synthesis the engine is specified against.
//!
//! Numeric doses are integers (or integer fractions). The engine never does
//! floating-point arithmetic.

use crate::error::{BronchioError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// DEFAULTS
// =============================================================================

/// SpO2 strictly below this is Severe on the respiratory axis.
pub const DEFAULT_SEVERE_SATURATION_BELOW: u8 = 87;

/// SpO2 at or above this (with normal effort, behaviour and feeding) allows
/// fast-track discharge.
pub const DEFAULT_FAST_TRACK_SATURATION: u8 = 95;

/// Names accepted by [`PolicyConfig::preset`].
pub const PRESET_NAMES: [&str; 2] = ["synthesis", "combined-tier"];

// =============================================================================
// VARIANT KNOBS
// =============================================================================

/// Age below which an infant is high-risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeCutoff {
    /// Younger than 6 weeks (42 days).
    #[default]
    SixWeeks,
    /// Younger than 2 months (60 days).
    TwoMonths,
}

impl AgeCutoff {
    /// Cutoff in days.
    #[must_use]
    pub fn days(&self) -> u32 {
        match self {
            AgeCutoff::SixWeeks => 42,
            AgeCutoff::TwoMonths => 60,
        }
    }

    #[must_use]
    pub fn is_below(&self, age_days: u32) -> bool {
        age_days < self.days()
    }
}

/// How severity is exposed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeverityModel {
    /// Independent respiratory and feeding axes.
    #[default]
    Decomposed,
    /// Older single-tier model: reduced feeding also raises the respiratory
    /// tier to Moderate.
    Combined,
}

/// A fraction of calculated maintenance fluid volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceFraction {
    pub numerator: u8,
    pub denominator: u8,
}

impl MaintenanceFraction {
    pub const FULL: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.numerator == self.denominator
    }
}

impl fmt::Display for MaintenanceFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            write!(f, "full")
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

// =============================================================================
// CLINICAL CONSTANTS
// =============================================================================

/// Doses and limits. Configuration, not branching logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalConstants {
    /// High-flow starting rate, L/kg/min.
    pub high_flow_l_per_kg_per_min: u8,
    /// Fixed CPAP pressure when high flow fails, cmH2O.
    pub cpap_cm_h2o: u8,
    /// Maximum low-flow nasal prong rate, L/min.
    pub low_flow_max_l_per_min: u8,
    /// Restricted maintenance fraction for non-oral hydration.
    pub restricted_maintenance: MaintenanceFraction,
    /// Abort a wean when heart rate rises by more than this, bpm.
    pub wean_heart_rate_rise: u8,
    /// Abort a wean when respiratory rate rises by more than this.
    pub wean_respiratory_rate_rise: u8,
    /// Minimum hours on ambient air before standard discharge.
    pub ambient_air_min_hours: u8,
    /// Minimum oral intake before standard discharge, percent of normal.
    pub min_oral_intake_percent: u8,
}

impl Default for ClinicalConstants {
    fn default() -> Self {
        Self {
            high_flow_l_per_kg_per_min: 2,
            cpap_cm_h2o: 7,
            low_flow_max_l_per_min: 2,
            restricted_maintenance: MaintenanceFraction::TWO_THIRDS,
            wean_heart_rate_rise: 20,
            wean_respiratory_rate_rise: 10,
            ambient_air_min_hours: 4,
            min_oral_intake_percent: 50,
        }
    }
}

impl ClinicalConstants {
    pub fn validate(&self) -> Result<()> {
        check_within("constants.high_flow_l_per_kg_per_min", self.high_flow_l_per_kg_per_min, 1, 3)?;
        check_within("constants.cpap_cm_h2o", self.cpap_cm_h2o, 4, 10)?;
        check_within("constants.low_flow_max_l_per_min", self.low_flow_max_l_per_min, 1, 4)?;
        check_within("constants.wean_heart_rate_rise", self.wean_heart_rate_rise, 1, 60)?;
        check_within(
            "constants.wean_respiratory_rate_rise",
            self.wean_respiratory_rate_rise,
            1,
            40,
        )?;
        check_within("constants.ambient_air_min_hours", self.ambient_air_min_hours, 4, 12)?;
        check_within(
            "constants.min_oral_intake_percent",
            self.min_oral_intake_percent,
            50,
            75,
        )?;

        let fraction = self.restricted_maintenance;
        if fraction.denominator == 0 || fraction.numerator == 0 {
            return Err(BronchioError::InvalidPolicy {
                field: "constants.restricted_maintenance",
                reason: "numerator and denominator must be non-zero".to_string(),
            });
        }
        if fraction.numerator >= fraction.denominator {
            return Err(BronchioError::InvalidPolicy {
                field: "constants.restricted_maintenance",
                reason: format!("{}/{} is not a restriction", fraction.numerator, fraction.denominator),
            });
        }
        Ok(())
    }
}

// =============================================================================
// POLICY CONFIG
// =============================================================================

/// The full rule-variant selection for one engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub age_cutoff: AgeCutoff,
    pub severity_model: SeverityModel,
    /// Fold `feeding == Poor` into the respiratory Severe criteria.
    pub poor_feeding_is_respiratory_severe: bool,
    /// Raise the threshold for comorbidities as well as age.
    pub risk_factors_raise_threshold: bool,
    pub severe_saturation_below: u8,
    /// Count `spo2 == threshold` inside the Moderate band.
    pub moderate_band_includes_threshold: bool,
    pub fast_track_saturation: u8,
    pub constants: ClinicalConstants,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            age_cutoff: AgeCutoff::SixWeeks,
            severity_model: SeverityModel::Decomposed,
            poor_feeding_is_respiratory_severe: false,
            risk_factors_raise_threshold: true,
            severe_saturation_below: DEFAULT_SEVERE_SATURATION_BELOW,
            moderate_band_includes_threshold: false,
            fast_track_saturation: DEFAULT_FAST_TRACK_SATURATION,
            constants: ClinicalConstants::default(),
        }
    }
}

impl PolicyConfig {
    /// Look up a named preset.
    ///
    /// - `synthesis`: the default decomposed model.
    /// - `combined-tier`: single combined tier, threshold raised by age only.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "synthesis" => Ok(Self::default()),
            "combined-tier" => Ok(Self {
                severity_model: SeverityModel::Combined,
                risk_factors_raise_threshold: false,
                ..Self::default()
            }),
            other => Err(BronchioError::UnknownPreset(other.to_string())),
        }
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_within("severe_saturation_below", self.severe_saturation_below, 85, 88)?;
        check_within("fast_track_saturation", self.fast_track_saturation, 90, 100)?;
        self.constants.validate()
    }

    /// Consume and return `self` if valid.
    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

fn check_within(field: &'static str, value: u8, min: u8, max: u8) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(BronchioError::InvalidPolicy {
            field,
            reason: format!("{value} is outside {min}..={max}"),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
