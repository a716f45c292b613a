//! # Severity Module
//!
//! Maps an observation snapshot and threshold to severity tiers.
//!
//! Classification is two steps:
//! 1. Evaluate every Severe and Moderate criterion independently, collecting
//!    the findings that fired.
//! 2. Resolve the tier explicitly: Severe > Moderate > Mild.
//!
//! No criterion depends on another having been checked first, so the result
//! does not depend on evaluation order.

use crate::observation::{ApnoeaLevel, BehaviorState, EffortLevel, FeedingLevel, ObservationSnapshot};
use crate::policy::{PolicyConfig, SeverityModel};
use crate::threshold::Threshold;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Respiratory rate strictly above this is Severe.
pub const SEVERE_RESPIRATORY_RATE_ABOVE: u16 = 70;

/// Respiratory rate at or above this (up to the Severe limit) is Moderate.
pub const MODERATE_RESPIRATORY_RATE_FROM: u16 = 50;

// =============================================================================
// TIERS
// =============================================================================

/// Clinical acuity. Ordered: Mild < Moderate < Severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Mild => "mild",
            SeverityTier::Moderate => "moderate",
            SeverityTier::Severe => "severe",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityTier::Mild => write!(f, "Mild"),
            SeverityTier::Moderate => write!(f, "Moderate"),
            SeverityTier::Severe => write!(f, "Severe"),
        }
    }
}

/// Resolve independent tier predicates. Severe always wins.
#[must_use]
pub fn resolve_tier(severe: bool, moderate: bool) -> SeverityTier {
    if severe {
        SeverityTier::Severe
    } else if moderate {
        SeverityTier::Moderate
    } else {
        SeverityTier::Mild
    }
}

// =============================================================================
// FINDINGS
// =============================================================================

/// A single criterion that fired during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Finding {
    SevereRecessionOrGrunting,
    /// SpO2 below the Severe cutoff.
    Hypoxaemia,
    LethargyOrAlteredMentalState,
    ObservedApnoea,
    /// Respiratory rate above 70.
    MarkedTachypnoea,
    /// Poor feeding counted on the respiratory axis (variant flag).
    PoorFeedingRespiratory,
    ModerateRecession,
    Irritability,
    ReportedApnoea,
    /// SpO2 between the Severe cutoff and the threshold.
    SaturationBelowThreshold,
    /// Respiratory rate 50-70.
    Tachypnoea,
    /// Reduced feeding folded into the combined tier.
    ReducedFeedingCombined,
}

impl Finding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Finding::SevereRecessionOrGrunting => "severe recession or grunting",
            Finding::Hypoxaemia => "SpO2 below severe cutoff",
            Finding::LethargyOrAlteredMentalState => "lethargy or altered mental state",
            Finding::ObservedApnoea => "apnoea observed clinically",
            Finding::MarkedTachypnoea => "respiratory rate above 70",
            Finding::PoorFeedingRespiratory => "poor feeding (< 50%)",
            Finding::ModerateRecession => "moderate recession",
            Finding::Irritability => "irritable, difficult to soothe",
            Finding::ReportedApnoea => "apnoea reported by parents",
            Finding::SaturationBelowThreshold => "SpO2 below threshold",
            Finding::Tachypnoea => "respiratory rate 50-70",
            Finding::ReducedFeedingCombined => "reduced feeding",
        }
    }
}

/// Criteria that each independently make the respiratory axis Severe.
#[must_use]
pub fn severe_findings(obs: &ObservationSnapshot, policy: &PolicyConfig) -> Vec<Finding> {
    let checks = [
        (
            obs.effort() == EffortLevel::SevereGrunting,
            Finding::SevereRecessionOrGrunting,
        ),
        (
            obs.oxygen_saturation() < policy.severe_saturation_below,
            Finding::Hypoxaemia,
        ),
        (
            obs.behavior() == BehaviorState::LethargicAms,
            Finding::LethargyOrAlteredMentalState,
        ),
        (
            obs.apnoea() == ApnoeaLevel::ObservedClinically,
            Finding::ObservedApnoea,
        ),
        (
            obs.respiratory_rate() > SEVERE_RESPIRATORY_RATE_ABOVE,
            Finding::MarkedTachypnoea,
        ),
        (
            policy.poor_feeding_is_respiratory_severe && obs.feeding() == FeedingLevel::Poor,
            Finding::PoorFeedingRespiratory,
        ),
    ];
    collect_fired(checks)
}

/// Criteria that each independently make the respiratory axis at least
/// Moderate. Evaluated regardless of whether any Severe criterion fired.
#[must_use]
pub fn moderate_findings(
    obs: &ObservationSnapshot,
    threshold: Threshold,
    policy: &PolicyConfig,
) -> Vec<Finding> {
    let rate = obs.respiratory_rate();
    let checks = [
        (
            obs.effort() == EffortLevel::Moderate,
            Finding::ModerateRecession,
        ),
        (
            obs.behavior() == BehaviorState::Irritable,
            Finding::Irritability,
        ),
        (
            obs.apnoea() == ApnoeaLevel::ReportedByParents,
            Finding::ReportedApnoea,
        ),
        (
            in_moderate_saturation_band(obs.oxygen_saturation(), threshold, policy),
            Finding::SaturationBelowThreshold,
        ),
        (
            (MODERATE_RESPIRATORY_RATE_FROM..=SEVERE_RESPIRATORY_RATE_ABOVE).contains(&rate),
            Finding::Tachypnoea,
        ),
        (
            policy.severity_model == SeverityModel::Combined
                && obs.feeding() != FeedingLevel::Adequate,
            Finding::ReducedFeedingCombined,
        ),
    ];
    collect_fired(checks)
}

/// `severe cutoff <= spo2 < threshold`, or `<= threshold` when the policy
/// makes the upper bound inclusive.
#[must_use]
pub fn in_moderate_saturation_band(spo2: u8, threshold: Threshold, policy: &PolicyConfig) -> bool {
    let above_severe = spo2 >= policy.severe_saturation_below;
    let below_threshold = if policy.moderate_band_includes_threshold {
        spo2 <= threshold.value()
    } else {
        spo2 < threshold.value()
    };
    above_severe && below_threshold
}

fn collect_fired<const N: usize>(checks: [(bool, Finding); N]) -> Vec<Finding> {
    checks
        .into_iter()
        .filter_map(|(fired, finding)| fired.then_some(finding))
        .collect()
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Feeding axis: Poor → Severe, Partial → Moderate, Adequate → Mild.
#[must_use]
pub fn classify_feeding(feeding: FeedingLevel) -> SeverityTier {
    match feeding {
        FeedingLevel::Poor => SeverityTier::Severe,
        FeedingLevel::Partial => SeverityTier::Moderate,
        FeedingLevel::Adequate => SeverityTier::Mild,
    }
}

/// Both severity axes plus the findings behind the respiratory tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    pub respiratory: SeverityTier,
    pub feeding: SeverityTier,
    /// Severe findings first, then Moderate findings.
    pub findings: Vec<Finding>,
}

impl SeverityAssessment {
    /// The tier that drives the care setting.
    ///
    /// Decomposed: the higher of the two axes. Combined: the single combined
    /// tier, which already carries the feeding criteria.
    #[must_use]
    pub fn overall(&self, model: SeverityModel) -> SeverityTier {
        match model {
            SeverityModel::Decomposed => self.respiratory.max(self.feeding),
            SeverityModel::Combined => self.respiratory,
        }
    }
}

/// Classify one snapshot.
///
/// Under [`SeverityModel::Combined`] the respiratory tier is the single
/// combined tier of the older pathway; the feeding axis is still reported.
#[must_use]
pub fn classify(
    obs: &ObservationSnapshot,
    threshold: Threshold,
    policy: &PolicyConfig,
) -> SeverityAssessment {
    let severe = severe_findings(obs, policy);
    let moderate = moderate_findings(obs, threshold, policy);
    let respiratory = resolve_tier(!severe.is_empty(), !moderate.is_empty());

    let mut findings = severe;
    findings.extend(moderate);

    SeverityAssessment {
        respiratory,
        feeding: classify_feeding(obs.feeding()),
        findings,
    }
}

// =============================================================================
// TESTS
// =============================================================================
