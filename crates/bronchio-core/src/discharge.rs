//! # Discharge Module
//!
//! Weaning and discharge readiness.
//!
//! Evaluated from the observation snapshot and threshold directly, with its
//! own stability criteria, independent of the severity tier.
//!
//! - Fast track: SpO2 >= 95 with normal effort, normal behaviour and adequate
//!   feeding. No weaning trial.
//! - Standard weaning otherwise: staged reduction of support with explicit
//!   abort criteria, then a period on ambient air before discharge.

use crate::error::Result;
use crate::observation::{
    check_range, BehaviorState, EffortLevel, FeedingLevel, ObservationSnapshot,
    OXYGEN_SATURATION_RANGE, RESPIRATORY_RATE_RANGE,
};
use crate::policy::{ClinicalConstants, PolicyConfig};
use crate::risk::{RiskInput, RiskProfile};
use crate::threshold::{compute_threshold, Threshold};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Accepted heart rate during a wean, beats per minute.
pub const HEART_RATE_RANGE: RangeInclusive<u16> = 40..=250;

/// Accepted oral intake, percent of normal volume.
pub const ORAL_INTAKE_RANGE: RangeInclusive<u8> = 0..=100;

/// Accepted time observed on ambient air, hours (up to one week).
pub const AMBIENT_AIR_HOURS_RANGE: RangeInclusive<u8> = 0..=168;

// =============================================================================
// DISCHARGE PATH
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DischargePath {
    FastTrack,
    StandardWeaning,
}

impl DischargePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            DischargePath::FastTrack => "fast-track discharge",
            DischargePath::StandardWeaning => "standard weaning",
        }
    }
}

/// Strict conjunction of the four fast-track conditions.
///
/// The saturation floor is the policy's fast-track value, never lower than
/// the threshold itself.
#[must_use]
pub fn is_fast_track_eligible(
    obs: &ObservationSnapshot,
    threshold: Threshold,
    policy: &PolicyConfig,
) -> bool {
    let saturation_floor = policy.fast_track_saturation.max(threshold.value());
    obs.oxygen_saturation() >= saturation_floor
        && obs.effort() == EffortLevel::Normal
        && obs.behavior() == BehaviorState::NormalAlert
        && obs.feeding() == FeedingLevel::Adequate
}

#[must_use]
pub fn evaluate_discharge(
    obs: &ObservationSnapshot,
    threshold: Threshold,
    policy: &PolicyConfig,
) -> DischargePath {
    if is_fast_track_eligible(obs, threshold, policy) {
        DischargePath::FastTrack
    } else {
        DischargePath::StandardWeaning
    }
}

// =============================================================================
// WEANING PLAN
// =============================================================================

/// Stages of a wean, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeaningStage {
    /// Reduce FiO2 to ambient (21%) at the current flow.
    ReduceFio2ToAmbient,
    /// Remove flow.
    RemoveFlow,
    /// Observe on ambient air.
    ObserveOnAmbientAir,
}

pub const WEANING_STAGES: [WeaningStage; 3] = [
    WeaningStage::ReduceFio2ToAmbient,
    WeaningStage::RemoveFlow,
    WeaningStage::ObserveOnAmbientAir,
];

/// Abort the wean and resume the prior support level when any is breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeanFailureCriteria {
    /// Heart-rate rise strictly above this aborts.
    pub heart_rate_rise: u16,
    /// Respiratory-rate rise strictly above this aborts.
    pub respiratory_rate_rise: u16,
    /// SpO2 strictly below this aborts.
    pub min_saturation: Threshold,
}

impl WeanFailureCriteria {
    #[must_use]
    pub fn new(threshold: Threshold, constants: &ClinicalConstants) -> Self {
        Self {
            heart_rate_rise: u16::from(constants.wean_heart_rate_rise),
            respiratory_rate_rise: u16::from(constants.wean_respiratory_rate_rise),
            min_saturation: threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaningPlan {
    pub stages: Vec<WeaningStage>,
    pub failure_criteria: WeanFailureCriteria,
    pub ambient_air_min_hours: u8,
    pub min_oral_intake_percent: u8,
}

#[must_use]
pub fn weaning_plan(threshold: Threshold, constants: &ClinicalConstants) -> WeaningPlan {
    WeaningPlan {
        stages: WEANING_STAGES.to_vec(),
        failure_criteria: WeanFailureCriteria::new(threshold, constants),
        ambient_air_min_hours: constants.ambient_air_min_hours,
        min_oral_intake_percent: constants.min_oral_intake_percent,
    }
}

// =============================================================================
// WEAN TRIAL MONITORING
// =============================================================================

/// Vital signs as they arrive in a request body.
///
/// Wide signed integers, so an implausible value is reported by field
/// rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalSignsInput {
    pub heart_rate: i64,
    pub respiratory_rate: i64,
    pub oxygen_saturation: i64,
}

/// Vital signs sampled during a wean, within their accepted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VitalSigns {
    pub heart_rate: u16,
    pub respiratory_rate: u16,
    pub oxygen_saturation: u8,
}

impl VitalSigns {
    pub fn try_from_input(input: &VitalSignsInput) -> Result<Self> {
        Ok(Self {
            heart_rate: check_range("heart_rate", input.heart_rate, &HEART_RATE_RANGE)?,
            respiratory_rate: check_range(
                "respiratory_rate",
                input.respiratory_rate,
                &RESPIRATORY_RATE_RANGE,
            )?,
            oxygen_saturation: check_range(
                "oxygen_saturation",
                input.oxygen_saturation,
                &OXYGEN_SATURATION_RANGE,
            )?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WeanAbortReason {
    HeartRateRise { by: u16 },
    RespiratoryRateRise { by: u16 },
    Desaturation { saturation: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum WeanOutcome {
    Continue,
    /// Resume the prior support level.
    Abort { reasons: Vec<WeanAbortReason> },
}

impl WeanOutcome {
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, WeanOutcome::Abort { .. })
    }
}

/// Compare a sample taken during the wean against the pre-wean baseline.
#[must_use]
pub fn evaluate_wean_step(
    baseline: &VitalSigns,
    current: &VitalSigns,
    criteria: &WeanFailureCriteria,
) -> WeanOutcome {
    let mut reasons = Vec::new();

    let hr_rise = current.heart_rate.saturating_sub(baseline.heart_rate);
    if hr_rise > criteria.heart_rate_rise {
        reasons.push(WeanAbortReason::HeartRateRise { by: hr_rise });
    }

    let rr_rise = current.respiratory_rate.saturating_sub(baseline.respiratory_rate);
    if rr_rise > criteria.respiratory_rate_rise {
        reasons.push(WeanAbortReason::RespiratoryRateRise { by: rr_rise });
    }

    if current.oxygen_saturation < criteria.min_saturation.value() {
        reasons.push(WeanAbortReason::Desaturation {
            saturation: current.oxygen_saturation,
        });
    }

    if reasons.is_empty() {
        WeanOutcome::Continue
    } else {
        WeanOutcome::Abort { reasons }
    }
}

// =============================================================================
// STANDARD DISCHARGE
// =============================================================================

/// Discharge observations as they arrive in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeObservationInput {
    pub hours_on_ambient_air: i64,
    pub sleep_observed: bool,
    pub lowest_saturation_on_air: i64,
    pub oral_intake_percent: i64,
}

/// Observations gathered after support has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardDischargeObservation {
    pub hours_on_ambient_air: u8,
    /// The ambient-air period included a sleep.
    pub sleep_observed: bool,
    /// Lowest SpO2 recorded on ambient air.
    pub lowest_saturation_on_air: u8,
    /// Oral intake, percent of normal volume.
    pub oral_intake_percent: u8,
}

impl StandardDischargeObservation {
    pub fn try_from_input(input: &DischargeObservationInput) -> Result<Self> {
        Ok(Self {
            hours_on_ambient_air: check_range(
                "hours_on_ambient_air",
                input.hours_on_ambient_air,
                &AMBIENT_AIR_HOURS_RANGE,
            )?,
            sleep_observed: input.sleep_observed,
            lowest_saturation_on_air: check_range(
                "lowest_saturation_on_air",
                input.lowest_saturation_on_air,
                &OXYGEN_SATURATION_RANGE,
            )?,
            oral_intake_percent: check_range(
                "oral_intake_percent",
                input.oral_intake_percent,
                &ORAL_INTAKE_RANGE,
            )?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DischargeCriterion {
    AmbientAirDuration,
    SleepPeriodObserved,
    SaturationOnAmbientAir,
    OralIntake,
}

impl DischargeCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DischargeCriterion::AmbientAirDuration => "minimum time on ambient air",
            DischargeCriterion::SleepPeriodObserved => "ambient-air period includes sleep",
            DischargeCriterion::SaturationOnAmbientAir => "SpO2 at or above threshold on air",
            DischargeCriterion::OralIntake => "sustained oral intake",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeReadiness {
    pub ready: bool,
    pub unmet: Vec<DischargeCriterion>,
}

#[must_use]
pub fn evaluate_standard_discharge(
    observation: &StandardDischargeObservation,
    threshold: Threshold,
    constants: &ClinicalConstants,
) -> DischargeReadiness {
    let checks = [
        (
            observation.hours_on_ambient_air >= constants.ambient_air_min_hours,
            DischargeCriterion::AmbientAirDuration,
        ),
        (
            observation.sleep_observed,
            DischargeCriterion::SleepPeriodObserved,
        ),
        (
            observation.lowest_saturation_on_air >= threshold.value(),
            DischargeCriterion::SaturationOnAmbientAir,
        ),
        (
            observation.oral_intake_percent > constants.min_oral_intake_percent,
            DischargeCriterion::OralIntake,
        ),
    ];
    let unmet: Vec<_> = checks
        .into_iter()
        .filter_map(|(met, criterion)| (!met).then_some(criterion))
        .collect();
    DischargeReadiness {
        ready: unmet.is_empty(),
        unmet,
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// One wean-step check: baseline and current vitals for one infant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeanRequest {
    #[serde(default)]
    pub risk: RiskInput,
    pub baseline: VitalSignsInput,
    pub current: VitalSignsInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeanReport {
    pub threshold: Threshold,
    pub criteria: WeanFailureCriteria,
    pub outcome: WeanOutcome,
}

/// Validate a wean request, then evaluate the step.
pub fn evaluate_wean_request(request: &WeanRequest, policy: &PolicyConfig) -> Result<WeanReport> {
    let baseline = VitalSigns::try_from_input(&request.baseline)?;
    let current = VitalSigns::try_from_input(&request.current)?;
    let risk = RiskProfile::from_input(&request.risk, policy.age_cutoff);
    let threshold = compute_threshold(&risk, policy);
    let criteria = WeanFailureCriteria::new(threshold, &policy.constants);
    Ok(WeanReport {
        threshold,
        criteria,
        outcome: evaluate_wean_step(&baseline, &current, &criteria),
    })
}

/// One standard-discharge readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeRequest {
    #[serde(default)]
    pub risk: RiskInput,
    pub observation: DischargeObservationInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DischargeReport {
    pub threshold: Threshold,
    pub readiness: DischargeReadiness,
}

/// Validate a discharge request, then evaluate readiness.
pub fn evaluate_discharge_request(
    request: &DischargeRequest,
    policy: &PolicyConfig,
) -> Result<DischargeReport> {
    let observation = StandardDischargeObservation::try_from_input(&request.observation)?;
    let risk = RiskProfile::from_input(&request.risk, policy.age_cutoff);
    let threshold = compute_threshold(&risk, policy);
    Ok(DischargeReport {
        threshold,
        readiness: evaluate_standard_discharge(&observation, threshold, &policy.constants),
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::observation::ApnoeaLevel;
    use crate::error::BronchioError;

    fn snapshot(
        effort: EffortLevel,
        behavior: BehaviorState,
        feeding: FeedingLevel,
        spo2: u8,
    ) -> ObservationSnapshot {
        ObservationSnapshot::new(effort, behavior, feeding, ApnoeaLevel::None, 40, spo2).unwrap()
    }

    fn eligible() -> ObservationSnapshot {
        snapshot(
            EffortLevel::Normal,
            BehaviorState::NormalAlert,
            FeedingLevel::Adequate,
            95,
        )
    }

    #[test]
    fn fast_track_at_exact_boundary() {
        let policy = PolicyConfig::default();
        assert_eq!(
            evaluate_discharge(&eligible(), Threshold(92), &policy),
            DischargePath::FastTrack
        );
    }

    #[test]
    fn flipping_any_condition_forces_standard_weaning() {
        let policy = PolicyConfig::default();
        let threshold = Threshold(90);
        let variants = [
            snapshot(EffortLevel::Normal, BehaviorState::NormalAlert, FeedingLevel::Adequate, 94),
            snapshot(EffortLevel::Mild, BehaviorState::NormalAlert, FeedingLevel::Adequate, 98),
            snapshot(EffortLevel::Normal, BehaviorState::Irritable, FeedingLevel::Adequate, 98),
            snapshot(EffortLevel::Normal, BehaviorState::NormalAlert, FeedingLevel::Partial, 98),
        ];
        for obs in variants {
            assert_eq!(
                evaluate_discharge(&obs, threshold, &policy),
                DischargePath::StandardWeaning
            );
        }
    }

    #[test]
    fn fast_track_floor_never_below_threshold() {
        let policy = PolicyConfig {
            fast_track_saturation: 90,
            ..PolicyConfig::default()
        };
        let obs = snapshot(EffortLevel::Normal, BehaviorState::NormalAlert, FeedingLevel::Adequate, 91);
        assert!(!is_fast_track_eligible(&obs, Threshold(92), &policy));
        assert!(is_fast_track_eligible(&obs, Threshold(90), &policy));
    }

    #[test]
    fn weaning_plan_orders_stages() {
        let plan = weaning_plan(Threshold(92), &ClinicalConstants::default());
        assert_eq!(
            plan.stages,
            vec![
                WeaningStage::ReduceFio2ToAmbient,
                WeaningStage::RemoveFlow,
                WeaningStage::ObserveOnAmbientAir,
            ]
        );
        assert_eq!(plan.failure_criteria.heart_rate_rise, 20);
        assert_eq!(plan.failure_criteria.respiratory_rate_rise, 10);
        assert_eq!(plan.failure_criteria.min_saturation, Threshold(92));
    }

    #[test]
    fn wean_continues_at_limits() {
        let criteria = WeanFailureCriteria::new(Threshold(90), &ClinicalConstants::default());
        let baseline = VitalSigns {
            heart_rate: 140,
            respiratory_rate: 45,
            oxygen_saturation: 96,
        };
        let current = VitalSigns {
            heart_rate: 160,
            respiratory_rate: 55,
            oxygen_saturation: 90,
        };
        assert_eq!(
            evaluate_wean_step(&baseline, &current, &criteria),
            WeanOutcome::Continue
        );
    }

    #[test]
    fn wean_aborts_with_every_breached_reason() {
        let criteria = WeanFailureCriteria::new(Threshold(92), &ClinicalConstants::default());
        let baseline = VitalSigns {
            heart_rate: 140,
            respiratory_rate: 45,
            oxygen_saturation: 96,
        };
        let current = VitalSigns {
            heart_rate: 161,
            respiratory_rate: 56,
            oxygen_saturation: 91,
        };
        let outcome = evaluate_wean_step(&baseline, &current, &criteria);
        assert!(outcome.is_abort());
        assert_eq!(
            outcome,
            WeanOutcome::Abort {
                reasons: vec![
                    WeanAbortReason::HeartRateRise { by: 21 },
                    WeanAbortReason::RespiratoryRateRise { by: 11 },
                    WeanAbortReason::Desaturation { saturation: 91 },
                ]
            }
        );
    }

    #[test]
    fn falling_rates_are_not_rises() {
        let criteria = WeanFailureCriteria::new(Threshold(90), &ClinicalConstants::default());
        let baseline = VitalSigns {
            heart_rate: 170,
            respiratory_rate: 70,
            oxygen_saturation: 93,
        };
        let current = VitalSigns {
            heart_rate: 120,
            respiratory_rate: 40,
            oxygen_saturation: 95,
        };
        assert_eq!(
            evaluate_wean_step(&baseline, &current, &criteria),
            WeanOutcome::Continue
        );
    }

    #[test]
    fn wean_request_uses_risk_adjusted_threshold() {
        let request = WeanRequest {
            risk: RiskInput {
                risk_factors: vec![crate::risk::RiskFactor::Preterm],
                ..RiskInput::default()
            },
            baseline: VitalSignsInput {
                heart_rate: 140,
                respiratory_rate: 45,
                oxygen_saturation: 95,
            },
            current: VitalSignsInput {
                heart_rate: 145,
                respiratory_rate: 48,
                oxygen_saturation: 91,
            },
        };
        let report = evaluate_wean_request(&request, &PolicyConfig::default()).unwrap();
        assert_eq!(report.threshold, Threshold(92));
        assert_eq!(
            report.outcome,
            WeanOutcome::Abort {
                reasons: vec![WeanAbortReason::Desaturation { saturation: 91 }]
            }
        );
    }

    #[test]
    fn wean_request_rejects_implausible_heart_rate() {
        let vitals = VitalSignsInput {
            heart_rate: 20,
            respiratory_rate: 45,
            oxygen_saturation: 95,
        };
        let request = WeanRequest {
            risk: RiskInput::default(),
            baseline: vitals,
            current: vitals,
        };
        let err = evaluate_wean_request(&request, &PolicyConfig::default()).unwrap_err();
        assert_eq!(err.field(), Some("heart_rate"));
    }

    #[test]
    fn discharge_request_rejects_intake_above_hundred() {
        let request = DischargeRequest {
            risk: RiskInput::default(),
            observation: DischargeObservationInput {
                hours_on_ambient_air: 6,
                sleep_observed: true,
                lowest_saturation_on_air: 94,
                oral_intake_percent: 140,
            },
        };
        let err = evaluate_discharge_request(&request, &PolicyConfig::default()).unwrap_err();
        assert_eq!(err.field(), Some("oral_intake_percent"));
    }

    #[test]
    fn discharge_request_reports_values_beyond_narrow_types() {
        let request: DischargeRequest = serde_json::from_str(
            r#"{
                "observation": {
                    "hours_on_ambient_air": -2,
                    "sleep_observed": true,
                    "lowest_saturation_on_air": 94,
                    "oral_intake_percent": 80
                }
            }"#,
        )
        .unwrap();
        let err = evaluate_discharge_request(&request, &PolicyConfig::default()).unwrap_err();
        assert_eq!(
            err,
            BronchioError::InvalidObservation {
                field: "hours_on_ambient_air",
                value: -2,
                min: 0,
                max: 168,
            }
        );
    }

    #[test]
    fn wean_request_reports_saturation_beyond_u8() {
        let request: WeanRequest = serde_json::from_str(
            r#"{
                "baseline": { "heart_rate": 140, "respiratory_rate": 45, "oxygen_saturation": 95 },
                "current": { "heart_rate": 140, "respiratory_rate": 45, "oxygen_saturation": 300 }
            }"#,
        )
        .unwrap();
        let err = evaluate_wean_request(&request, &PolicyConfig::default()).unwrap_err();
        assert_eq!(
            err,
            BronchioError::InvalidObservation {
                field: "oxygen_saturation",
                value: 300,
                min: 70,
                max: 100,
            }
        );
    }

    #[test]
    fn standard_discharge_ready_when_all_met() {
        let observation = StandardDischargeObservation {
            hours_on_ambient_air: 4,
            sleep_observed: true,
            lowest_saturation_on_air: 92,
            oral_intake_percent: 60,
        };
        let readiness =
            evaluate_standard_discharge(&observation, Threshold(92), &ClinicalConstants::default());
        assert!(readiness.ready);
        assert!(readiness.unmet.is_empty());
    }

    #[test]
    fn standard_discharge_lists_unmet_criteria() {
        let observation = StandardDischargeObservation {
            hours_on_ambient_air: 3,
            sleep_observed: false,
            lowest_saturation_on_air: 89,
            oral_intake_percent: 50,
        };
        let readiness =
            evaluate_standard_discharge(&observation, Threshold(90), &ClinicalConstants::default());
        assert!(!readiness.ready);
        assert_eq!(
            readiness.unmet,
            vec![
                DischargeCriterion::AmbientAirDuration,
                DischargeCriterion::SleepPeriodObserved,
                DischargeCriterion::SaturationOnAmbientAir,
                DischargeCriterion::OralIntake,
            ]
        );
    }
}
