//! Reference scenarios for the full pipeline.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use bronchio_core::{
    assess, Advisory, ApnoeaLevel, BehaviorState, CareSetting, DischargePath, EffortLevel,
    FeedingLevel, HydrationPlan, ObservationSnapshot, PolicyConfig, RespiratorySupport,
    RiskProfile, SeverityTier, Threshold,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn snapshot(
    effort: EffortLevel,
    behavior: BehaviorState,
    feeding: FeedingLevel,
    apnoea: ApnoeaLevel,
    rr: u16,
    spo2: u8,
) -> ObservationSnapshot {
    ObservationSnapshot::new(effort, behavior, feeding, apnoea, rr, spo2).unwrap()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn scenario_a_well_infant_fast_tracks() {
    let obs = snapshot(
        EffortLevel::Normal,
        BehaviorState::NormalAlert,
        FeedingLevel::Adequate,
        ApnoeaLevel::None,
        40,
        97,
    );
    let risk = RiskProfile::new(false, []);
    let result = assess(&risk, &obs, &PolicyConfig::default());

    assert_eq!(result.threshold, Threshold(90));
    assert_eq!(result.severity.respiratory, SeverityTier::Mild);
    assert_eq!(result.severity.feeding, SeverityTier::Mild);
    assert!(!result.unsafe_to_feed);
    assert_eq!(
        result.recommendation.respiratory_support,
        RespiratorySupport::Monitoring
    );
    assert_eq!(
        result.recommendation.hydration_plan,
        HydrationPlan::OralFeeding
    );
    assert_eq!(
        result.recommendation.discharge_path,
        DischargePath::FastTrack
    );
}

#[test]
fn scenario_b_moderate_infant_gets_low_flow_and_ngt() {
    let obs = snapshot(
        EffortLevel::Moderate,
        BehaviorState::Irritable,
        FeedingLevel::Partial,
        ApnoeaLevel::ReportedByParents,
        60,
        91,
    );
    let risk = RiskProfile::new(false, []);
    let result = assess(&risk, &obs, &PolicyConfig::default());

    assert_eq!(result.threshold, Threshold(90));
    assert_eq!(result.severity.respiratory, SeverityTier::Moderate);
    assert_eq!(result.severity.feeding, SeverityTier::Moderate);
    assert!(!result.unsafe_to_feed);
    assert_eq!(
        result.recommendation.respiratory_support,
        RespiratorySupport::LowFlowOxygen
    );
    assert_eq!(
        result.recommendation.hydration_plan,
        HydrationPlan::NgtSupplementation
    );
    assert_eq!(
        result.recommendation.discharge_path,
        DischargePath::StandardWeaning
    );
}

#[test]
fn scenario_c_severe_infant_is_nil_by_mouth_despite_adequate_volume() {
    let obs = snapshot(
        EffortLevel::SevereGrunting,
        BehaviorState::LethargicAms,
        FeedingLevel::Adequate,
        ApnoeaLevel::ObservedClinically,
        85,
        80,
    );
    let risk = RiskProfile::new(true, []);
    let result = assess(&risk, &obs, &PolicyConfig::default());

    assert_eq!(result.threshold, Threshold(92));
    assert_eq!(result.severity.respiratory, SeverityTier::Severe);
    assert_eq!(result.severity.feeding, SeverityTier::Mild);
    assert!(result.unsafe_to_feed);
    assert!(result.recommendation.is_airway_unsafe);
    assert_eq!(
        result.recommendation.respiratory_support,
        RespiratorySupport::HighFlowEscalation
    );
    assert_eq!(
        result.recommendation.hydration_plan,
        HydrationPlan::NilByMouth
    );
    assert_eq!(
        result.recommendation.discharge_path,
        DischargePath::StandardWeaning
    );
}

#[test]
fn scenario_d_saturation_87_is_moderate_not_severe() {
    let obs = snapshot(
        EffortLevel::Normal,
        BehaviorState::NormalAlert,
        FeedingLevel::Adequate,
        ApnoeaLevel::None,
        40,
        87,
    );
    let risk = RiskProfile::new(false, []);
    let result = assess(&risk, &obs, &PolicyConfig::default());

    assert_eq!(result.threshold, Threshold(90));
    assert_eq!(result.severity.respiratory, SeverityTier::Moderate);
}

// =============================================================================
// POLICY VARIANTS
// =============================================================================

#[test]
fn combined_preset_ignores_comorbidities_for_threshold() {
    let obs = snapshot(
        EffortLevel::Normal,
        BehaviorState::NormalAlert,
        FeedingLevel::Partial,
        ApnoeaLevel::None,
        40,
        91,
    );
    let risk = RiskProfile::new(false, [bronchio_core::RiskFactor::Trisomy21]);
    let policy = PolicyConfig::preset("combined-tier").unwrap();
    let result = assess(&risk, &obs, &policy);

    assert_eq!(result.threshold, Threshold(90));
    // Partial feeding is folded into the single tier
    assert_eq!(result.severity.respiratory, SeverityTier::Moderate);
    assert_eq!(
        result.recommendation.respiratory_support,
        RespiratorySupport::LowFlowOxygen
    );
}

#[test]
fn combined_preset_poor_feeding_alone_is_ward_observation() {
    let obs = snapshot(
        EffortLevel::Normal,
        BehaviorState::NormalAlert,
        FeedingLevel::Poor,
        ApnoeaLevel::None,
        40,
        97,
    );
    let risk = RiskProfile::new(false, []);
    let policy = PolicyConfig::preset("combined-tier").unwrap();
    let result = assess(&risk, &obs, &policy);

    assert_eq!(result.severity.respiratory, SeverityTier::Moderate);
    assert_eq!(result.overall_severity, SeverityTier::Moderate);
    assert_eq!(result.care_setting, CareSetting::WardObservation);
    assert!(!result.advisories.contains(&Advisory::SeniorReview));
}

#[test]
fn identical_input_yields_identical_output() {
    let obs = snapshot(
        EffortLevel::Moderate,
        BehaviorState::Irritable,
        FeedingLevel::Poor,
        ApnoeaLevel::ReportedByParents,
        66,
        89,
    );
    let risk = RiskProfile::new(true, []);
    let policy = PolicyConfig::default();

    let first = assess(&risk, &obs, &policy);
    let second = assess(&risk, &obs, &policy);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
