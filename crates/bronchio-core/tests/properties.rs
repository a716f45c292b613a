//! Property tests over the whole input space.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use bronchio_core::discharge::is_fast_track_eligible;
use bronchio_core::{
    assess, classify, compute_threshold, is_unsafe_to_feed, ApnoeaLevel, BehaviorState,
    DischargePath, EffortLevel, FeedingLevel, HydrationPlan, ObservationSnapshot, PolicyConfig,
    RiskFactor, RiskProfile, SeverityTier, Threshold,
};
use proptest::prelude::*;
use proptest::sample::select;

// =============================================================================
// STRATEGIES
// =============================================================================

fn effort() -> impl Strategy<Value = EffortLevel> {
    select(vec![
        EffortLevel::Normal,
        EffortLevel::Mild,
        EffortLevel::Moderate,
        EffortLevel::SevereGrunting,
    ])
}

fn behavior() -> impl Strategy<Value = BehaviorState> {
    select(vec![
        BehaviorState::NormalAlert,
        BehaviorState::Irritable,
        BehaviorState::LethargicAms,
    ])
}

fn feeding() -> impl Strategy<Value = FeedingLevel> {
    select(vec![
        FeedingLevel::Adequate,
        FeedingLevel::Partial,
        FeedingLevel::Poor,
    ])
}

fn apnoea() -> impl Strategy<Value = ApnoeaLevel> {
    select(vec![
        ApnoeaLevel::None,
        ApnoeaLevel::ReportedByParents,
        ApnoeaLevel::ObservedClinically,
    ])
}

fn risk_factor() -> impl Strategy<Value = RiskFactor> {
    select(vec![
        RiskFactor::Preterm,
        RiskFactor::ChronicLungDisease,
        RiskFactor::CongenitalHeartDisease,
        RiskFactor::Trisomy21,
        RiskFactor::Immunodeficiency,
        RiskFactor::TobaccoSmokeExposure,
        RiskFactor::Neuromuscular,
    ])
}

fn observation_with_spo2(
    spo2: impl Strategy<Value = u8>,
) -> impl Strategy<Value = ObservationSnapshot> {
    (effort(), behavior(), feeding(), apnoea(), 10u16..=150, spo2).prop_map(
        |(effort, behavior, feeding, apnoea, rr, spo2)| {
            ObservationSnapshot::new(effort, behavior, feeding, apnoea, rr, spo2).unwrap()
        },
    )
}

fn observation() -> impl Strategy<Value = ObservationSnapshot> {
    observation_with_spo2(70u8..=100)
}

fn risk_profile() -> impl Strategy<Value = RiskProfile> {
    (any::<bool>(), prop::collection::vec(risk_factor(), 0..4))
        .prop_map(|(young, factors)| RiskProfile::new(young, factors))
}

fn threshold() -> impl Strategy<Value = Threshold> {
    select(vec![Threshold(90), Threshold(92)])
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn saturation_below_87_is_always_severe(
        obs in observation_with_spo2(70u8..87),
        threshold in threshold(),
    ) {
        let result = classify(&obs, threshold, &PolicyConfig::default());
        prop_assert_eq!(result.respiratory, SeverityTier::Severe);
    }

    #[test]
    fn moderate_band_is_at_least_moderate(
        obs in observation_with_spo2(87u8..92),
        threshold in threshold(),
    ) {
        prop_assume!(obs.oxygen_saturation() < threshold.value());
        let result = classify(&obs, threshold, &PolicyConfig::default());
        prop_assert!(result.respiratory >= SeverityTier::Moderate);
    }

    #[test]
    fn threshold_is_92_iff_any_risk(risk in risk_profile()) {
        let expected = if risk.is_high_risk_age() || !risk.risk_factors().is_empty() {
            Threshold(92)
        } else {
            Threshold(90)
        };
        prop_assert_eq!(compute_threshold(&risk, &PolicyConfig::default()), expected);
    }

    #[test]
    fn unsafe_to_feed_matches_guard_definition(obs in observation()) {
        let expected = obs.behavior() == BehaviorState::LethargicAms
            || obs.apnoea() == ApnoeaLevel::ObservedClinically
            || obs.effort() == EffortLevel::SevereGrunting;
        prop_assert_eq!(is_unsafe_to_feed(&obs), expected);
    }

    #[test]
    fn unsafe_airway_always_means_nil_by_mouth(obs in observation(), risk in risk_profile()) {
        let result = assess(&risk, &obs, &PolicyConfig::default());
        if result.unsafe_to_feed {
            prop_assert_eq!(result.recommendation.hydration_plan, HydrationPlan::NilByMouth);
        } else {
            prop_assert_ne!(result.recommendation.hydration_plan, HydrationPlan::NilByMouth);
        }
    }

    #[test]
    fn fast_track_is_strict_conjunction(obs in observation(), risk in risk_profile()) {
        let policy = PolicyConfig::default();
        let result = assess(&risk, &obs, &policy);
        let expected = obs.oxygen_saturation() >= 95
            && obs.effort() == EffortLevel::Normal
            && obs.behavior() == BehaviorState::NormalAlert
            && obs.feeding() == FeedingLevel::Adequate;
        prop_assert_eq!(is_fast_track_eligible(&obs, result.threshold, &policy), expected);
        let path = if expected { DischargePath::FastTrack } else { DischargePath::StandardWeaning };
        prop_assert_eq!(result.recommendation.discharge_path, path);
        prop_assert_eq!(result.weaning_plan.is_some(), !expected);
    }

    #[test]
    fn overall_is_max_of_axes(obs in observation(), risk in risk_profile()) {
        let result = assess(&risk, &obs, &PolicyConfig::default());
        prop_assert_eq!(
            result.overall_severity,
            result.severity.respiratory.max(result.severity.feeding)
        );
    }

    #[test]
    fn severe_respiratory_always_gets_high_flow(obs in observation(), risk in risk_profile()) {
        let result = assess(&risk, &obs, &PolicyConfig::default());
        if result.severity.respiratory == SeverityTier::Severe {
            prop_assert_eq!(
                result.recommendation.respiratory_support,
                bronchio_core::RespiratorySupport::HighFlowEscalation
            );
        }
    }
}

#[test]
fn guard_truth_table() {
    for lethargic in [false, true] {
        for observed in [false, true] {
            for grunting in [false, true] {
                let obs = ObservationSnapshot::new(
                    if grunting { EffortLevel::SevereGrunting } else { EffortLevel::Normal },
                    if lethargic { BehaviorState::LethargicAms } else { BehaviorState::NormalAlert },
                    FeedingLevel::Adequate,
                    if observed { ApnoeaLevel::ObservedClinically } else { ApnoeaLevel::None },
                    40,
                    97,
                )
                .unwrap();
                let result = assess(&RiskProfile::default(), &obs, &PolicyConfig::default());
                let expected = lethargic || observed || grunting;
                assert_eq!(result.unsafe_to_feed, expected);
                if expected {
                    assert_eq!(result.recommendation.hydration_plan, HydrationPlan::NilByMouth);
                } else {
                    assert_eq!(result.recommendation.hydration_plan, HydrationPlan::OralFeeding);
                }
            }
        }
    }
}
