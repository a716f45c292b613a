//! # Bronchio Core
//!
//! Deterministic bronchiolitis decision engine.
//!
//! Given one risk profile and one observation snapshot, the engine derives:
//! - the risk-adjusted SpO2 threshold ([`threshold`])
//! - respiratory and feeding severity tiers ([`severity`])
//! - whether oral feeding is unsafe ([`airway`])
//! - the respiratory-support and hydration pillars ([`management`])
//! - the weaning/discharge path ([`discharge`])
//!
//! ## Invariants
//!
//! - Pure: no I/O, no clocks, no randomness, no global state
//! - Deterministic: identical input yields identical output
//! - Integer-only arithmetic
//! - Rule variants are selected through [`PolicyConfig`], never implicitly

pub mod advisory;
pub mod airway;
pub mod assessment;
pub mod discharge;
pub mod error;
pub mod management;
pub mod observation;
pub mod policy;
pub mod risk;
pub mod severity;
pub mod threshold;

pub use advisory::{Advisory, CareSetting};
pub use airway::{is_unsafe_to_feed, AirwayHazard};
pub use assessment::{assess, assess_request, Assessment, AssessmentRequest, Recommendation};
pub use discharge::{
    evaluate_discharge, evaluate_discharge_request, evaluate_standard_discharge,
    evaluate_wean_request, evaluate_wean_step, DischargeCriterion, DischargePath,
    DischargeObservationInput, DischargeReadiness, DischargeReport, DischargeRequest,
    StandardDischargeObservation, VitalSigns, VitalSignsInput, WeanAbortReason, WeanFailureCriteria, WeanOutcome, WeanReport, WeanRequest,
    WeaningPlan, WeaningStage,
};
pub use error::{BronchioError, Result};
pub use management::{HydrationPlan, HydrationRoute, RespiratorySupport};
pub use observation::{
    ApnoeaLevel, BehaviorState, EffortLevel, FeedingLevel, ObservationInput, ObservationSnapshot,
};
pub use policy::{AgeCutoff, ClinicalConstants, MaintenanceFraction, PolicyConfig, SeverityModel};
pub use risk::{RiskFactor, RiskInput, RiskProfile};
pub use severity::{classify, Finding, SeverityAssessment, SeverityTier};
pub use threshold::{compute_threshold, Threshold};
