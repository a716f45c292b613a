//! # Assessment Module
//!
//! The evaluation pipeline and its output aggregate.
//!
//! Order:
//! 1. Threshold from the risk profile.
//! 2. Severity classification and the airway guard, independently.
//! 3. Management pillars from both.
//! 4. Discharge path from the snapshot and threshold.
//!
//! Nothing is shared between evaluations. The output carries the
//! intermediate values so a presentation layer can display them without
//! recomputing anything.

use crate::advisory::{advisories, Advisory, AdvisoryContext, CareSetting};
use crate::airway::{airway_hazards, AirwayHazard};
use crate::discharge::{evaluate_discharge, weaning_plan, DischargePath, WeaningPlan};
use crate::error::Result;
use crate::management::{
    self, HydrationPlan, HydrationPlanDetail, RespiratorySupport, RespiratorySupportPlan,
};
use crate::observation::{ObservationInput, ObservationSnapshot};
use crate::policy::PolicyConfig;
use crate::risk::{RiskFactor, RiskInput, RiskProfile};
use crate::severity::{classify, SeverityAssessment, SeverityTier};
use crate::threshold::{compute_threshold, Threshold};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST / RECOMMENDATION
// =============================================================================

/// One raw evaluation request: risk fields plus observation fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub risk: RiskInput,
    pub observation: ObservationInput,
}

/// The headline decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub respiratory_support: RespiratorySupport,
    pub hydration_plan: HydrationPlan,
    pub is_airway_unsafe: bool,
    pub discharge_path: DischargePath,
}

// =============================================================================
// ASSESSMENT
// =============================================================================

/// Complete result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// The validated observations this result was derived from.
    pub observation: ObservationInput,
    pub high_risk_age: bool,
    pub risk_factors: Vec<RiskFactor>,
    pub threshold: Threshold,
    pub severity: SeverityAssessment,
    pub overall_severity: SeverityTier,
    pub unsafe_to_feed: bool,
    pub airway_hazards: Vec<AirwayHazard>,
    pub recommendation: Recommendation,
    pub care_setting: CareSetting,
    pub respiratory_plan: RespiratorySupportPlan,
    pub hydration_plan: HydrationPlanDetail,
    /// Present only on the standard weaning path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaning_plan: Option<WeaningPlan>,
    pub advisories: Vec<Advisory>,
}

/// Run the full pipeline over validated inputs.
#[must_use]
pub fn assess(risk: &RiskProfile, obs: &ObservationSnapshot, policy: &PolicyConfig) -> Assessment {
    let threshold = compute_threshold(risk, policy);

    let severity = classify(obs, threshold, policy);
    let hazards = airway_hazards(obs);
    let unsafe_to_feed = !hazards.is_empty();

    let plan = management::plan(
        severity.respiratory,
        severity.feeding,
        unsafe_to_feed,
        threshold,
        obs,
        &policy.constants,
    );

    let discharge_path = evaluate_discharge(obs, threshold, policy);
    let weaning = match discharge_path {
        DischargePath::FastTrack => None,
        DischargePath::StandardWeaning => Some(weaning_plan(threshold, &policy.constants)),
    };

    let overall = severity.overall(policy.severity_model);
    let notes = advisories(&AdvisoryContext {
        obs,
        threshold,
        overall,
        on_oxygen: plan.respiratory.support != RespiratorySupport::Monitoring,
        hydration_route: plan.hydration.route,
        policy,
    });

    Assessment {
        observation: ObservationInput::from(obs),
        high_risk_age: risk.is_high_risk_age(),
        risk_factors: risk.risk_factors().iter().copied().collect(),
        threshold,
        overall_severity: overall,
        unsafe_to_feed,
        airway_hazards: hazards,
        recommendation: Recommendation {
            respiratory_support: plan.respiratory.support,
            hydration_plan: plan.hydration.plan,
            is_airway_unsafe: unsafe_to_feed,
            discharge_path,
        },
        care_setting: CareSetting::for_tier(overall),
        respiratory_plan: plan.respiratory,
        hydration_plan: plan.hydration,
        weaning_plan: weaning,
        advisories: notes,
        severity,
    }
}

/// Validate a raw request, then assess it.
pub fn assess_request(request: &AssessmentRequest, policy: &PolicyConfig) -> Result<Assessment> {
    let obs = ObservationSnapshot::try_from_input(&request.observation)?;
    let risk = RiskProfile::from_input(&request.risk, policy.age_cutoff);
    Ok(assess(&risk, &obs, policy))
}

impl Assessment {
    /// Format as plain text with the standard template.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str("│ OBSERVATIONS                        │\n");
        let obs = &self.observation;
        output.push_str(&format!("│ - Work of breathing: {}\n", obs.effort.as_str()));
        output.push_str(&format!("│ - Behaviour: {}\n", obs.behavior.as_str()));
        output.push_str(&format!("│ - Feeding: {}\n", obs.feeding.as_str()));
        output.push_str(&format!("│ - Apnoea: {}\n", obs.apnoea.as_str()));
        output.push_str(&format!(
            "│ - RR {}/min, SpO2 {}%\n",
            obs.respiratory_rate, obs.oxygen_saturation
        ));
        let mut risks: Vec<&str> = Vec::new();
        if self.high_risk_age {
            risks.push("high-risk age");
        }
        risks.extend(self.risk_factors.iter().map(|r| r.as_str()));
        if risks.is_empty() {
            output.push_str("│ - Risk factors: (none)\n");
        } else {
            output.push_str(&format!("│ - Risk factors: {}\n", risks.join(", ")));
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str(&format!(
            "│ CLASSIFICATION: {}\n",
            self.overall_severity
        ));
        let band = if self.threshold.is_high_risk() {
            " (high-risk)"
        } else {
            ""
        };
        output.push_str(&format!("│ - SpO2 threshold: {}{}\n", self.threshold, band));
        output.push_str(&format!(
            "│ - Respiratory severity: {}\n",
            self.severity.respiratory
        ));
        output.push_str(&format!("│ - Feeding severity: {}\n", self.severity.feeding));
        if self.severity.findings.is_empty() {
            output.push_str("│ - Findings: (none)\n");
        } else {
            let findings = self
                .severity
                .findings
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("│ - Findings: {}\n", findings));
        }
        output.push_str(&format!("│ - Care setting: {}\n", self.care_setting.as_str()));

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ RESPIRATORY SUPPORT                 │\n");
        let resp = &self.respiratory_plan;
        output.push_str(&format!("│ - {}\n", resp.support.as_str()));
        if resp.support != RespiratorySupport::Monitoring {
            output.push_str(&format!("│ - Target SpO2 >= {}\n", resp.target_saturation));
        }
        if let Some(max) = resp.low_flow_max_l_per_min {
            output.push_str(&format!("│ - Nasal prongs up to {} L/min\n", max));
        }
        if let Some(rate) = resp.high_flow_l_per_kg_per_min {
            output.push_str(&format!("│ - High flow at {} L/kg/min\n", rate));
        }
        if let Some(cpap) = resp.escalation_cpap_cm_h2o {
            output.push_str(&format!(
                "│ - CPAP {} cmH2O if high flow fails or apnoea persists\n",
                cpap
            ));
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ HYDRATION & FEEDING                 │\n");
        let hydration = &self.hydration_plan;
        output.push_str(&format!("│ - {}\n", hydration.plan.as_str()));
        output.push_str(&format!(
            "│ - Volume: {} maintenance\n",
            hydration.maintenance
        ));
        if self.unsafe_to_feed {
            output.push_str("│ - Airway unsafe for oral feeding\n");
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ DISCHARGE                           │\n");
        output.push_str(&format!(
            "│ - {}\n",
            self.recommendation.discharge_path.as_str()
        ));
        if let Some(plan) = &self.weaning_plan {
            let criteria = &plan.failure_criteria;
            output.push_str(&format!(
                "│ - Abort wean if HR rises > {} or RR rises > {} or SpO2 < {}\n",
                criteria.heart_rate_rise, criteria.respiratory_rate_rise, criteria.min_saturation
            ));
            output.push_str(&format!(
                "│ - Discharge after >= {} h on air incl. sleep, intake > {}%\n",
                plan.ambient_air_min_hours, plan.min_oral_intake_percent
            ));
        }

        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str("│ ADVISORIES                          │\n");
        for advisory in &self.advisories {
            output.push_str(&format!("│ - {}\n", advisory.message()));
        }

        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

// =============================================================================
// TESTS
// =============================================================================
