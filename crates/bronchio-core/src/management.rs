//! # Management Module
//!
//! The two independent management pillars: respiratory support and
//! hydration/nutrition. Each is a first-match precedence list over the
//! severity tiers, the airway guard and the threshold.
//!
//! The airway guard can force nil-by-mouth even when feeding volume is
//! adequate. Poor volume with a safe airway gets active hydration instead.

use crate::observation::ObservationSnapshot;
use crate::policy::{ClinicalConstants, MaintenanceFraction};
use crate::severity::SeverityTier;
use crate::threshold::Threshold;
use serde::{Deserialize, Serialize};

// =============================================================================
// RESPIRATORY SUPPORT
// =============================================================================

/// Respiratory support level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RespiratorySupport {
    /// No supplemental oxygen.
    Monitoring,
    LowFlowOxygen,
    /// High flow, escalating to CPAP if it fails.
    HighFlowEscalation,
}

impl RespiratorySupport {
    pub fn as_str(&self) -> &'static str {
        match self {
            RespiratorySupport::Monitoring => "monitoring, no supplemental oxygen",
            RespiratorySupport::LowFlowOxygen => "low-flow oxygen",
            RespiratorySupport::HighFlowEscalation => "high-flow oxygen, escalate to CPAP",
        }
    }
}

/// First match wins:
/// 1. respiratory Severe → high flow
/// 2. respiratory Moderate, or SpO2 below threshold → low flow
/// 3. otherwise monitoring
#[must_use]
pub fn decide_respiratory_support(
    respiratory: SeverityTier,
    threshold: Threshold,
    obs: &ObservationSnapshot,
) -> RespiratorySupport {
    if respiratory == SeverityTier::Severe {
        RespiratorySupport::HighFlowEscalation
    } else if respiratory == SeverityTier::Moderate || obs.oxygen_saturation() < threshold.value() {
        RespiratorySupport::LowFlowOxygen
    } else {
        RespiratorySupport::Monitoring
    }
}

/// Respiratory support with the doses that apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespiratorySupportPlan {
    pub support: RespiratorySupport,
    /// Titrate oxygen to keep SpO2 at or above this.
    pub target_saturation: Threshold,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_flow_max_l_per_min: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_flow_l_per_kg_per_min: Option<u8>,
    /// CPAP pressure if high flow fails or apnoea persists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_cpap_cm_h2o: Option<u8>,
}

#[must_use]
pub fn plan_respiratory_support(
    support: RespiratorySupport,
    threshold: Threshold,
    constants: &ClinicalConstants,
) -> RespiratorySupportPlan {
    let mut plan = RespiratorySupportPlan {
        support,
        target_saturation: threshold,
        low_flow_max_l_per_min: None,
        high_flow_l_per_kg_per_min: None,
        escalation_cpap_cm_h2o: None,
    };
    match support {
        RespiratorySupport::Monitoring => {}
        RespiratorySupport::LowFlowOxygen => {
            plan.low_flow_max_l_per_min = Some(constants.low_flow_max_l_per_min);
        }
        RespiratorySupport::HighFlowEscalation => {
            plan.high_flow_l_per_kg_per_min = Some(constants.high_flow_l_per_kg_per_min);
            plan.escalation_cpap_cm_h2o = Some(constants.cpap_cm_h2o);
        }
    }
    plan
}

// =============================================================================
// HYDRATION
// =============================================================================

/// Hydration and nutrition plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HydrationPlan {
    OralFeeding,
    NgtSupplementation,
    RestrictedIvOrNgt,
    NilByMouth,
}

impl HydrationPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            HydrationPlan::OralFeeding => "oral feeding, small frequent feeds",
            HydrationPlan::NgtSupplementation => "nasogastric supplementation",
            HydrationPlan::RestrictedIvOrNgt => "restricted NGT or IV fluids",
            HydrationPlan::NilByMouth => "nil by mouth, tube hydration",
        }
    }
}

/// Delivery route for fluids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HydrationRoute {
    Oral,
    Nasogastric,
    /// Nasogastric preferred, intravenous if NGT is not tolerated.
    NasogastricOrIntravenous,
}

/// First match wins:
/// 1. unsafe airway → nil by mouth
/// 2. feeding Severe → restricted NGT/IV
/// 3. feeding Moderate → NGT supplementation
/// 4. otherwise oral feeding
#[must_use]
pub fn decide_hydration(feeding: SeverityTier, unsafe_to_feed: bool) -> HydrationPlan {
    if unsafe_to_feed {
        HydrationPlan::NilByMouth
    } else {
        match feeding {
            SeverityTier::Severe => HydrationPlan::RestrictedIvOrNgt,
            SeverityTier::Moderate => HydrationPlan::NgtSupplementation,
            SeverityTier::Mild => HydrationPlan::OralFeeding,
        }
    }
}

/// Hydration plan with route and volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationPlanDetail {
    pub plan: HydrationPlan,
    pub route: HydrationRoute,
    /// Fraction of calculated maintenance volume. Non-oral plans for sick
    /// infants are restricted to limit fluid overload and SIADH.
    pub maintenance: MaintenanceFraction,
}

#[must_use]
pub fn plan_hydration(plan: HydrationPlan, constants: &ClinicalConstants) -> HydrationPlanDetail {
    let (route, maintenance) = match plan {
        HydrationPlan::NilByMouth | HydrationPlan::RestrictedIvOrNgt => (
            HydrationRoute::NasogastricOrIntravenous,
            constants.restricted_maintenance,
        ),
        HydrationPlan::NgtSupplementation => (HydrationRoute::Nasogastric, MaintenanceFraction::FULL),
        HydrationPlan::OralFeeding => (HydrationRoute::Oral, MaintenanceFraction::FULL),
    };
    HydrationPlanDetail {
        plan,
        route,
        maintenance,
    }
}

// =============================================================================
// PLANNER
// =============================================================================

/// Both pillars together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementPlan {
    pub respiratory: RespiratorySupportPlan,
    pub hydration: HydrationPlanDetail,
}

/// Derive both management pillars.
#[must_use]
pub fn plan(
    respiratory: SeverityTier,
    feeding: SeverityTier,
    unsafe_to_feed: bool,
    threshold: Threshold,
    obs: &ObservationSnapshot,
    constants: &ClinicalConstants,
) -> ManagementPlan {
    let support = decide_respiratory_support(respiratory, threshold, obs);
    let hydration = decide_hydration(feeding, unsafe_to_feed);
    ManagementPlan {
        respiratory: plan_respiratory_support(support, threshold, constants),
        hydration: plan_hydration(hydration, constants),
    }
}

// =============================================================================
// TESTS
// =============================================================================
