//! # Advisory Module
//!
//! Care setting and clinical advisories that accompany every assessment.

use crate::management::HydrationRoute;
use crate::observation::{EffortLevel, ObservationSnapshot};
use crate::policy::PolicyConfig;
use crate::severity::{in_moderate_saturation_band, SeverityTier};
use crate::threshold::Threshold;
use serde::{Deserialize, Serialize};

/// Where the infant should be managed, from the overall tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CareSetting {
    /// Discharge and home care.
    HomeCare,
    /// Hospital observation.
    WardObservation,
    /// Urgent high-dependency admission.
    HighDependency,
}

impl CareSetting {
    #[must_use]
    pub fn for_tier(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Mild => CareSetting::HomeCare,
            SeverityTier::Moderate => CareSetting::WardObservation,
            SeverityTier::Severe => CareSetting::HighDependency,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CareSetting::HomeCare => "discharge and home care",
            CareSetting::WardObservation => "hospital observation",
            CareSetting::HighDependency => "urgent HDU admission",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Advisory {
    /// Salbutamol, steroids, antibiotics, chest X-ray and viral swabs are not
    /// routinely indicated.
    AvoidRoutineInterventions,
    /// SpO2 in the Moderate band without severe effort. Do not escalate on
    /// the number alone.
    ModerateSaturationBand,
    SeniorReview,
    /// Nasogastric route preferred over intravenous.
    NasogastricPreferred,
    /// Avoid continuous monitoring when stable and off oxygen.
    AvoidContinuousMonitoring,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::AvoidRoutineInterventions => {
                "Do not routinely use salbutamol, steroids, antibiotics, chest X-rays or viral swabs."
            }
            Advisory::ModerateSaturationBand => {
                "SpO2 is in the moderate band. Do not escalate to severe treatment unless work of breathing worsens."
            }
            Advisory::SeniorReview => "Immediate senior clinician review required.",
            Advisory::NasogastricPreferred => "NGT is the preferred route for hydration over IV.",
            Advisory::AvoidContinuousMonitoring => {
                "Avoid continuous monitoring if stable and not on oxygen."
            }
        }
    }
}

/// Inputs for [`advisories`].
#[derive(Debug, Clone, Copy)]
pub struct AdvisoryContext<'a> {
    pub obs: &'a ObservationSnapshot,
    pub threshold: Threshold,
    pub overall: SeverityTier,
    pub on_oxygen: bool,
    pub hydration_route: HydrationRoute,
    pub policy: &'a PolicyConfig,
}

/// Advisories in a fixed order.
#[must_use]
pub fn advisories(ctx: &AdvisoryContext<'_>) -> Vec<Advisory> {
    let mut out = vec![Advisory::AvoidRoutineInterventions];

    if in_moderate_saturation_band(ctx.obs.oxygen_saturation(), ctx.threshold, ctx.policy)
        && ctx.obs.effort() != EffortLevel::SevereGrunting
    {
        out.push(Advisory::ModerateSaturationBand);
    }
    if ctx.overall == SeverityTier::Severe {
        out.push(Advisory::SeniorReview);
    }
    if ctx.hydration_route != HydrationRoute::Oral {
        out.push(Advisory::NasogastricPreferred);
    }
    if ctx.overall == SeverityTier::Moderate && !ctx.on_oxygen {
        out.push(Advisory::AvoidContinuousMonitoring);
    }
    out
}
