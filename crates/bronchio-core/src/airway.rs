//! # Airway Module
//!
//! Aspiration-risk guard. Decides whether oral feeding is unsafe from
//! behaviour, apnoea and work of breathing only. Feeding volume is not an
//! input: a lethargic infant taking full feeds is still unsafe to feed.

use crate::observation::{ApnoeaLevel, BehaviorState, EffortLevel, ObservationSnapshot};
use serde::{Deserialize, Serialize};

/// Why oral feeding was judged unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AirwayHazard {
    AlteredConsciousness,
    ObservedApnoea,
    SevereRespiratoryDistress,
}

/// Every hazard present in the snapshot, in a fixed order.
#[must_use]
pub fn airway_hazards(obs: &ObservationSnapshot) -> Vec<AirwayHazard> {
    let mut hazards = Vec::new();
    if obs.behavior() == BehaviorState::LethargicAms {
        hazards.push(AirwayHazard::AlteredConsciousness);
    }
    if obs.apnoea() == ApnoeaLevel::ObservedClinically {
        hazards.push(AirwayHazard::ObservedApnoea);
    }
    if obs.effort() == EffortLevel::SevereGrunting {
        hazards.push(AirwayHazard::SevereRespiratoryDistress);
    }
    hazards
}

/// True when any airway hazard is present.
#[must_use]
pub fn is_unsafe_to_feed(obs: &ObservationSnapshot) -> bool {
    !airway_hazards(obs).is_empty()
}
