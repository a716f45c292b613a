//! # Observation Module
//!
//! The clinical observation snapshot consumed by every downstream component.
//!
//! Each categorical field is totally ordered from least to most concerning,
//! so comparisons such as `effort >= EffortLevel::Moderate` read naturally.
//! Numeric vital signs are range-checked once at construction; after that the
//! snapshot is an immutable value and the engine treats it as valid.

use crate::error::{BronchioError, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

// =============================================================================
// DECLARED RANGES
// =============================================================================

/// Accepted respiratory rate, breaths per minute.
pub const RESPIRATORY_RATE_RANGE: RangeInclusive<u16> = 10..=150;

/// Accepted oxygen saturation, percent.
pub const OXYGEN_SATURATION_RANGE: RangeInclusive<u8> = 70..=100;

// =============================================================================
// CATEGORICAL OBSERVATIONS
// =============================================================================

/// Work of breathing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffortLevel {
    Normal,
    /// Mild recession.
    Mild,
    /// Moderate recession.
    Moderate,
    /// Severe recession or grunting.
    SevereGrunting,
}

impl EffortLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Normal => "normal",
            EffortLevel::Mild => "mild recession",
            EffortLevel::Moderate => "moderate recession",
            EffortLevel::SevereGrunting => "severe recession / grunting",
        }
    }
}

/// Behavioural state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BehaviorState {
    NormalAlert,
    /// Irritable, difficult to soothe.
    Irritable,
    /// Lethargic or altered mental state.
    LethargicAms,
}

impl BehaviorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::NormalAlert => "normal / alert",
            BehaviorState::Irritable => "irritable",
            BehaviorState::LethargicAms => "lethargic / altered mental state",
        }
    }
}

/// Feeding intake relative to normal volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedingLevel {
    Adequate,
    /// 50-75% of normal intake.
    Partial,
    /// Below 50% of normal intake, or dehydration.
    Poor,
}

impl FeedingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedingLevel::Adequate => "adequate",
            FeedingLevel::Partial => "50-75% of normal",
            FeedingLevel::Poor => "< 50% of normal",
        }
    }
}

/// Apnoea history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApnoeaLevel {
    None,
    ReportedByParents,
    ObservedClinically,
}

impl ApnoeaLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApnoeaLevel::None => "none",
            ApnoeaLevel::ReportedByParents => "reported by parents",
            ApnoeaLevel::ObservedClinically => "observed clinically",
        }
    }
}

// =============================================================================
// RAW INPUT
// =============================================================================

/// Observation fields as they arrive from a form, file or request body.
///
/// Numeric fields are wide signed integers so that out-of-range values can
/// be reported as-is instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationInput {
    pub effort: EffortLevel,
    pub behavior: BehaviorState,
    pub feeding: FeedingLevel,
    pub apnoea: ApnoeaLevel,
    pub respiratory_rate: i64,
    pub oxygen_saturation: i64,
}

// =============================================================================
// OBSERVATION SNAPSHOT
// =============================================================================

/// One validated set of observations. Immutable after construction.
///
/// Serialize-only: the way in is [`ObservationSnapshot::try_from_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObservationSnapshot {
    effort: EffortLevel,
    behavior: BehaviorState,
    feeding: FeedingLevel,
    apnoea: ApnoeaLevel,
    respiratory_rate: u16,
    oxygen_saturation: u8,
}

impl ObservationSnapshot {
    /// Build a snapshot, rejecting vital signs outside their declared ranges.
    pub fn new(
        effort: EffortLevel,
        behavior: BehaviorState,
        feeding: FeedingLevel,
        apnoea: ApnoeaLevel,
        respiratory_rate: u16,
        oxygen_saturation: u8,
    ) -> Result<Self> {
        check_range(
            "respiratory_rate",
            i64::from(respiratory_rate),
            &RESPIRATORY_RATE_RANGE,
        )?;
        check_range(
            "oxygen_saturation",
            i64::from(oxygen_saturation),
            &OXYGEN_SATURATION_RANGE,
        )?;
        Ok(Self {
            effort,
            behavior,
            feeding,
            apnoea,
            respiratory_rate,
            oxygen_saturation,
        })
    }

    /// Validate a raw input record.
    pub fn try_from_input(input: &ObservationInput) -> Result<Self> {
        let respiratory_rate = check_range(
            "respiratory_rate",
            input.respiratory_rate,
            &RESPIRATORY_RATE_RANGE,
        )?;
        let oxygen_saturation = check_range(
            "oxygen_saturation",
            input.oxygen_saturation,
            &OXYGEN_SATURATION_RANGE,
        )?;
        Self::new(
            input.effort,
            input.behavior,
            input.feeding,
            input.apnoea,
            respiratory_rate,
            oxygen_saturation,
        )
    }

    #[must_use]
    pub fn effort(&self) -> EffortLevel {
        self.effort
    }

    #[must_use]
    pub fn behavior(&self) -> BehaviorState {
        self.behavior
    }

    #[must_use]
    pub fn feeding(&self) -> FeedingLevel {
        self.feeding
    }

    #[must_use]
    pub fn apnoea(&self) -> ApnoeaLevel {
        self.apnoea
    }

    /// Breaths per minute.
    #[must_use]
    pub fn respiratory_rate(&self) -> u16 {
        self.respiratory_rate
    }

    /// SpO2, percent.
    #[must_use]
    pub fn oxygen_saturation(&self) -> u8 {
        self.oxygen_saturation
    }
}

impl TryFrom<&ObservationInput> for ObservationSnapshot {
    type Error = BronchioError;

    fn try_from(input: &ObservationInput) -> Result<Self> {
        Self::try_from_input(input)
    }
}

impl From<&ObservationSnapshot> for ObservationInput {
    fn from(snapshot: &ObservationSnapshot) -> Self {
        Self {
            effort: snapshot.effort,
            behavior: snapshot.behavior,
            feeding: snapshot.feeding,
            apnoea: snapshot.apnoea,
            respiratory_rate: i64::from(snapshot.respiratory_rate),
            oxygen_saturation: i64::from(snapshot.oxygen_saturation),
        }
    }
}

/// Check `value` against `range` and narrow it to the range's integer type.
pub(crate) fn check_range<T>(field: &'static str, value: i64, range: &RangeInclusive<T>) -> Result<T>
where
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let min: i64 = (*range.start()).into();
    let max: i64 = (*range.end()).into();
    let out_of_range = BronchioError::InvalidObservation {
        field,
        value,
        min,
        max,
    };
    if value < min || value > max {
        return Err(out_of_range);
    }
    T::try_from(value).map_err(|_| out_of_range)
}

// =============================================================================
// TESTS
// =============================================================================
