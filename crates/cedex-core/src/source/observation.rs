//! Survey observations attached to construction edits.

use crate::FeatureId;
use serde::{Deserialize, Serialize};

/// Unit a distance was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Whatever unit was current when the value was typed.
    #[default]
    AsEntered,
    Metres,
    Feet,
    Chains,
}

impl DistanceUnit {
    /// Numeric code written to the `Unit` field.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::AsEntered => 0,
            Self::Metres => 1,
            Self::Feet => 2,
            Self::Chains => 3,
        }
    }
}

/// An observed distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    /// Value in the entry unit. May be negative where the edit allows it.
    pub value: f64,
    pub unit: DistanceUnit,
    /// The surveyor marked the distance as fixed.
    pub fixed: bool,
}

impl Distance {
    /// An unfixed distance in metres.
    #[must_use]
    pub const fn metres(value: f64) -> Self {
        Self {
            value,
            unit: DistanceUnit::Metres,
            fixed: false,
        }
    }
}

/// A length: either a typed distance or the distance to an existing point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Distance(Distance),
    OffsetPoint { point: FeatureId },
}

/// Offset applied to a direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offset {
    /// A perpendicular distance. `right` is true for offsets to the right
    /// of the direction.
    Distance { distance: Distance, right: bool },
    /// The direction passes through a point.
    Point { point: FeatureId },
}

/// The kind of a direction observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKind {
    /// Clockwise angle from a backsight.
    Angle {
        backsight: FeatureId,
        from: FeatureId,
        /// Radians.
        value: f64,
    },
    /// Deflection from the extension of the backsight line.
    Deflection {
        backsight: FeatureId,
        from: FeatureId,
        value: f64,
    },
    /// Bearing from grid north.
    Bearing { from: FeatureId, value: f64 },
    /// Parallel to the line between two points.
    Parallel {
        from: FeatureId,
        start: FeatureId,
        end: FeatureId,
    },
}

/// A direction observation with an optional offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub kind: DirectionKind,
    pub offset: Option<Offset>,
}

impl Direction {
    /// A bearing from `from` with no offset.
    #[must_use]
    pub const fn bearing(from: FeatureId, value: f64) -> Self {
        Self {
            kind: DirectionKind::Bearing { from, value },
            offset: None,
        }
    }
}
