//! # Source Model
//!
//! Read-only view of the legacy edit history.
//!
//! The export engine never owns or mutates the source model. It reaches it
//! through the `SourceModel` trait: ordered sessions, ordered edits inside
//! each session, and typed accessors for the features, location records,
//! tiles and circles those edits refer to. `MemoryModel` is the arena-backed
//! implementation used by the CLI snapshots and by the tests.

mod edit;
mod feature;
mod memory;
mod observation;

pub use edit::{
    AttachPoint, Deletion, Edit, EditKind, Import, IntersectDirectionAndDistance,
    IntersectDirectionAndLine, IntersectTwoDirections, IntersectTwoDistances, IntersectTwoLines,
    LineExtension, LineSubdivision, MoveText, NewCircle, NewLine, NewPoint, NewText, Parallel,
    Path, PathLeg, PathSpan, PointOnLine, PolygonSubdivision, Radial, SetTopology,
    SubdivisionFace, SubdivisionSection, TextRotation, Trim,
};
pub use feature::{Feature, FeatureKey, FeatureShape, LineGeometry, TextContent, TextShape};
pub use memory::MemoryModel;
pub use observation::{Direction, DirectionKind, Distance, DistanceUnit, Length, Offset};

use crate::primitives::COORDINATE_SCALE;
use crate::{CedexError, CircleId, EditId, FeatureId, LocationId, TileId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// SOURCE MODEL TRAIT
// =============================================================================

/// Accessors the export engine needs from the legacy model.
///
/// Every lookup by handle is fallible: a dangling handle means the source
/// model is inconsistent and is reported as `CedexError::InvalidSource`.
pub trait SourceModel {
    /// File name of the map being exported.
    fn map_name(&self) -> &str;

    /// Sessions in history order.
    fn sessions(&self) -> &[Session];

    /// ID groups with the ranges allocated to this map.
    fn id_groups(&self) -> &[IdGroup];

    /// Look up an edit.
    fn edit(&self, id: EditId) -> Result<&Edit, CedexError>;

    /// Look up a feature.
    fn feature(&self, id: FeatureId) -> Result<&Feature, CedexError>;

    /// Look up a location record.
    fn location(&self, id: LocationId) -> Result<&Location, CedexError>;

    /// Look up a spatial index tile.
    fn tile(&self, id: TileId) -> Result<&Tile, CedexError>;

    /// Newest tile of the chain that `id` belongs to.
    fn tile_tail(&self, id: TileId) -> Result<TileId, CedexError>;

    /// Look up a circle.
    fn circle(&self, id: CircleId) -> Result<&Circle, CedexError>;

    /// Location of a point feature.
    fn point_location(&self, id: FeatureId) -> Result<LocationId, CedexError> {
        self.feature(id)?.point_location().ok_or_else(|| {
            CedexError::InvalidSource(format!("feature #{} is not a point", id.0))
        })
    }

    /// Total number of edits across all sessions.
    fn edit_count(&self) -> usize {
        self.sessions().iter().map(|s| s.edits.len()).sum()
    }
}

// =============================================================================
// POSITIONS & SPATIAL INDEX
// =============================================================================

/// A position in fixed-point micro-units.
///
/// Integer storage makes coincidence an exact comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Easting in micro-units.
    pub x: i64,
    /// Northing in micro-units.
    pub y: i64,
}

impl Position {
    /// Create a position from micro-unit values.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Create a position from whole coordinate units.
    #[must_use]
    pub const fn from_units(x: i64, y: i64) -> Self {
        Self {
            x: x * COORDINATE_SCALE,
            y: y * COORDINATE_SCALE,
        }
    }
}

/// A location record.
///
/// Independent location records may sit at identical positions; lines may
/// terminate at any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub position: Position,
    /// The tile whose chain holds this record.
    pub tile: TileId,
}

/// A spatial index tile.
///
/// A tile holds the location records added to it and links to the tile it
/// overflowed from, forming a chain. Coincidence searches walk the whole
/// chain from its newest tile backwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub locations: Vec<LocationId>,
    pub previous: Option<TileId>,
}

/// A circle. Arcs that lie on it are listed in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub center: FeatureId,
    pub arcs: Vec<FeatureId>,
}

// =============================================================================
// SESSIONS & ID GROUPS
// =============================================================================

/// A bounded batch of edits attributed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub edits: Vec<EditId>,
}

impl Session {
    /// True if the session recorded no edits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// A block of user-visible feature keys reserved for this map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub min: u32,
    pub max: u32,
}

/// A named group of user-visible feature keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGroup {
    pub name: String,
    /// Keys in this group carry a trailing check digit.
    pub check_digit: bool,
    pub ranges: Vec<IdRange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_from_units_scales() {
        let p = Position::from_units(3, -2);
        assert_eq!(p, Position::new(3_000_000, -2_000_000));
    }

    #[test]
    fn point_location_rejects_lines() {
        let mut model = MemoryModel::new("map");
        let tile = model.add_tile(None);
        let a = model.add_location(tile, Position::from_units(0, 0)).expect("loc");
        let b = model.add_location(tile, Position::from_units(1, 0)).expect("loc");
        let edit = model.next_edit_id();
        let line = model
            .add_line(edit, "road", a, b, LineGeometry::Segment)
            .expect("line");

        assert!(matches!(
            model.point_location(line),
            Err(CedexError::InvalidSource(_))
        ));
    }
}
