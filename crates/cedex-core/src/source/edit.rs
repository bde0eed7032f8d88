//! Edits (operations) of the source history.

use super::{Direction, Distance, Length, Position};
use crate::FeatureId;
use serde::{Deserialize, Serialize};

/// One recorded editing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    /// 1-based sequence number within the map.
    pub sequence: u32,
    pub kind: EditKind,
    /// Features the edit created, in creation order.
    pub features: Vec<FeatureId>,
}

/// Import of features from an external file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub source: String,
}

/// One section of a subdivided line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionSection {
    pub line: FeatureId,
    /// Point at the end of the section. The last section ends on the
    /// parent line's end point.
    pub end_point: FeatureId,
}

/// One face of a line subdivision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionFace {
    pub distances: Vec<Distance>,
    pub sections: Vec<SubdivisionSection>,
}

/// Subdivision of a line into sections. A second face describes the other
/// side of the same line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSubdivision {
    pub line: FeatureId,
    pub faces: Vec<SubdivisionFace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectTwoDirections {
    pub direction1: Direction,
    pub direction2: Direction,
    pub intersection: FeatureId,
    pub line1: Option<FeatureId>,
    pub line2: Option<FeatureId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectTwoDistances {
    pub distance1: Length,
    pub from1: FeatureId,
    pub distance2: Length,
    pub from2: FeatureId,
    /// The default of the two possible intersections was taken.
    pub default: bool,
    pub intersection: FeatureId,
    pub line1: Option<FeatureId>,
    pub line2: Option<FeatureId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectDirectionAndDistance {
    pub direction: Direction,
    pub distance: Length,
    pub from: FeatureId,
    pub default: bool,
    pub intersection: FeatureId,
    pub direction_line: Option<FeatureId>,
    pub distance_line: Option<FeatureId>,
}

/// Intersection of two existing lines. Each line may be split at the
/// intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectTwoLines {
    pub line1: FeatureId,
    pub line2: FeatureId,
    pub close_to: FeatureId,
    pub intersection: FeatureId,
    pub line1_before: Option<FeatureId>,
    pub line1_after: Option<FeatureId>,
    pub line2_before: Option<FeatureId>,
    pub line2_after: Option<FeatureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPoint {
    pub point: FeatureId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewText {
    pub text: FeatureId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveText {
    pub text: FeatureId,
    pub old_position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub deleted: Vec<FeatureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub line: FeatureId,
}

/// One span of a connection path leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpan {
    /// The line created for the span, if it was not a miss-connect.
    pub line: Option<FeatureId>,
    /// The point created at the end of the span.
    pub end_point: Option<FeatureId>,
}

/// One leg of a connection path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLeg {
    /// Center point of a circular leg.
    pub center: Option<FeatureId>,
    pub spans: Vec<PathSpan>,
}

/// A connection path traversed from one point to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub from: FeatureId,
    pub to: FeatureId,
    /// The path as the surveyor typed it.
    pub entry: String,
    pub legs: Vec<PathLeg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonSubdivision {
    /// Label deactivated by the subdivision.
    pub label: Option<FeatureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextRotation {
    /// Radians.
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCircle {
    pub center: FeatureId,
    pub radius: Length,
    /// The full-circle arc created with the circle.
    pub arc: FeatureId,
    /// Point closing the arc. Present when the radius is a distance.
    pub closing_point: Option<FeatureId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectDirectionAndLine {
    pub direction: Direction,
    pub line: FeatureId,
    pub close_to: FeatureId,
    pub intersection: FeatureId,
    pub direction_line: Option<FeatureId>,
    pub split_before: Option<FeatureId>,
    pub split_after: Option<FeatureId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineExtension {
    pub line: FeatureId,
    /// The extension leaves from the end of the line.
    pub from_end: bool,
    pub length: Distance,
    pub new_point: FeatureId,
    pub new_line: Option<FeatureId>,
}

/// A sideshot from a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Radial {
    pub direction: Direction,
    pub length: Length,
    pub point: FeatureId,
    pub line: Option<FeatureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTopology {
    pub line: FeatureId,
}

/// A point at a distance along a line, splitting it in two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOnLine {
    pub line: FeatureId,
    /// Negative values are measured from the end of the line.
    pub distance: Distance,
    pub new_point: FeatureId,
    pub new_line1: FeatureId,
    pub new_line2: FeatureId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parallel {
    pub reference: FeatureId,
    pub offset: Length,
    pub term1: Option<FeatureId>,
    pub term2: Option<FeatureId>,
    /// An arc reference was traversed in the opposite direction.
    pub reversed: bool,
    pub start_point: Option<FeatureId>,
    pub end_point: Option<FeatureId>,
    pub parallel: FeatureId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trim {
    pub lines: Vec<FeatureId>,
    pub points: Vec<FeatureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachPoint {
    pub line: FeatureId,
    /// Position along the line in millionths of its length.
    pub position_ratio: u32,
    pub point: FeatureId,
}

/// The closed set of legacy edit kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Import(Import),
    GetBackground(Import),
    LineSubdivision(LineSubdivision),
    IntersectTwoDirections(IntersectTwoDirections),
    IntersectTwoDistances(IntersectTwoDistances),
    IntersectDirectionAndDistance(IntersectDirectionAndDistance),
    IntersectTwoLines(IntersectTwoLines),
    NewPoint(NewPoint),
    NewText(NewText),
    MoveText(MoveText),
    Deletion(Deletion),
    NewLine(NewLine),
    Path(Path),
    PolygonSubdivision(PolygonSubdivision),
    SetTextRotation(TextRotation),
    GetControl,
    NewCircle(NewCircle),
    IntersectDirectionAndLine(IntersectDirectionAndLine),
    LineExtension(LineExtension),
    Radial(Radial),
    SetTheme,
    SetTopology(SetTopology),
    PointOnLine(PointOnLine),
    Parallel(Parallel),
    Trim(Trim),
    AttachPoint(AttachPoint),
}

impl EditKind {
    /// Human-readable name of the kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
            Self::GetBackground(_) => "get background",
            Self::LineSubdivision(_) => "line subdivision",
            Self::IntersectTwoDirections(_) => "intersect two directions",
            Self::IntersectTwoDistances(_) => "intersect two distances",
            Self::IntersectDirectionAndDistance(_) => "intersect direction and distance",
            Self::IntersectTwoLines(_) => "intersect two lines",
            Self::NewPoint(_) => "new point",
            Self::NewText(_) => "new text",
            Self::MoveText(_) => "move text",
            Self::Deletion(_) => "deletion",
            Self::NewLine(_) => "new line",
            Self::Path(_) => "connection path",
            Self::PolygonSubdivision(_) => "polygon subdivision",
            Self::SetTextRotation(_) => "set text rotation",
            Self::GetControl => "get control",
            Self::NewCircle(_) => "new circle",
            Self::IntersectDirectionAndLine(_) => "intersect direction and line",
            Self::LineExtension(_) => "line extension",
            Self::Radial(_) => "radial",
            Self::SetTheme => "set theme",
            Self::SetTopology(_) => "set topology",
            Self::PointOnLine(_) => "point on line",
            Self::Parallel(_) => "parallel",
            Self::Trim(_) => "trim",
            Self::AttachPoint(_) => "attach point",
        }
    }
}
