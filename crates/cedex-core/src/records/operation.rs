//! Operation records, one per exportable edit kind.
//!
//! Each record starts with the change header (`Id`, `When`). Nested feature
//! stubs carry ids allocated by the catalog; plain references are ids of
//! objects written earlier in the log.

use super::change::ChangeHeader;
use super::feature::{FeatureRecord, FeatureStub, IdMapping, LineFeature, PointFeature, TextFeature};
use super::observation::{DirectionRecord, DistanceRecord, LengthRecord};
use crate::source::Position;
use crate::writer::{Field, Record, RecordWriter};
use crate::{CedexError, ExportId};

fn write_id_mappings(w: &mut RecordWriter, ids: &[IdMapping]) -> Result<(), CedexError> {
    if ids.is_empty() {
        return Ok(());
    }
    w.write_array(Field::Ids, ids)
}

// =============================================================================
// IMPORTS & CONTROL
// =============================================================================

/// A batch of features from an external source. Points come first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOperation {
    pub header: ChangeHeader,
    pub source: String,
    pub features: Vec<FeatureRecord>,
}

impl Record for ImportOperation {
    fn type_name(&self) -> &'static str {
        "ImportOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_str(Field::Source, &self.source);
        w.write_array(Field::Features, &self.features)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetControlOperation {
    pub header: ChangeHeader,
    pub points: Vec<FeatureRecord>,
}

impl Record for GetControlOperation {
    fn type_name(&self) -> &'static str {
        "GetControlOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_array(Field::Points, &self.points)
    }
}

// =============================================================================
// LINE SUBDIVISION
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct LineSubdivisionFace {
    pub entry_from_end: bool,
    pub distances: Vec<DistanceRecord>,
}

impl Record for LineSubdivisionFace {
    fn type_name(&self) -> &'static str {
        "LineSubdivisionFace"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_bool(Field::EntryFromEnd, self.entry_from_end);
        w.write_array(Field::Sections, &self.distances)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSubdivisionOperation {
    pub header: ChangeHeader,
    pub line: ExportId,
    pub face: LineSubdivisionFace,
    /// Id of the first face's record, on the second face only.
    pub other_side: Option<ExportId>,
    pub point_type: u32,
    pub ids: Vec<IdMapping>,
}

impl Record for LineSubdivisionOperation {
    fn type_name(&self) -> &'static str {
        "LineSubdivisionOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line, self.line)?;
        w.write_record(Field::Face, &self.face)?;
        w.write_optional_id(Field::OtherSide, self.other_side)?;
        w.write_u32(Field::PointType, self.point_type);
        write_id_mappings(w, &self.ids)
    }
}

/// A point at a distance along a line.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleLineSubdivisionOperation {
    pub header: ChangeHeader,
    pub line: ExportId,
    /// Always non-negative; `entry_from_end` carries the sign.
    pub distance: DistanceRecord,
    pub entry_from_end: bool,
    pub new_point: FeatureStub,
    pub new_line1: ExportId,
    pub new_line2: ExportId,
}

impl Record for SimpleLineSubdivisionOperation {
    fn type_name(&self) -> &'static str {
        "SimpleLineSubdivisionOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line, self.line)?;
        w.write_record(Field::Distance, &self.distance)?;
        w.write_bool(Field::EntryFromEnd, self.entry_from_end);
        w.write_record(Field::NewPoint, &self.new_point)?;
        w.write_id(Field::NewLine1, self.new_line1)?;
        w.write_id(Field::NewLine2, self.new_line2)
    }
}

// =============================================================================
// INTERSECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectTwoDirectionsOperation {
    pub header: ChangeHeader,
    pub direction1: DirectionRecord,
    pub direction2: DirectionRecord,
    pub to: FeatureStub,
    pub line1: Option<FeatureStub>,
    pub line2: Option<FeatureStub>,
}

impl Record for IntersectTwoDirectionsOperation {
    fn type_name(&self) -> &'static str {
        "IntersectTwoDirectionsOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Direction1, &self.direction1)?;
        w.write_record(Field::Direction2, &self.direction2)?;
        w.write_record(Field::To, &self.to)?;
        w.write_optional(Field::Line1, self.line1.as_ref())?;
        w.write_optional(Field::Line2, self.line2.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectTwoDistancesOperation {
    pub header: ChangeHeader,
    pub distance1: LengthRecord,
    pub from1: ExportId,
    pub distance2: LengthRecord,
    pub from2: ExportId,
    pub default: bool,
    pub to: FeatureStub,
    pub line1: Option<FeatureStub>,
    pub line2: Option<FeatureStub>,
}

impl Record for IntersectTwoDistancesOperation {
    fn type_name(&self) -> &'static str {
        "IntersectTwoDistancesOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Distance1, &self.distance1)?;
        w.write_id(Field::From1, self.from1)?;
        w.write_record(Field::Distance2, &self.distance2)?;
        w.write_id(Field::From2, self.from2)?;
        w.write_bool(Field::Default, self.default);
        w.write_record(Field::To, &self.to)?;
        w.write_optional(Field::Line1, self.line1.as_ref())?;
        w.write_optional(Field::Line2, self.line2.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectDirectionAndDistanceOperation {
    pub header: ChangeHeader,
    pub direction: DirectionRecord,
    pub distance: LengthRecord,
    pub from: ExportId,
    pub default: bool,
    pub to: FeatureStub,
    pub dir_line: Option<FeatureStub>,
    pub dist_line: Option<FeatureStub>,
}

impl Record for IntersectDirectionAndDistanceOperation {
    fn type_name(&self) -> &'static str {
        "IntersectDirectionAndDistanceOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Direction, &self.direction)?;
        w.write_record(Field::Distance, &self.distance)?;
        w.write_id(Field::From, self.from)?;
        w.write_bool(Field::Default, self.default);
        w.write_record(Field::To, &self.to)?;
        w.write_optional(Field::DirLine, self.dir_line.as_ref())?;
        w.write_optional(Field::DistLine, self.dist_line.as_ref())
    }
}

/// Split sections produced where an intersection cuts an existing line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitPair {
    pub before: Option<ExportId>,
    pub after: Option<ExportId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectTwoLinesOperation {
    pub header: ChangeHeader,
    pub line1: ExportId,
    pub line2: ExportId,
    pub close_to: ExportId,
    pub to: FeatureStub,
    pub split1: SplitPair,
    pub split2: SplitPair,
}

impl Record for IntersectTwoLinesOperation {
    fn type_name(&self) -> &'static str {
        "IntersectTwoLinesOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line1, self.line1)?;
        w.write_id(Field::Line2, self.line2)?;
        w.write_id(Field::CloseTo, self.close_to)?;
        w.write_record(Field::To, &self.to)?;
        w.write_optional_id(Field::SplitBefore1, self.split1.before)?;
        w.write_optional_id(Field::SplitAfter1, self.split1.after)?;
        w.write_optional_id(Field::SplitBefore2, self.split2.before)?;
        w.write_optional_id(Field::SplitAfter2, self.split2.after)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectDirectionAndLineOperation {
    pub header: ChangeHeader,
    pub direction: DirectionRecord,
    pub line: ExportId,
    pub close_to: ExportId,
    pub to: FeatureStub,
    pub dir_line: Option<FeatureStub>,
    pub split: SplitPair,
}

impl Record for IntersectDirectionAndLineOperation {
    fn type_name(&self) -> &'static str {
        "IntersectDirectionAndLineOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Direction, &self.direction)?;
        w.write_id(Field::Line, self.line)?;
        w.write_id(Field::CloseTo, self.close_to)?;
        w.write_record(Field::To, &self.to)?;
        w.write_optional(Field::DirLine, self.dir_line.as_ref())?;
        w.write_optional_id(Field::SplitBefore, self.split.before)?;
        w.write_optional_id(Field::SplitAfter, self.split.after)
    }
}

// =============================================================================
// SIMPLE CREATION
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct NewPointOperation {
    pub header: ChangeHeader,
    pub point: PointFeature,
}

impl Record for NewPointOperation {
    fn type_name(&self) -> &'static str {
        "NewPointOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Point, &self.point)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLineOperation {
    pub header: ChangeHeader,
    pub line: LineFeature,
}

impl Record for NewLineOperation {
    fn type_name(&self) -> &'static str {
        "NewLineOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Line, &self.line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTextOperation {
    pub header: ChangeHeader,
    pub text: TextFeature,
}

impl Record for NewTextOperation {
    fn type_name(&self) -> &'static str {
        "NewTextOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Text, &self.text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCircleOperation {
    pub header: ChangeHeader,
    pub center: ExportId,
    pub radius: LengthRecord,
    pub closing_point: Option<FeatureStub>,
    pub arc: FeatureStub,
}

impl Record for NewCircleOperation {
    fn type_name(&self) -> &'static str {
        "NewCircleOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Center, self.center)?;
        w.write_record(Field::Radius, &self.radius)?;
        w.write_optional(Field::ClosingPoint, self.closing_point.as_ref())?;
        w.write_record(Field::Arc, &self.arc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathOperation {
    pub header: ChangeHeader,
    pub from: ExportId,
    pub to: ExportId,
    pub entry_string: String,
    pub default_entry_unit: u32,
    pub point_type: u32,
    pub line_type: u32,
    pub ids: Vec<IdMapping>,
}

impl Record for PathOperation {
    fn type_name(&self) -> &'static str {
        "PathOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::From, self.from)?;
        w.write_id(Field::To, self.to)?;
        w.write_str(Field::EntryString, &self.entry_string);
        w.write_u32(Field::DefaultEntryUnit, self.default_entry_unit);
        w.write_u32(Field::PointType, self.point_type);
        w.write_u32(Field::LineType, self.line_type);
        write_id_mappings(w, &self.ids)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialOperation {
    pub header: ChangeHeader,
    pub direction: DirectionRecord,
    pub length: LengthRecord,
    pub to: FeatureStub,
    pub line: Option<FeatureStub>,
}

impl Record for RadialOperation {
    fn type_name(&self) -> &'static str {
        "RadialOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_record(Field::Direction, &self.direction)?;
        w.write_record(Field::Length, &self.length)?;
        w.write_record(Field::To, &self.to)?;
        w.write_optional(Field::Line, self.line.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineExtensionOperation {
    pub header: ChangeHeader,
    pub line: ExportId,
    pub extend_from_end: bool,
    pub length: DistanceRecord,
    pub new_point: FeatureStub,
    pub new_line: Option<FeatureStub>,
}

impl Record for LineExtensionOperation {
    fn type_name(&self) -> &'static str {
        "LineExtensionOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line, self.line)?;
        w.write_bool(Field::ExtendFromEnd, self.extend_from_end);
        w.write_record(Field::Distance, &self.length)?;
        w.write_record(Field::NewPoint, &self.new_point)?;
        w.write_optional(Field::NewLine, self.new_line.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallelLineOperation {
    pub header: ChangeHeader,
    pub ref_line: ExportId,
    pub term1: Option<ExportId>,
    pub term2: Option<ExportId>,
    pub reverse_arc: bool,
    pub offset: LengthRecord,
    pub start_point: Option<FeatureStub>,
    pub end_point: Option<FeatureStub>,
    pub new_line: FeatureStub,
}

impl Record for ParallelLineOperation {
    fn type_name(&self) -> &'static str {
        "ParallelLineOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::RefLine, self.ref_line)?;
        w.write_optional_id(Field::Term1, self.term1)?;
        w.write_optional_id(Field::Term2, self.term2)?;
        if self.reverse_arc {
            w.write_bool(Field::ReverseArc, true);
        }
        w.write_record(Field::Offset, &self.offset)?;
        w.write_optional(Field::From, self.start_point.as_ref())?;
        w.write_optional(Field::To, self.end_point.as_ref())?;
        w.write_record(Field::NewLine, &self.new_line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachPointOperation {
    pub header: ChangeHeader,
    pub line: ExportId,
    pub position_ratio: u32,
    pub point: FeatureStub,
}

impl Record for AttachPointOperation {
    fn type_name(&self) -> &'static str {
        "AttachPointOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line, self.line)?;
        w.write_u32(Field::PositionRatio, self.position_ratio);
        w.write_record(Field::Point, &self.point)
    }
}

// =============================================================================
// UPDATES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTextOperation {
    pub header: ChangeHeader,
    pub text: ExportId,
    pub old_position: Position,
    pub new_position: Position,
}

impl Record for MoveTextOperation {
    fn type_name(&self) -> &'static str {
        "MoveTextOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Text, self.text)?;
        w.write_position(Field::OldX, Field::OldY, self.old_position);
        w.write_position(Field::NewX, Field::NewY, self.new_position);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRotationOperation {
    pub header: ChangeHeader,
    pub rotation: f64,
}

impl Record for TextRotationOperation {
    fn type_name(&self) -> &'static str {
        "TextRotationOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_radians(Field::Value, self.rotation);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOperation {
    pub header: ChangeHeader,
    pub deleted: Vec<ExportId>,
}

impl Record for DeletionOperation {
    fn type_name(&self) -> &'static str {
        "DeletionOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id_list(Field::Delete, &self.deleted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSubdivisionOperation {
    pub header: ChangeHeader,
    pub deactivated_label: Option<ExportId>,
    pub lines: Vec<FeatureRecord>,
}

impl Record for PolygonSubdivisionOperation {
    fn type_name(&self) -> &'static str {
        "PolygonSubdivisionOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_optional_id(Field::DeactivatedLabel, self.deactivated_label)?;
        w.write_array(Field::Lines, &self.lines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTopologyOperation {
    pub header: ChangeHeader,
    pub line: ExportId,
}

impl Record for SetTopologyOperation {
    fn type_name(&self) -> &'static str {
        "SetTopologyOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id(Field::Line, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimLineOperation {
    pub header: ChangeHeader,
    pub lines: Vec<ExportId>,
    pub points: Vec<ExportId>,
}

impl Record for TrimLineOperation {
    fn type_name(&self) -> &'static str {
        "TrimLineOperation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_id_list(Field::Lines, &self.lines)?;
        w.write_id_list(Field::Points, &self.points)
    }
}

// =============================================================================
// EDIT RECORD
// =============================================================================

macro_rules! edit_records {
    ($($variant:ident($ty:ident)),* $(,)?) => {
        /// One exported operation.
        #[derive(Debug, Clone, PartialEq)]
        pub enum EditRecord {
            $($variant($ty)),*
        }

        impl EditRecord {
            /// The record's own id.
            #[must_use]
            pub fn id(&self) -> ExportId {
                match self {
                    $(Self::$variant(r) => r.header.id),*
                }
            }
        }

        impl Record for EditRecord {
            fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(r) => r.type_name()),*
                }
            }

            fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
                match self {
                    $(Self::$variant(r) => r.write_fields(w)),*
                }
            }
        }

        $(
            impl From<$ty> for EditRecord {
                fn from(r: $ty) -> Self {
                    Self::$variant(r)
                }
            }
        )*
    };
}

edit_records! {
    Import(ImportOperation),
    GetControl(GetControlOperation),
    LineSubdivision(LineSubdivisionOperation),
    SimpleLineSubdivision(SimpleLineSubdivisionOperation),
    IntersectTwoDirections(IntersectTwoDirectionsOperation),
    IntersectTwoDistances(IntersectTwoDistancesOperation),
    IntersectDirectionAndDistance(IntersectDirectionAndDistanceOperation),
    IntersectTwoLines(IntersectTwoLinesOperation),
    IntersectDirectionAndLine(IntersectDirectionAndLineOperation),
    NewPoint(NewPointOperation),
    NewLine(NewLineOperation),
    NewText(NewTextOperation),
    NewCircle(NewCircleOperation),
    Path(PathOperation),
    Radial(RadialOperation),
    LineExtension(LineExtensionOperation),
    ParallelLine(ParallelLineOperation),
    AttachPoint(AttachPointOperation),
    MoveText(MoveTextOperation),
    TextRotation(TextRotationOperation),
    Deletion(DeletionOperation),
    PolygonSubdivision(PolygonSubdivisionOperation),
    SetTopology(SetTopologyOperation),
    TrimLine(TrimLineOperation),
}
