//! # Record Vocabulary
//!
//! Owned, typed values for everything the interchange log can contain.
//! Records hold resolved `ExportId`s only; source handles never reach this
//! layer.
//!
//! - `change` — project, session and id allocation events
//! - `feature` — point, line and text features, stubs and id mappings
//! - `observation` — distances, lengths, offsets and directions
//! - `operation` — one record per exportable edit kind

mod change;
mod feature;
mod observation;
mod operation;

pub use change::{ChangeHeader, EndSessionEvent, IdAllocation, NewProjectEvent, NewSessionEvent};
pub use feature::{
    ArcAnchor, FeatureRecord, FeatureStub, IdMapping, KeyValue, LineFeature, LineGeometryRecord,
    PointFeature, TextFeature, TextGeometry, TextKind,
};
pub use observation::{
    DirectionKindRecord, DirectionRecord, DistanceRecord, LengthRecord, OffsetRecord,
};
pub use operation::{
    AttachPointOperation, DeletionOperation, EditRecord, GetControlOperation, ImportOperation,
    IntersectDirectionAndDistanceOperation, IntersectDirectionAndLineOperation,
    IntersectTwoDirectionsOperation, IntersectTwoDistancesOperation, IntersectTwoLinesOperation,
    LineExtensionOperation, LineSubdivisionFace, LineSubdivisionOperation, MoveTextOperation,
    NewCircleOperation, NewLineOperation, NewPointOperation, NewTextOperation,
    ParallelLineOperation, PathOperation, PolygonSubdivisionOperation, RadialOperation,
    SetTopologyOperation, SimpleLineSubdivisionOperation, SplitPair, TextRotationOperation,
    TrimLineOperation,
};

use crate::writer::{Record, RecordWriter};
use crate::{CedexError, ExportId};

/// A top-level entry of the log. Every entry is written under `Edit`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportRecord {
    NewProject(NewProjectEvent),
    NewSession(NewSessionEvent),
    EndSession(EndSessionEvent),
    IdAllocation(IdAllocation),
    Edit(EditRecord),
}

impl ExportRecord {
    /// The entry's own id.
    #[must_use]
    pub fn id(&self) -> ExportId {
        match self {
            Self::NewProject(r) => r.header.id,
            Self::NewSession(r) => r.header.id,
            Self::EndSession(r) => r.header.id,
            Self::IdAllocation(r) => r.header.id,
            Self::Edit(r) => r.id(),
        }
    }
}

impl Record for ExportRecord {
    fn type_name(&self) -> &'static str {
        match self {
            Self::NewProject(r) => r.type_name(),
            Self::NewSession(r) => r.type_name(),
            Self::EndSession(r) => r.type_name(),
            Self::IdAllocation(r) => r.type_name(),
            Self::Edit(r) => r.type_name(),
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        match self {
            Self::NewProject(r) => r.write_fields(w),
            Self::NewSession(r) => r.write_fields(w),
            Self::EndSession(r) => r.write_fields(w),
            Self::IdAllocation(r) => r.write_fields(w),
            Self::Edit(r) => r.write_fields(w),
        }
    }
}

impl From<EditRecord> for ExportRecord {
    fn from(r: EditRecord) -> Self {
        Self::Edit(r)
    }
}
