//! Conversion of survey observations.

use super::Catalog;
use crate::CedexError;
use crate::records::{
    DirectionKindRecord, DirectionRecord, DistanceRecord, LengthRecord, OffsetRecord,
};
use crate::source::{Direction, DirectionKind, Distance, Length, Offset, SourceModel};

pub(super) fn distance(d: &Distance) -> DistanceRecord {
    DistanceRecord {
        value: d.value,
        unit: d.unit.code(),
        fixed: d.fixed,
    }
}

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    pub(super) fn length(&self, length: &Length) -> Result<LengthRecord, CedexError> {
        Ok(match length {
            Length::Distance(d) => LengthRecord::Distance(distance(d)),
            Length::OffsetPoint { point } => LengthRecord::OffsetPoint {
                point: self.reference(*point)?,
            },
        })
    }

    pub(super) fn direction(&self, direction: &Direction) -> Result<DirectionRecord, CedexError> {
        let offset = match &direction.offset {
            None => None,
            Some(Offset::Distance { distance: d, right }) => Some(OffsetRecord::Distance {
                distance: distance(d),
                left: !right,
            }),
            Some(Offset::Point { point }) => Some(OffsetRecord::Point {
                point: self.reference(*point)?,
            }),
        };

        let kind = match direction.kind {
            DirectionKind::Angle {
                backsight,
                from,
                value,
            } => DirectionKindRecord::Angle {
                backsight: self.reference(backsight)?,
                from: self.reference(from)?,
                value,
            },
            DirectionKind::Deflection {
                backsight,
                from,
                value,
            } => DirectionKindRecord::Deflection {
                backsight: self.reference(backsight)?,
                from: self.reference(from)?,
                value,
            },
            DirectionKind::Bearing { from, value } => DirectionKindRecord::Bearing {
                from: self.reference(from)?,
                value,
            },
            DirectionKind::Parallel { from, start, end } => DirectionKindRecord::Parallel {
                from: self.reference(from)?,
                start: self.reference(start)?,
                end: self.reference(end)?,
            },
        };

        Ok(DirectionRecord { offset, kind })
    }
}
