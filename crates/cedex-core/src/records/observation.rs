//! Observation records: distances, lengths, offsets and directions.

use crate::writer::{Field, Record, RecordWriter};
use crate::{CedexError, ExportId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRecord {
    pub value: f64,
    pub unit: u8,
    pub fixed: bool,
}

impl Record for DistanceRecord {
    fn type_name(&self) -> &'static str {
        "Distance"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_f64(Field::Value, self.value);
        w.write_u32(Field::Unit, u32::from(self.unit));
        if self.fixed {
            w.write_bool(Field::Fixed, true);
        }
        Ok(())
    }
}

/// A length: typed distance or distance to a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LengthRecord {
    Distance(DistanceRecord),
    OffsetPoint { point: ExportId },
}

impl Record for LengthRecord {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Distance(d) => d.type_name(),
            Self::OffsetPoint { .. } => "OffsetPoint",
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        match self {
            Self::Distance(d) => d.write_fields(w),
            Self::OffsetPoint { point } => w.write_id(Field::Point, *point),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetRecord {
    Distance { distance: DistanceRecord, left: bool },
    Point { point: ExportId },
}

impl Record for OffsetRecord {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Distance { .. } => "OffsetDistance",
            Self::Point { .. } => "OffsetPoint",
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        match self {
            Self::Distance { distance, left } => {
                w.write_record(Field::Offset, distance)?;
                w.write_bool(Field::Left, *left);
                Ok(())
            }
            Self::Point { point } => w.write_id(Field::Point, *point),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectionKindRecord {
    Angle {
        backsight: ExportId,
        from: ExportId,
        value: f64,
    },
    Deflection {
        backsight: ExportId,
        from: ExportId,
        value: f64,
    },
    Bearing {
        from: ExportId,
        value: f64,
    },
    Parallel {
        from: ExportId,
        start: ExportId,
        end: ExportId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionRecord {
    pub offset: Option<OffsetRecord>,
    pub kind: DirectionKindRecord,
}

impl Record for DirectionRecord {
    fn type_name(&self) -> &'static str {
        match self.kind {
            DirectionKindRecord::Angle { .. } => "AngleDirection",
            DirectionKindRecord::Deflection { .. } => "DeflectionDirection",
            DirectionKindRecord::Bearing { .. } => "BearingDirection",
            DirectionKindRecord::Parallel { .. } => "ParallelDirection",
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_optional(Field::Offset, self.offset.as_ref())?;
        match self.kind {
            DirectionKindRecord::Angle {
                backsight,
                from,
                value,
            }
            | DirectionKindRecord::Deflection {
                backsight,
                from,
                value,
            } => {
                w.write_id(Field::Backsight, backsight)?;
                w.write_id(Field::From, from)?;
                w.write_radians(Field::Value, value);
            }
            DirectionKindRecord::Bearing { from, value } => {
                w.write_id(Field::From, from)?;
                w.write_radians(Field::Value, value);
            }
            DirectionKindRecord::Parallel { from, start, end } => {
                w.write_id(Field::From, from)?;
                w.write_id(Field::Start, start)?;
                w.write_id(Field::End, end)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(record: &dyn Record) -> String {
        let mut w = RecordWriter::new();
        w.write_record(Field::Direction, record).expect("write");
        w.finish().expect("finish")
    }

    #[test]
    fn fixed_is_written_only_when_set() {
        let loose = DistanceRecord {
            value: 12.25,
            unit: 1,
            fixed: false,
        };
        let fixed = DistanceRecord { fixed: true, ..loose };
        assert!(!render(&loose).contains("Fixed"));
        assert!(render(&fixed).contains("\tValue=12.25\n\tUnit=1\n\tFixed=1\n"));
    }

    #[test]
    fn offset_precedes_direction_fields() {
        let dir = DirectionRecord {
            offset: Some(OffsetRecord::Distance {
                distance: DistanceRecord {
                    value: 3.0,
                    unit: 1,
                    fixed: false,
                },
                left: true,
            }),
            kind: DirectionKindRecord::Bearing {
                from: ExportId(4),
                value: std::f64::consts::FRAC_PI_2,
            },
        };
        let text = render(&dir);
        assert!(text.starts_with("Direction=BearingDirection\n{\n\tOffset=OffsetDistance\n"));
        assert!(text.contains("\t\tOffset=Distance\n"));
        assert!(text.contains("\t\tLeft=1\n\t}\n\tFrom=4\n\tValue=90-0\n}"));
    }

    #[test]
    fn parallel_direction_writes_both_ends() {
        let dir = DirectionRecord {
            offset: None,
            kind: DirectionKindRecord::Parallel {
                from: ExportId(1),
                start: ExportId(2),
                end: ExportId(3),
            },
        };
        assert_eq!(
            render(&dir),
            "Direction=ParallelDirection\n{\n\tFrom=1\n\tStart=2\n\tEnd=3\n}\n"
        );
    }

    #[test]
    fn offset_point_length() {
        let len = LengthRecord::OffsetPoint { point: ExportId(6) };
        assert_eq!(len.type_name(), "OffsetPoint");
        assert!(render(&len).contains("\tPoint=6\n"));
    }
}
