//! Feature records.

use crate::source::Position;
use crate::writer::{Field, Record, RecordWriter};
use crate::{CedexError, ExportId};

/// User-visible key written with a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValue {
    /// Numeric key, check digit already stripped.
    Native(u32),
    /// Any other key, written verbatim.
    Foreign(String),
}

/// Identity part shared by every feature record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStub {
    pub id: ExportId,
    pub entity: u32,
    pub key: Option<KeyValue>,
}

impl FeatureStub {
    fn write_stub(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_id(Field::Id, self.id)?;
        w.write_u32(Field::Entity, self.entity);
        match &self.key {
            Some(KeyValue::Native(key)) => w.write_u32(Field::Key, *key),
            Some(KeyValue::Foreign(text)) => w.write_str(Field::ForeignKey, text),
            None => {}
        }
        Ok(())
    }
}

impl Record for FeatureStub {
    fn type_name(&self) -> &'static str {
        "FeatureStub"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.write_stub(w)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointFeature {
    pub stub: FeatureStub,
    pub position: Position,
}

impl Record for PointFeature {
    fn type_name(&self) -> &'static str {
        "PointFeature"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.stub.write_stub(w)?;
        w.write_position(Field::X, Field::Y, self.position);
        Ok(())
    }
}

// =============================================================================
// LINES
// =============================================================================

/// Which object an arc's geometry hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcAnchor {
    /// The first arc on a circle refers to the circle's center point.
    Center(ExportId),
    /// Later arcs refer to the first arc.
    FirstArc(ExportId),
}

/// Geometry of a non-straight line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineGeometryRecord {
    MultiSegment { line_string: String },
    Arc { clockwise: bool, anchor: ArcAnchor },
    Section { base: ExportId },
}

impl Record for LineGeometryRecord {
    fn type_name(&self) -> &'static str {
        match self {
            Self::MultiSegment { .. } => "MultiSegmentGeometry",
            Self::Arc { .. } => "ArcGeometry",
            Self::Section { .. } => "SectionGeometry",
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        match self {
            Self::MultiSegment { line_string } => {
                w.write_str(Field::LineString, line_string);
                Ok(())
            }
            Self::Arc { clockwise, anchor } => {
                w.write_bool(Field::Clockwise, *clockwise);
                match anchor {
                    ArcAnchor::Center(id) => w.write_id(Field::Center, *id),
                    ArcAnchor::FirstArc(id) => w.write_id(Field::FirstArc, *id),
                }
            }
            Self::Section { base } => w.write_id(Field::Base, *base),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFeature {
    pub stub: FeatureStub,
    pub from: ExportId,
    pub to: ExportId,
    pub topological: bool,
    /// Absent for straight segments.
    pub geometry: Option<LineGeometryRecord>,
}

impl Record for LineFeature {
    fn type_name(&self) -> &'static str {
        "LineFeature"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.stub.write_stub(w)?;
        w.write_id(Field::From, self.from)?;
        w.write_id(Field::To, self.to)?;
        w.write_bool(Field::Topological, self.topological);
        w.write_optional(Field::Type, self.geometry.as_ref())
    }
}

// =============================================================================
// TEXT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextKind {
    Key,
    Misc { text: String },
    Row { table: u32, template: u32 },
}

/// Placement and content of a text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGeometry {
    pub kind: TextKind,
    /// Font id; 0 means the default font and is not written.
    pub font: u32,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Record for TextGeometry {
    fn type_name(&self) -> &'static str {
        match self.kind {
            TextKind::Key => "KeyTextGeometry",
            TextKind::Misc { .. } => "MiscTextGeometry",
            TextKind::Row { .. } => "RowTextContent",
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        if self.font != 0 {
            w.write_u32(Field::Font, self.font);
        }
        w.write_position(Field::X, Field::Y, self.position);
        w.write_f64(Field::Width, self.width);
        w.write_f64(Field::Height, self.height);
        w.write_radians(Field::Rotation, self.rotation);
        match &self.kind {
            TextKind::Key => {}
            TextKind::Misc { text } => w.write_str(Field::Text, text),
            TextKind::Row { table, template } => {
                w.write_u32(Field::Table, *table);
                w.write_u32(Field::Template, *template);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFeature {
    pub stub: FeatureStub,
    pub topological: bool,
    /// Written for topological labels only.
    pub polygon_position: Option<Position>,
    pub geometry: TextGeometry,
}

impl Record for TextFeature {
    fn type_name(&self) -> &'static str {
        "TextFeature"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.stub.write_stub(w)?;
        w.write_bool(Field::Topological, self.topological);
        if let Some(p) = self.polygon_position {
            w.write_position(Field::PolygonX, Field::PolygonY, p);
        }
        w.write_record(Field::Type, &self.geometry)
    }
}

// =============================================================================
// HETEROGENEOUS FEATURES & ID MAPPINGS
// =============================================================================

/// Any full feature record, for feature arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureRecord {
    Point(PointFeature),
    Line(LineFeature),
    Text(TextFeature),
}

impl FeatureRecord {
    /// Export id of the feature.
    #[must_use]
    pub fn id(&self) -> ExportId {
        match self {
            Self::Point(p) => p.stub.id,
            Self::Line(l) => l.stub.id,
            Self::Text(t) => t.stub.id,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }
}

impl Record for FeatureRecord {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Point(p) => p.type_name(),
            Self::Line(l) => l.type_name(),
            Self::Text(t) => t.type_name(),
        }
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        match self {
            Self::Point(p) => p.write_fields(w),
            Self::Line(l) => l.write_fields(w),
            Self::Text(t) => t.write_fields(w),
        }
    }
}

/// Link between an export id and the legacy numeric key of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdMapping {
    pub id: ExportId,
    pub key: u32,
}

impl Record for IdMapping {
    fn type_name(&self) -> &'static str {
        "IdMapping"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_id(Field::Id, self.id)?;
        w.write_u32(Field::Key, self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(id: u32, key: Option<KeyValue>) -> FeatureStub {
        FeatureStub {
            id: ExportId(id),
            entity: 7,
            key,
        }
    }

    fn render(field: Field, record: &dyn Record) -> String {
        let mut w = RecordWriter::new();
        w.write_record(field, record).expect("write");
        w.finish().expect("finish")
    }

    #[test]
    fn stub_writes_native_or_foreign_key() {
        let native = render(Field::Point, &stub(5, Some(KeyValue::Native(123))));
        assert!(native.contains("\tKey=123\n"));
        assert!(!native.contains("ForeignKey"));

        let foreign = render(Field::Point, &stub(5, Some(KeyValue::Foreign("A-7".into()))));
        assert!(foreign.contains("\tForeignKey=A-7\n"));

        let none = render(Field::Point, &stub(5, None));
        assert!(!none.contains("Key"));
    }

    #[test]
    fn point_feature_layout() {
        let point = PointFeature {
            stub: stub(9, None),
            position: Position::new(1_000_000, -2),
        };
        assert_eq!(
            render(Field::Point, &point),
            "Point=PointFeature\n{\n\tId=9\n\tEntity=7\n\tX=1000000\n\tY=-2\n}\n"
        );
    }

    #[test]
    fn straight_line_has_no_type() {
        let line = LineFeature {
            stub: stub(12, None),
            from: ExportId(9),
            to: ExportId(10),
            topological: true,
            geometry: None,
        };
        let text = render(Field::Line, &line);
        assert!(text.contains("\tFrom=9\n\tTo=10\n\tTopological=1\n}"));
        assert!(!text.contains("Type="));
    }

    #[test]
    fn arc_geometry_names_its_anchor() {
        let first = LineGeometryRecord::Arc {
            clockwise: true,
            anchor: ArcAnchor::Center(ExportId(3)),
        };
        assert!(render(Field::Type, &first).contains("Clockwise=1\n\tCenter=3\n"));

        let later = LineGeometryRecord::Arc {
            clockwise: false,
            anchor: ArcAnchor::FirstArc(ExportId(8)),
        };
        assert!(render(Field::Type, &later).contains("Clockwise=0\n\tFirstArc=8\n"));
    }

    #[test]
    fn text_feature_layout() {
        let text = TextFeature {
            stub: stub(20, None),
            topological: true,
            polygon_position: Some(Position::new(5, 6)),
            geometry: TextGeometry {
                kind: TextKind::Row {
                    table: 123,
                    template: 4,
                },
                font: 0,
                position: Position::new(1, 2),
                width: 7.5,
                height: 2.0,
                rotation: 0.0,
            },
        };
        let out = render(Field::Text, &text);
        assert!(out.contains("\tTopological=1\n\tPolygonX=5\n\tPolygonY=6\n\tType=RowTextContent\n"));
        assert!(out.contains("\t\tX=1\n\t\tY=2\n\t\tWidth=7.5\n\t\tHeight=2\n\t\tRotation=0-0\n\t\tTable=123\n\t\tTemplate=4\n"));
        assert!(!out.contains("Font="));
    }

    #[test]
    fn feature_record_delegates() {
        let record = FeatureRecord::Point(PointFeature {
            stub: stub(4, None),
            position: Position::default(),
        });
        assert_eq!(record.type_name(), "PointFeature");
        assert_eq!(record.id(), ExportId(4));
        assert!(record.is_point());
    }
}
