//! Conversion of source features into feature records.

use super::Catalog;
use crate::records::{
    ArcAnchor, FeatureRecord, FeatureStub, KeyValue, LineFeature, LineGeometryRecord,
    PointFeature, TextFeature, TextGeometry, TextKind,
};
use crate::source::{
    EditKind, Feature, FeatureKey, FeatureShape, LineGeometry, SourceModel, TextContent, TextShape,
};
use crate::writer::line_string;
use crate::{CedexError, CircleId, ExportId, FeatureId};

fn key_value(key: &FeatureKey) -> KeyValue {
    match key.raw_id() {
        0 => KeyValue::Foreign(key.text.clone()),
        raw => KeyValue::Native(raw),
    }
}

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    /// Number `feature` and describe its identity.
    pub(super) fn stub(&mut self, feature: FeatureId) -> Result<FeatureStub, CedexError> {
        let id = self.number(feature)?;
        let f = self.model.feature(feature)?;
        Ok(FeatureStub {
            id,
            entity: self.mappings.entity(&f.entity),
            key: f.key.as_ref().map(key_value),
        })
    }

    pub(super) fn optional_stub(
        &mut self,
        feature: Option<FeatureId>,
    ) -> Result<Option<FeatureStub>, CedexError> {
        feature.map(|f| self.stub(f)).transpose()
    }

    /// Number `feature` and build its full record.
    pub(super) fn feature_record(&mut self, feature: FeatureId) -> Result<FeatureRecord, CedexError> {
        let model = self.model;
        let f = model.feature(feature)?;
        Ok(match &f.shape {
            FeatureShape::Point { .. } => FeatureRecord::Point(self.point_feature(feature)?),
            FeatureShape::Line { .. } => FeatureRecord::Line(self.line_feature(feature)?),
            FeatureShape::Text(_) => FeatureRecord::Text(self.text_feature(feature)?),
        })
    }

    pub(super) fn feature_records(
        &mut self,
        features: &[FeatureId],
    ) -> Result<Vec<FeatureRecord>, CedexError> {
        features.iter().map(|&f| self.feature_record(f)).collect()
    }

    pub(super) fn point_feature(&mut self, feature: FeatureId) -> Result<PointFeature, CedexError> {
        let stub = self.stub(feature)?;
        let location = self.model.point_location(feature)?;
        Ok(PointFeature {
            stub,
            position: self.model.location(location)?.position,
        })
    }

    /// Line record. Both terminals must already resolve through their
    /// location records.
    pub(super) fn line_feature(&mut self, feature: FeatureId) -> Result<LineFeature, CedexError> {
        let model = self.model;
        let f = model.feature(feature)?;
        let FeatureShape::Line {
            start,
            end,
            geometry,
        } = &f.shape
        else {
            return Err(not_a(feature, f, "line"));
        };

        let stub = self.stub(feature)?;
        let from = self.ids.resolve(*start)?;
        let to = self.ids.resolve(*end)?;

        let geometry = match geometry {
            LineGeometry::Segment => None,
            LineGeometry::MultiSegment { vertices } => Some(LineGeometryRecord::MultiSegment {
                line_string: line_string(vertices),
            }),
            LineGeometry::Arc { circle, clockwise } => Some(LineGeometryRecord::Arc {
                clockwise: *clockwise,
                anchor: self.arc_anchor(feature, *circle)?,
            }),
            LineGeometry::Section => Some(LineGeometryRecord::Section {
                base: self.section_base(f)?,
            }),
        };

        Ok(LineFeature {
            stub,
            from,
            to,
            topological: f.topological,
            geometry,
        })
    }

    /// The earliest arc on a circle refers to the centre point, later arcs
    /// to the earliest one.
    fn arc_anchor(&self, arc: FeatureId, circle: CircleId) -> Result<ArcAnchor, CedexError> {
        let c = self.model.circle(circle)?;
        let mut first: Option<(u32, FeatureId)> = None;
        for &candidate in &c.arcs {
            let creator = self.model.feature(candidate)?.creator;
            let sequence = self.model.edit(creator)?.sequence;
            if first.is_none_or(|(best, _)| sequence < best) {
                first = Some((sequence, candidate));
            }
        }
        match first {
            Some((_, first_arc)) if first_arc == arc => {
                Ok(ArcAnchor::Center(self.reference(c.center)?))
            }
            Some((_, first_arc)) => Ok(ArcAnchor::FirstArc(self.reference(first_arc)?)),
            None => Err(CedexError::InvalidSource(format!(
                "circle #{} has no arcs",
                circle.0
            ))),
        }
    }

    /// Parent line of a section. Only subdivision edits create sections.
    fn section_base(&self, section: &Feature) -> Result<ExportId, CedexError> {
        let creator = self.model.edit(section.creator)?;
        match &creator.kind {
            EditKind::LineSubdivision(op) => self.reference(op.line),
            EditKind::PointOnLine(op) => self.reference(op.line),
            other => Err(CedexError::InvalidSource(format!(
                "section created by {} edit {}",
                other.name(),
                creator.sequence
            ))),
        }
    }

    pub(super) fn text_feature(&mut self, feature: FeatureId) -> Result<TextFeature, CedexError> {
        let model = self.model;
        let f = model.feature(feature)?;
        let FeatureShape::Text(shape) = &f.shape else {
            return Err(not_a(feature, f, "text"));
        };

        let stub = self.stub(feature)?;
        let polygon_position = f
            .topological
            .then(|| shape.polygon_position.unwrap_or(shape.position));

        Ok(TextFeature {
            stub,
            topological: f.topological,
            polygon_position,
            geometry: self.text_geometry(shape),
        })
    }

    fn text_geometry(&self, shape: &TextShape) -> TextGeometry {
        let kind = match &shape.content {
            TextContent::Key => TextKind::Key,
            TextContent::Misc { text } => TextKind::Misc { text: text.clone() },
            TextContent::Row { table, template } => TextKind::Row {
                table: self.mappings.table(table),
                template: self.mappings.template(template),
            },
        };
        TextGeometry {
            kind,
            font: shape.font.as_deref().map_or(0, |t| self.mappings.font(t)),
            position: shape.position,
            width: shape.width(),
            height: shape.height,
            rotation: shape.rotation,
        }
    }
}

fn not_a(id: FeatureId, f: &Feature, expected: &str) -> CedexError {
    CedexError::InvalidSource(format!(
        "feature #{} is a {}, expected a {expected}",
        id.0,
        f.shape_name()
    ))
}
