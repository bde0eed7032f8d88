//! Edits that bring new features into the map.

use super::{Catalog, created_by, observations, points_first};
use crate::records::{
    AttachPointOperation, GetControlOperation, IdMapping, ImportOperation, LineExtensionOperation,
    NewCircleOperation, NewLineOperation, NewPointOperation, NewTextOperation,
    ParallelLineOperation, PathOperation, RadialOperation,
};
use crate::source::{
    AttachPoint, Edit, Import, Length, LineExtension, NewCircle, NewLine, NewPoint, NewText,
    Parallel, Path, PathSpan, Radial, SourceModel,
};
use crate::{CedexError, EditId, ExportId, FeatureId};
use chrono::NaiveDateTime;

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    /// Imports and background loads. Points are numbered and written first
    /// so that imported lines can resolve their terminals.
    pub(super) fn import(
        &mut self,
        edit_id: EditId,
        edit: &Edit,
        op: &Import,
        when: NaiveDateTime,
    ) -> Result<ImportOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let order = points_first(self.model, edit)?;
        Ok(ImportOperation {
            header,
            source: op.source.clone(),
            features: self.feature_records(&order)?,
        })
    }

    pub(super) fn get_control(
        &mut self,
        edit_id: EditId,
        edit: &Edit,
        when: NaiveDateTime,
    ) -> Result<GetControlOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(GetControlOperation {
            header,
            points: self.feature_records(&edit.features)?,
        })
    }

    pub(super) fn new_point(
        &mut self,
        edit_id: EditId,
        op: &NewPoint,
        when: NaiveDateTime,
    ) -> Result<NewPointOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(NewPointOperation {
            header,
            point: self.point_feature(op.point)?,
        })
    }

    pub(super) fn new_line(
        &mut self,
        edit_id: EditId,
        op: &NewLine,
        when: NaiveDateTime,
    ) -> Result<NewLineOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(NewLineOperation {
            header,
            line: self.line_feature(op.line)?,
        })
    }

    pub(super) fn new_text(
        &mut self,
        edit_id: EditId,
        op: &NewText,
        when: NaiveDateTime,
    ) -> Result<NewTextOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(NewTextOperation {
            header,
            text: self.text_feature(op.text)?,
        })
    }

    /// A circle with a typed radius closes on a point the edit itself
    /// created. A radius taken from an offset point needs no closing point.
    pub(super) fn new_circle(
        &mut self,
        edit_id: EditId,
        op: &NewCircle,
        when: NaiveDateTime,
    ) -> Result<NewCircleOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let center = self.reference(op.center)?;
        let radius = self.length(&op.radius)?;

        let closing_point = match op.radius {
            Length::OffsetPoint { .. } => None,
            Length::Distance(_) => {
                let point = op.closing_point.ok_or_else(|| {
                    CedexError::InvalidSource(format!(
                        "circle edit #{} has a typed radius but no closing point",
                        edit_id.0
                    ))
                })?;
                if !created_by(self.model, point, edit_id)? {
                    return Err(CedexError::InvalidSource(format!(
                        "closing point #{} was not created by circle edit #{}",
                        point.0, edit_id.0
                    )));
                }
                Some(self.stub(point)?)
            }
        };

        Ok(NewCircleOperation {
            header,
            center,
            radius,
            closing_point,
            arc: self.stub(op.arc)?,
        })
    }

    /// Connection paths reserve one slot per leg for its centre point and two
    /// slots per span, point then line. The point slot of a line span ending
    /// on the path's terminal point stays unbound.
    pub(super) fn path(
        &mut self,
        edit_id: EditId,
        edit: &Edit,
        op: &Path,
        when: NaiveDateTime,
    ) -> Result<PathOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let from = self.reference(op.from)?;
        let to = self.reference(op.to)?;

        let mut point_type = None;
        let mut line_type = None;
        for &f in &edit.features {
            let feature = self.model.feature(f)?;
            if feature.is_point() && point_type.is_none() {
                point_type = Some(self.entity_of(f)?);
            } else if feature.is_line() && line_type.is_none() {
                line_type = Some(self.entity_of(f)?);
            }
        }

        let mut ids = Vec::new();
        for leg in &op.legs {
            self.reserve_slot(leg.center)?;

            let single = [PathSpan {
                line: None,
                end_point: None,
            }];
            let spans = if leg.spans.is_empty() {
                &single[..]
            } else {
                &leg.spans[..]
            };

            for span in spans {
                let point = span
                    .end_point
                    .filter(|&p| span.line.is_none() || p != op.to);
                let slot = self.reserve_slot(point)?;
                if let Some(p) = point {
                    self.push_mapping(&mut ids, p, slot)?;
                }
                self.reserve_slot(span.line)?;
            }
        }

        Ok(PathOperation {
            header,
            from,
            to,
            entry_string: op.entry.clone(),
            default_entry_unit: 0,
            point_type: point_type.unwrap_or(0),
            line_type: line_type.unwrap_or(0),
            ids,
        })
    }

    /// Record a raw key mapping for a point with a numeric key.
    pub(super) fn push_mapping(
        &self,
        ids: &mut Vec<IdMapping>,
        point: FeatureId,
        id: ExportId,
    ) -> Result<(), CedexError> {
        let key = self.model.feature(point)?.raw_id();
        if key != 0 {
            ids.push(IdMapping { id, key });
        }
        Ok(())
    }

    pub(super) fn radial(
        &mut self,
        edit_id: EditId,
        op: &Radial,
        when: NaiveDateTime,
    ) -> Result<RadialOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let direction = self.direction(&op.direction)?;
        let length = self.length(&op.length)?;
        let to = self.stub(op.point)?;
        Ok(RadialOperation {
            header,
            direction,
            length,
            to,
            line: self.optional_stub(op.line)?,
        })
    }

    pub(super) fn line_extension(
        &mut self,
        edit_id: EditId,
        op: &LineExtension,
        when: NaiveDateTime,
    ) -> Result<LineExtensionOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let line = self.reference(op.line)?;
        let new_point = self.stub(op.new_point)?;
        Ok(LineExtensionOperation {
            header,
            line,
            extend_from_end: op.from_end,
            length: observations::distance(&op.length),
            new_point,
            new_line: self.optional_stub(op.new_line)?,
        })
    }

    /// Terminal points are numbered before the parallel line itself.
    pub(super) fn parallel(
        &mut self,
        edit_id: EditId,
        op: &Parallel,
        when: NaiveDateTime,
    ) -> Result<ParallelLineOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let ref_line = self.reference(op.reference)?;
        let term1 = self.optional_reference(op.term1)?;
        let term2 = self.optional_reference(op.term2)?;
        let offset = self.length(&op.offset)?;
        let start_point = self.optional_stub(op.start_point)?;
        let end_point = self.optional_stub(op.end_point)?;
        Ok(ParallelLineOperation {
            header,
            ref_line,
            term1,
            term2,
            reverse_arc: op.reversed,
            offset,
            start_point,
            end_point,
            new_line: self.stub(op.parallel)?,
        })
    }

    pub(super) fn attach_point(
        &mut self,
        edit_id: EditId,
        op: &AttachPoint,
        when: NaiveDateTime,
    ) -> Result<AttachPointOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(AttachPointOperation {
            header,
            line: self.reference(op.line)?,
            position_ratio: op.position_ratio,
            point: self.stub(op.point)?,
        })
    }
}
