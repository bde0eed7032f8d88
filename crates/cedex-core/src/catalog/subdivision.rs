//! Line and polygon subdivisions.

use super::{Catalog, created_by, observations};
use crate::records::{
    ChangeHeader, EditRecord, LineSubdivisionFace, LineSubdivisionOperation,
    PolygonSubdivisionOperation, SimpleLineSubdivisionOperation,
};
use crate::source::{
    Edit, LineSubdivision, PointOnLine, PolygonSubdivision, SourceModel, SubdivisionFace,
};
use crate::{CedexError, EditId, ExportId};
use chrono::NaiveDateTime;

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    /// One record per face. The second face takes a fresh id and points
    /// back at the first.
    pub(super) fn line_subdivision(
        &mut self,
        edit_id: EditId,
        edit: &Edit,
        op: &LineSubdivision,
        when: NaiveDateTime,
    ) -> Result<Vec<EditRecord>, CedexError> {
        let Some((first, rest)) = op.faces.split_first() else {
            return Err(CedexError::InvalidSource(format!(
                "line subdivision {} has no faces",
                edit.sequence
            )));
        };

        let header = self.header(edit_id, when)?;
        let front = self.subdivision_face(edit_id, op, first, header, None)?;
        let front_id = front.header.id;
        let mut records = vec![EditRecord::from(front)];

        if let Some(second) = rest.first() {
            let id = self.ids.allocate_anonymous()?;
            let header = ChangeHeader::new(id, when);
            let back = self.subdivision_face(edit_id, op, second, header, Some(front_id))?;
            records.push(back.into());
        }

        Ok(records)
    }

    /// Ids along a face are reserved in section order: the section's end
    /// point when the edit created it, then the section line.
    fn subdivision_face(
        &mut self,
        edit_id: EditId,
        op: &LineSubdivision,
        face: &SubdivisionFace,
        header: ChangeHeader,
        other_side: Option<ExportId>,
    ) -> Result<LineSubdivisionOperation, CedexError> {
        let line = self.reference(op.line)?;
        let first_section = face.sections.first().ok_or_else(|| {
            CedexError::InvalidSource(format!(
                "line subdivision edit #{} has a face without sections",
                edit_id.0
            ))
        })?;
        let point_type = self.entity_of(first_section.line)?;

        let mut ids = Vec::new();
        for section in &face.sections {
            let point = section.end_point;
            if created_by(self.model, point, edit_id)? && self.ids.lookup(point).is_none() {
                let slot = self.reserve_slot(Some(point))?;
                self.push_mapping(&mut ids, point, slot)?;
            }
            self.reserve_slot(Some(section.line))?;
        }

        Ok(LineSubdivisionOperation {
            header,
            line,
            face: LineSubdivisionFace {
                entry_from_end: false,
                distances: face.distances.iter().map(observations::distance).collect(),
            },
            other_side,
            point_type,
            ids,
        })
    }

    /// A single point on a line. Distances entered from the end of the line
    /// are negative in the source and written as magnitude plus flag.
    pub(super) fn point_on_line(
        &mut self,
        edit_id: EditId,
        op: &PointOnLine,
        when: NaiveDateTime,
    ) -> Result<SimpleLineSubdivisionOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let line = self.reference(op.line)?;

        let mut distance = observations::distance(&op.distance);
        let entry_from_end = distance.value < 0.0;
        if entry_from_end {
            distance.value = -distance.value;
        }

        let new_point = self.stub(op.new_point)?;
        let new_line1 = self.ids.allocate(op.new_line1)?;
        let new_line2 = self.ids.allocate(op.new_line2)?;

        Ok(SimpleLineSubdivisionOperation {
            header,
            line,
            distance,
            entry_from_end,
            new_point,
            new_line1,
            new_line2,
        })
    }

    pub(super) fn polygon_subdivision(
        &mut self,
        edit_id: EditId,
        edit: &Edit,
        op: &PolygonSubdivision,
        when: NaiveDateTime,
    ) -> Result<PolygonSubdivisionOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let deactivated_label = self.optional_reference(op.label)?;
        Ok(PolygonSubdivisionOperation {
            header,
            deactivated_label,
            lines: self.feature_records(&edit.features)?,
        })
    }
}
