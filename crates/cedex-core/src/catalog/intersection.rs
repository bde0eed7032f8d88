//! Intersection edits.
//!
//! Each intersection creates one point and optionally the lines observed to
//! reach it. Intersections against existing lines may split them; the split
//! sections are numbered after everything else and omitted when absent.

use super::Catalog;
use crate::records::{
    IntersectDirectionAndDistanceOperation, IntersectDirectionAndLineOperation,
    IntersectTwoDirectionsOperation, IntersectTwoDistancesOperation, IntersectTwoLinesOperation,
    SplitPair,
};
use crate::source::{
    IntersectDirectionAndDistance, IntersectDirectionAndLine, IntersectTwoDirections,
    IntersectTwoDistances, IntersectTwoLines, SourceModel,
};
use crate::{CedexError, EditId, ExportId, FeatureId};
use chrono::NaiveDateTime;

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    fn split_id(&mut self, section: Option<FeatureId>) -> Result<Option<ExportId>, CedexError> {
        section.map(|s| self.ids.allocate(s)).transpose()
    }

    fn split_pair(
        &mut self,
        before: Option<FeatureId>,
        after: Option<FeatureId>,
    ) -> Result<SplitPair, CedexError> {
        let before = self.split_id(before)?;
        let after = self.split_id(after)?;
        Ok(SplitPair { before, after })
    }

    pub(super) fn intersect_two_directions(
        &mut self,
        edit_id: EditId,
        op: &IntersectTwoDirections,
        when: NaiveDateTime,
    ) -> Result<IntersectTwoDirectionsOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let direction1 = self.direction(&op.direction1)?;
        let direction2 = self.direction(&op.direction2)?;
        let to = self.stub(op.intersection)?;
        let line1 = self.optional_stub(op.line1)?;
        let line2 = self.optional_stub(op.line2)?;
        Ok(IntersectTwoDirectionsOperation {
            header,
            direction1,
            direction2,
            to,
            line1,
            line2,
        })
    }

    pub(super) fn intersect_two_distances(
        &mut self,
        edit_id: EditId,
        op: &IntersectTwoDistances,
        when: NaiveDateTime,
    ) -> Result<IntersectTwoDistancesOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let distance1 = self.length(&op.distance1)?;
        let from1 = self.reference(op.from1)?;
        let distance2 = self.length(&op.distance2)?;
        let from2 = self.reference(op.from2)?;
        let to = self.stub(op.intersection)?;
        let line1 = self.optional_stub(op.line1)?;
        let line2 = self.optional_stub(op.line2)?;
        Ok(IntersectTwoDistancesOperation {
            header,
            distance1,
            from1,
            distance2,
            from2,
            default: op.default,
            to,
            line1,
            line2,
        })
    }

    pub(super) fn intersect_direction_and_distance(
        &mut self,
        edit_id: EditId,
        op: &IntersectDirectionAndDistance,
        when: NaiveDateTime,
    ) -> Result<IntersectDirectionAndDistanceOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let direction = self.direction(&op.direction)?;
        let distance = self.length(&op.distance)?;
        let from = self.reference(op.from)?;
        let to = self.stub(op.intersection)?;
        let dir_line = self.optional_stub(op.direction_line)?;
        let dist_line = self.optional_stub(op.distance_line)?;
        Ok(IntersectDirectionAndDistanceOperation {
            header,
            direction,
            distance,
            from,
            default: op.default,
            to,
            dir_line,
            dist_line,
        })
    }

    pub(super) fn intersect_two_lines(
        &mut self,
        edit_id: EditId,
        op: &IntersectTwoLines,
        when: NaiveDateTime,
    ) -> Result<IntersectTwoLinesOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let line1 = self.reference(op.line1)?;
        let line2 = self.reference(op.line2)?;
        let close_to = self.reference(op.close_to)?;
        let to = self.stub(op.intersection)?;
        let split1 = self.split_pair(op.line1_before, op.line1_after)?;
        let split2 = self.split_pair(op.line2_before, op.line2_after)?;
        Ok(IntersectTwoLinesOperation {
            header,
            line1,
            line2,
            close_to,
            to,
            split1,
            split2,
        })
    }

    pub(super) fn intersect_direction_and_line(
        &mut self,
        edit_id: EditId,
        op: &IntersectDirectionAndLine,
        when: NaiveDateTime,
    ) -> Result<IntersectDirectionAndLineOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let direction = self.direction(&op.direction)?;
        let line = self.reference(op.line)?;
        let close_to = self.reference(op.close_to)?;
        let to = self.stub(op.intersection)?;
        let dir_line = self.optional_stub(op.direction_line)?;
        let split = self.split_pair(op.split_before, op.split_after)?;
        Ok(IntersectDirectionAndLineOperation {
            header,
            direction,
            line,
            close_to,
            to,
            dir_line,
            split,
        })
    }
}
