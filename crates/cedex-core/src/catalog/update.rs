//! Edits that change or remove existing features.
//!
//! These edits create nothing. Every feature they mention must already
//! carry an id.

use super::Catalog;
use crate::records::{
    DeletionOperation, MoveTextOperation, SetTopologyOperation, TextRotationOperation,
    TrimLineOperation,
};
use crate::source::{Deletion, FeatureShape, MoveText, SetTopology, SourceModel, TextRotation, Trim};
use crate::{CedexError, EditId, ExportId, FeatureId};
use chrono::NaiveDateTime;

impl<M: SourceModel + ?Sized> Catalog<'_, M> {
    fn references(&self, features: &[FeatureId]) -> Result<Vec<ExportId>, CedexError> {
        features.iter().map(|&f| self.reference(f)).collect()
    }

    /// A deletion of nothing is dropped without taking an id.
    pub(super) fn deletion(
        &mut self,
        edit_id: EditId,
        op: &Deletion,
        when: NaiveDateTime,
    ) -> Result<Option<DeletionOperation>, CedexError> {
        if op.deleted.is_empty() {
            return Ok(None);
        }
        let header = self.header(edit_id, when)?;
        Ok(Some(DeletionOperation {
            header,
            deleted: self.references(&op.deleted)?,
        }))
    }

    /// The new position is the text's current position.
    pub(super) fn move_text(
        &mut self,
        edit_id: EditId,
        op: &MoveText,
        when: NaiveDateTime,
    ) -> Result<MoveTextOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        let text = self.reference(op.text)?;
        let FeatureShape::Text(shape) = &self.model.feature(op.text)?.shape else {
            return Err(CedexError::InvalidSource(format!(
                "move text edit #{} moves feature #{}, which is not a text",
                edit_id.0, op.text.0
            )));
        };
        Ok(MoveTextOperation {
            header,
            text,
            old_position: op.old_position,
            new_position: shape.position,
        })
    }

    pub(super) fn text_rotation(
        &mut self,
        edit_id: EditId,
        op: &TextRotation,
        when: NaiveDateTime,
    ) -> Result<TextRotationOperation, CedexError> {
        Ok(TextRotationOperation {
            header: self.header(edit_id, when)?,
            rotation: op.rotation,
        })
    }

    pub(super) fn set_topology(
        &mut self,
        edit_id: EditId,
        op: &SetTopology,
        when: NaiveDateTime,
    ) -> Result<SetTopologyOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(SetTopologyOperation {
            header,
            line: self.reference(op.line)?,
        })
    }

    pub(super) fn trim(
        &mut self,
        edit_id: EditId,
        op: &Trim,
        when: NaiveDateTime,
    ) -> Result<TrimLineOperation, CedexError> {
        let header = self.header(edit_id, when)?;
        Ok(TrimLineOperation {
            header,
            lines: self.references(&op.lines)?,
            points: self.references(&op.points)?,
        })
    }
}
