//! # Record Writer
//!
//! Hierarchical key/value emitter for the interchange log.
//!
//! Output grammar:
//!
//! ```text
//! Edit=NewPointOperation
//! {
//! 	Id=12
//! 	When=2008-03-14T09:20:00
//! 	Point=PointFeature
//! 	{
//! 		...
//! 	}
//! }
//! ```
//!
//! Arrays open with the bare field name, carry a `Length` field and list
//! their items as `[0]=TypeName`, `[1]=TypeName`, ...

mod field;
mod format;

pub use field::Field;
pub use format::{line_string, micro_to_decimal, radians_as_short_string};

use crate::primitives::{ID_LIST_SEPARATOR, INDENT, TIMESTAMP_FORMAT};
use crate::source::Position;
use crate::{CedexError, ExportId};
use chrono::NaiveDateTime;

// =============================================================================
// RECORD TRAIT
// =============================================================================

/// A value that can be written as a typed sub-record.
pub trait Record {
    /// Type name written after the field name.
    fn type_name(&self) -> &'static str;

    /// Write the record's fields inside its braces.
    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError>;
}

// =============================================================================
// RECORD WRITER
// =============================================================================

/// Accumulates the interchange log in memory.
#[derive(Debug, Default)]
pub struct RecordWriter {
    out: String,
    depth: usize,
}

impl RecordWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn value(&mut self, field: Field, value: &str) {
        self.line(&format!("{}={}", field.name(), value));
    }

    fn open(&mut self) {
        self.line("{");
        self.depth += 1;
    }

    /// Open a typed object under `field`.
    pub fn begin(&mut self, field: Field, type_name: &str) {
        self.value(field, type_name);
        self.open();
    }

    /// Open an array under `field` and write its length.
    pub fn begin_array(&mut self, field: Field, length: usize) {
        self.line(field.name());
        self.open();
        self.value(Field::Length, &length.to_string());
    }

    /// Open the item at `index` of the current array.
    pub fn begin_item(&mut self, index: usize, type_name: &str) {
        self.line(&format!("[{index}]={type_name}"));
        self.open();
    }

    /// Close the innermost object, array or item.
    pub fn end(&mut self) -> Result<(), CedexError> {
        if self.depth == 0 {
            return Err(CedexError::Writer(
                "end() called with no open scope".to_string(),
            ));
        }
        self.depth -= 1;
        self.line("}");
        Ok(())
    }

    /// Write a record as a typed object under `field`.
    pub fn write_record(&mut self, field: Field, record: &dyn Record) -> Result<(), CedexError> {
        self.begin(field, record.type_name());
        record.write_fields(self)?;
        self.end()
    }

    /// Write `record` under `field` if present; absent records write nothing.
    pub fn write_optional<R: Record>(
        &mut self,
        field: Field,
        record: Option<&R>,
    ) -> Result<(), CedexError> {
        match record {
            Some(r) => self.write_record(field, r),
            None => Ok(()),
        }
    }

    /// Write an array of records.
    pub fn write_array<R: Record>(&mut self, field: Field, items: &[R]) -> Result<(), CedexError> {
        self.begin_array(field, items.len());
        for (i, item) in items.iter().enumerate() {
            self.begin_item(i, item.type_name());
            item.write_fields(self)?;
            self.end()?;
        }
        self.end()
    }

    // -------------------------------------------------------------------------
    // Scalars
    // -------------------------------------------------------------------------

    pub fn write_i32(&mut self, field: Field, value: i32) {
        self.value(field, &value.to_string());
    }

    pub fn write_u32(&mut self, field: Field, value: u32) {
        self.value(field, &value.to_string());
    }

    pub fn write_i64(&mut self, field: Field, value: i64) {
        self.value(field, &value.to_string());
    }

    /// Doubles are written in shortest round-trip form.
    pub fn write_f64(&mut self, field: Field, value: f64) {
        self.value(field, &value.to_string());
    }

    pub fn write_bool(&mut self, field: Field, value: bool) {
        self.value(field, if value { "1" } else { "0" });
    }

    pub fn write_str(&mut self, field: Field, value: &str) {
        self.value(field, value);
    }

    pub fn write_when(&mut self, field: Field, value: NaiveDateTime) {
        self.value(field, &value.format(TIMESTAMP_FORMAT).to_string());
    }

    /// Write an angle as a short sexagesimal string.
    pub fn write_radians(&mut self, field: Field, radians: f64) {
        self.value(field, &radians_as_short_string(radians));
    }

    /// Write a position as two micro-unit integers.
    pub fn write_position(&mut self, x: Field, y: Field, position: Position) {
        self.write_i64(x, position.x);
        self.write_i64(y, position.y);
    }

    /// Write a reference to an exported object.
    pub fn write_id(&mut self, field: Field, id: ExportId) -> Result<(), CedexError> {
        if id.is_none() {
            return Err(CedexError::Unresolved(format!(
                "zero id written to field {field}"
            )));
        }
        self.write_u32(field, id.value());
        Ok(())
    }

    /// Write a reference if present.
    pub fn write_optional_id(
        &mut self,
        field: Field,
        id: Option<ExportId>,
    ) -> Result<(), CedexError> {
        match id {
            Some(id) => self.write_id(field, id),
            None => Ok(()),
        }
    }

    /// Write references as a single `;` separated value.
    pub fn write_id_list(&mut self, field: Field, ids: &[ExportId]) -> Result<(), CedexError> {
        if ids.iter().any(|id| id.is_none()) {
            return Err(CedexError::Unresolved(format!(
                "zero id in list written to field {field}"
            )));
        }
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(ID_LIST_SEPARATOR);
        self.value(field, &joined);
        Ok(())
    }

    /// Take the accumulated text. Fails if any scope is still open.
    pub fn finish(self) -> Result<String, CedexError> {
        if self.depth != 0 {
            return Err(CedexError::Writer(format!(
                "{} scope(s) left open",
                self.depth
            )));
        }
        Ok(self.out)
    }
}
