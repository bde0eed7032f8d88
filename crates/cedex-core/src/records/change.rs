//! Change events: the project, session and ID allocation markers that
//! bracket the edits.

use crate::writer::{Field, Record, RecordWriter};
use crate::{CedexError, ExportId};
use chrono::NaiveDateTime;

/// Fields every change starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeHeader {
    pub id: ExportId,
    pub when: NaiveDateTime,
}

impl ChangeHeader {
    #[must_use]
    pub const fn new(id: ExportId, when: NaiveDateTime) -> Self {
        Self { id, when }
    }

    pub(crate) fn write(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        w.write_id(Field::Id, self.id)?;
        w.write_when(Field::When, self.when);
        Ok(())
    }
}

/// Creation of the project that receives the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectEvent {
    pub header: ChangeHeader,
    pub project_id: String,
    pub project_name: String,
    pub layer_id: i32,
    pub coordinate_system: String,
    pub user_name: String,
    pub machine_name: String,
}

impl Record for NewProjectEvent {
    fn type_name(&self) -> &'static str {
        "NewProjectEvent"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_str(Field::ProjectId, &self.project_id);
        w.write_str(Field::ProjectName, &self.project_name);
        w.write_i32(Field::LayerId, self.layer_id);
        w.write_str(Field::CoordinateSystem, &self.coordinate_system);
        w.write_str(Field::UserName, &self.user_name);
        w.write_str(Field::MachineName, &self.machine_name);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionEvent {
    pub header: ChangeHeader,
    pub user_name: String,
    pub machine_name: String,
}

impl Record for NewSessionEvent {
    fn type_name(&self) -> &'static str {
        "NewSessionEvent"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_str(Field::UserName, &self.user_name);
        w.write_str(Field::MachineName, &self.machine_name);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSessionEvent {
    pub header: ChangeHeader,
}

impl Record for EndSessionEvent {
    fn type_name(&self) -> &'static str {
        "EndSessionEvent"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)
    }
}

/// A range of user-visible keys reserved for the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocation {
    pub header: ChangeHeader,
    pub group_id: u32,
    pub lowest_id: u32,
    pub highest_id: u32,
}

impl Record for IdAllocation {
    fn type_name(&self) -> &'static str {
        "IdAllocation"
    }

    fn write_fields(&self, w: &mut RecordWriter) -> Result<(), CedexError> {
        self.header.write(w)?;
        w.write_u32(Field::GroupId, self.group_id);
        w.write_u32(Field::LowestId, self.lowest_id);
        w.write_u32(Field::HighestId, self.highest_id);
        Ok(())
    }
}
