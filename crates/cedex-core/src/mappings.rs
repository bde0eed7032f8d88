//! # Mapping Tables
//!
//! Names in the legacy model (entity types, templates, ID groups, fonts,
//! tables) become numeric ids in the log. The tables are supplied by the
//! caller; this module only looks them up.

use crate::primitives::{
    DEFAULT_COORDINATE_SYSTEM, DEFAULT_LAYER_ID, DEFAULT_TABLE_ID, DEFAULT_USER_NAME,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name to id tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mappings {
    pub entities: BTreeMap<String, u32>,
    pub templates: BTreeMap<String, u32>,
    pub id_groups: BTreeMap<String, u32>,
    pub fonts: BTreeMap<String, u32>,
    pub tables: BTreeMap<String, u32>,
}

impl Mappings {
    /// Entity type id; unknown names map to 0.
    #[must_use]
    pub fn entity(&self, name: &str) -> u32 {
        self.entities.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn template(&self, name: &str) -> u32 {
        self.templates.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn id_group(&self, name: &str) -> u32 {
        self.id_groups.get(name).copied().unwrap_or(0)
    }

    /// Font id; 0 is the default font.
    #[must_use]
    pub fn font(&self, title: &str) -> u32 {
        self.fonts.get(title).copied().unwrap_or(0)
    }

    /// Table id; unknown tables fall back to the legacy default table.
    #[must_use]
    pub fn table(&self, name: &str) -> u32 {
        self.tables.get(name).copied().unwrap_or(DEFAULT_TABLE_ID)
    }
}

/// Parse a legacy `id=name` mapping file into a name to id table.
///
/// Whitespace around both parts is trimmed. Blank lines, lines without `=`
/// and lines whose id is not a number are ignored. A later line for the
/// same name replaces an earlier one.
#[must_use]
pub fn parse_mapping_file(text: &str) -> BTreeMap<String, u32> {
    let mut table = BTreeMap::new();
    for line in text.lines() {
        let Some((id, name)) = line.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let Ok(id) = id.trim().parse::<u32>() else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        table.insert(name.to_string(), id);
    }
    table
}

/// Values written into the prologue that do not come from the source model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// GUID of the new project, uppercase with dashes.
    pub project_id: String,
    pub project_name: String,
    pub layer_id: i32,
    pub coordinate_system: String,
    /// User named on the project and the prologue session.
    pub user_name: String,
    pub machine_name: String,
    /// Wall-clock time of the export; stamps the prologue.
    pub created: NaiveDateTime,
}

impl ExportSettings {
    /// Settings with the legacy defaults for everything but identity and time.
    #[must_use]
    pub fn new(project_id: impl Into<String>, project_name: impl Into<String>, created: NaiveDateTime) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
            layer_id: DEFAULT_LAYER_ID,
            coordinate_system: DEFAULT_COORDINATE_SYSTEM.to_string(),
            user_name: DEFAULT_USER_NAME.to_string(),
            machine_name: String::new(),
            created,
        }
    }
}
