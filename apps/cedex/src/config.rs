//! # Configuration
//!
//! Settings loaded from `cedex.toml`.
//!
//! ```toml
//! [export]
//! root = "exports"
//! layer_id = 10
//! coordinate_system = "UTM83-14"
//! user_name = "CEdit"
//! machine_name = "SURVEY01"
//!
//! [mappings]
//! entities = { "Parcel Boundary" = 12, "Road" = 7 }
//! tables = { "Owners" = 4 }
//!
//! [mappings.files]
//! entities = "EntityTranslation.txt"
//! ```
//!
//! A missing file yields the defaults. Tables read from legacy mapping files
//! are merged under the inline tables, so an inline entry wins.

use cedex_core::primitives::{DEFAULT_COORDINATE_SYSTEM, DEFAULT_LAYER_ID, DEFAULT_USER_NAME};
use cedex_core::{CedexError, ExportSettings, Mappings, parse_mapping_file};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "cedex.toml";

/// Default export root when neither the file nor the command line names one.
pub const DEFAULT_EXPORT_ROOT: &str = "exports";

// =============================================================================
// FILE LAYOUT
// =============================================================================

/// The `[export]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub root: PathBuf,
    pub layer_id: i32,
    pub coordinate_system: String,
    pub user_name: String,
    /// Falls back to the host name when absent.
    pub machine_name: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_EXPORT_ROOT),
            layer_id: DEFAULT_LAYER_ID,
            coordinate_system: DEFAULT_COORDINATE_SYSTEM.to_string(),
            user_name: DEFAULT_USER_NAME.to_string(),
            machine_name: None,
        }
    }
}

/// Legacy `id=name` files, one per table. Relative paths are resolved
/// against the directory of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingFiles {
    pub entities: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub id_groups: Option<PathBuf>,
    pub fonts: Option<PathBuf>,
    pub tables: Option<PathBuf>,
}

/// The `[mappings]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub entities: BTreeMap<String, u32>,
    pub templates: BTreeMap<String, u32>,
    pub id_groups: BTreeMap<String, u32>,
    pub fonts: BTreeMap<String, u32>,
    pub tables: BTreeMap<String, u32>,
    pub files: MappingFiles,
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CedexConfig {
    pub export: ExportConfig,
    pub mappings: MappingConfig,
    /// Directory the file was read from; anchors relative mapping files.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

// =============================================================================
// LOADING
// =============================================================================

impl CedexConfig {
    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<Self, CedexError> {
        toml::from_str(text)
            .map_err(|e| CedexError::SerializationError(format!("Invalid {CONFIG_FILE_NAME}: {e}")))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CedexError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CedexError::IoError(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        let mut config = Self::parse(&text)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Build the lookup tables, reading any legacy mapping files.
    pub fn mappings(&self) -> Result<Mappings, CedexError> {
        let m = &self.mappings;
        let files = &m.files;
        Ok(Mappings {
            entities: self.merged(files.entities.as_deref(), &m.entities)?,
            templates: self.merged(files.templates.as_deref(), &m.templates)?,
            id_groups: self.merged(files.id_groups.as_deref(), &m.id_groups)?,
            fonts: self.merged(files.fonts.as_deref(), &m.fonts)?,
            tables: self.merged(files.tables.as_deref(), &m.tables)?,
        })
    }

    fn merged(
        &self,
        file: Option<&Path>,
        inline: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, u32>, CedexError> {
        let mut table = match file {
            Some(file) => {
                let path = self.base_dir.join(file);
                let text = std::fs::read_to_string(&path).map_err(|e| {
                    CedexError::IoError(format!("Cannot read {}: {}", path.display(), e))
                })?;
                parse_mapping_file(&text)
            }
            None => BTreeMap::new(),
        };
        table.extend(inline.iter().map(|(name, &id)| (name.clone(), id)));
        Ok(table)
    }

    /// Prologue settings for one export.
    ///
    /// `host` is used when the file names no machine.
    #[must_use]
    pub fn settings(
        &self,
        project_id: &str,
        project_name: &str,
        created: NaiveDateTime,
        host: Option<&str>,
    ) -> ExportSettings {
        let export = &self.export;
        ExportSettings {
            layer_id: export.layer_id,
            coordinate_system: export.coordinate_system.clone(),
            user_name: export.user_name.clone(),
            machine_name: export
                .machine_name
                .clone()
                .or_else(|| host.map(str::to_string))
                .unwrap_or_default(),
            ..ExportSettings::new(project_id, project_name, created)
        }
    }

    /// Export root, with an explicit override taking precedence.
    #[must_use]
    pub fn root(&self, override_root: Option<&Path>) -> PathBuf {
        override_root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.export.root.clone())
    }
}

/// Host name from the environment, if any.
pub fn host_name() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .filter(|name| !name.is_empty())
}
