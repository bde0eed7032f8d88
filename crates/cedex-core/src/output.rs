//! # Output Target
//!
//! Where finished logs land, and the marker that stops a map from being
//! exported twice.
//!
//! Layout under the export root:
//!
//! ```text
//! <root>/index/<map>.txt          marker, holds the project GUID
//! <root>/<GUID>/<stem>.txt        the interchange log
//! ```
//!
//! The marker is checked before any id is allocated. Both files are written
//! through [`atomic_write`], the log first, so a crash never leaves a marker
//! pointing at a missing log.

use crate::driver::{ExportDriver, ExportLog};
use crate::mappings::{ExportSettings, Mappings};
use crate::primitives::{INDEX_DIR, LOG_EXTENSION};
use crate::source::SourceModel;
use crate::CedexError;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

fn io_error(path: &Path, e: &std::io::Error) -> CedexError {
    CedexError::IoError(format!("{}: {}", path.display(), e))
}

/// Write `content` to `path` atomically.
///
/// The bytes go to a sibling temp file which is synced and then renamed over
/// the target. Missing parent directories are created.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), CedexError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    {
        let file = File::create(&temp_path).map_err(|e| io_error(&temp_path, &e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content)
            .and_then(|()| writer.flush())
            .and_then(|()| writer.get_ref().sync_all())
            .map_err(|e| io_error(&temp_path, &e))?;
    }

    fs::rename(&temp_path, path).map_err(|e| io_error(path, &e))
}

/// Files written by a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub log: ExportLog,
    pub log_path: PathBuf,
    pub marker_path: PathBuf,
}

/// An export root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    root: PathBuf,
}

impl ExportTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Marker file of `map_name`. Only the final path component of the map
    /// name is used.
    pub fn marker_path(&self, map_name: &str) -> Result<PathBuf, CedexError> {
        let file = Path::new(map_name).file_name().ok_or_else(|| {
            CedexError::InvalidSource(format!("map name '{map_name}' has no file name"))
        })?;
        let mut name = file.to_owned();
        name.push(".");
        name.push(LOG_EXTENSION);
        Ok(self.root.join(INDEX_DIR).join(name))
    }

    /// Log file of a project.
    #[must_use]
    pub fn log_path(&self, project_id: &str, stem: &str) -> PathBuf {
        self.root
            .join(project_id)
            .join(format!("{stem}.{LOG_EXTENSION}"))
    }

    /// Project GUID recorded by an earlier export of `map_name`, if any.
    pub fn exported_project(&self, map_name: &str) -> Result<Option<String>, CedexError> {
        let path = self.marker_path(map_name)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, &e)),
        }
    }

    /// Refuse a map that already has a marker.
    pub fn guard(&self, map_name: &str) -> Result<(), CedexError> {
        if self.marker_path(map_name)?.exists() {
            return Err(CedexError::AlreadyExported(map_name.to_string()));
        }
        Ok(())
    }

    /// Export `model` into this root.
    ///
    /// Nothing is allocated or written when the map is already marked.
    pub fn export<M: SourceModel + ?Sized>(
        &self,
        model: &M,
        mappings: &Mappings,
        settings: &ExportSettings,
    ) -> Result<ExportOutcome, CedexError> {
        let map_name = model.map_name();
        self.guard(map_name)?;

        let log = ExportDriver::new(model, mappings, settings).run()?;

        let log_path = self.log_path(&settings.project_id, &log.file_stem()?);
        atomic_write(&log_path, log.text.as_bytes())?;

        let marker_path = self.marker_path(map_name)?;
        atomic_write(&marker_path, settings.project_id.as_bytes())?;

        Ok(ExportOutcome {
            log,
            log_path,
            marker_path,
        })
    }
}
