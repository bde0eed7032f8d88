//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{OutputMode, SnapshotFormat};
use crate::config::{CedexConfig, host_name};
use cedex_core::primitives::MAX_SNAPSHOT_SIZE;
use cedex_core::{
    CedexError, ExportDriver, ExportStats, ExportTarget, MemoryModel, SourceModel, atomic_write,
    model_from_bytes, model_to_bytes,
};
use std::path::{Path, PathBuf};

// =============================================================================
// INPUT VALIDATION
// =============================================================================

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: usize) -> Result<(), CedexError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CedexError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size as u64 {
        return Err(CedexError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Canonicalize an input path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, CedexError> {
    let canonical = path.canonicalize().map_err(|e| {
        CedexError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(CedexError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Read a source model snapshot.
pub fn load_model(input: &Path, format: SnapshotFormat) -> Result<MemoryModel, CedexError> {
    let path = validate_file_path(input)?;
    validate_file_size(&path, MAX_SNAPSHOT_SIZE)?;

    let data = std::fs::read(&path)
        .map_err(|e| CedexError::IoError(format!("Read file: {}", e)))?;

    match format {
        SnapshotFormat::Json => serde_json::from_slice(&data)
            .map_err(|e| CedexError::SerializationError(format!("Invalid JSON snapshot: {}", e))),
        SnapshotFormat::Binary => model_from_bytes(&data),
    }
}

/// Fresh project GUID, uppercase with dashes.
fn new_project_id() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn print_stats(stats: &ExportStats) {
    println!("Sessions:     {} written, {} skipped", stats.sessions_written, stats.sessions_skipped);
    println!("Edits:        {}", stats.edits);
    println!("Records:      {}", stats.records);
    println!("Extra points: {}", stats.synthesized_points);
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export a snapshot into the export root.
pub fn cmd_export(
    config: &CedexConfig,
    mode: OutputMode,
    input: &Path,
    format: SnapshotFormat,
    root: Option<&Path>,
) -> Result<(), CedexError> {
    let model = load_model(input, format)?;
    let target = ExportTarget::new(config.root(root));
    let map_name = model.map_name();

    // Refuse before anything else is read or generated.
    target.guard(map_name)?;

    tracing::info!(
        map = map_name,
        sessions = model.sessions().len(),
        edits = model.edit_count(),
        "Exporting"
    );

    let mappings = config.mappings()?;
    let created = chrono::Local::now().naive_local();
    let host = host_name();
    let settings = config.settings(
        &new_project_id(),
        map_name,
        created,
        host.as_deref(),
    );

    let outcome = target.export(&model, &mappings, &settings)?;
    let stats = outcome.log.stats;

    tracing::info!(
        project = %settings.project_id,
        last_id = outcome.log.last_id.value(),
        records = stats.records,
        synthesized = stats.synthesized_points,
        skipped_sessions = stats.sessions_skipped,
        "Export complete"
    );

    if mode.json {
        print_json(&serde_json::json!({
            "map": map_name,
            "project_id": settings.project_id,
            "log": outcome.log_path.to_string_lossy(),
            "marker": outcome.marker_path.to_string_lossy(),
            "last_id": outcome.log.last_id.value(),
            "stats": stats,
        }));
        return Ok(());
    }

    if !mode.quiet {
        println!("Exported {} as project {}", map_name, settings.project_id);
        println!("Log:          {}", outcome.log_path.display());
        println!("Marker:       {}", outcome.marker_path.display());
        print_stats(&stats);
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Run the export in memory and report what it would write.
pub fn cmd_check(
    config: &CedexConfig,
    mode: OutputMode,
    input: &Path,
    format: SnapshotFormat,
) -> Result<(), CedexError> {
    let model = load_model(input, format)?;
    let mappings = config.mappings()?;
    let settings = config.settings(
        &new_project_id(),
        model.map_name(),
        chrono::Local::now().naive_local(),
        host_name().as_deref(),
    );

    let log = ExportDriver::new(&model, &mappings, &settings).run()?;
    tracing::debug!(bytes = log.text.len(), "Dry run complete");

    if mode.json {
        print_json(&serde_json::json!({
            "map": model.map_name(),
            "last_id": log.last_id.value(),
            "file_stem": log.file_stem()?,
            "bytes": log.text.len(),
            "stats": log.stats,
        }));
        return Ok(());
    }

    if !mode.quiet {
        println!("Map {} exports cleanly", model.map_name());
        println!("Last id:      {}", log.last_id.value());
        println!("Log size:     {} bytes", log.text.len());
        print_stats(&log.stats);
    }

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Report whether a map carries an export marker.
pub fn cmd_status(
    config: &CedexConfig,
    mode: OutputMode,
    map: &str,
    root: Option<&Path>,
) -> Result<(), CedexError> {
    let target = ExportTarget::new(config.root(root));
    let project = target.exported_project(map)?;

    if mode.json {
        print_json(&serde_json::json!({
            "map": map,
            "root": target.root().to_string_lossy(),
            "exported": project.is_some(),
            "project_id": project,
        }));
        return Ok(());
    }

    match project {
        Some(guid) => println!("{} was exported as project {}", map, guid),
        None => println!("{} has not been exported", map),
    }

    Ok(())
}

// =============================================================================
// SNAPSHOT COMMAND
// =============================================================================

/// Convert a JSON snapshot into the binary format.
pub fn cmd_snapshot(mode: OutputMode, input: &Path, output: &Path) -> Result<(), CedexError> {
    let model = load_model(input, SnapshotFormat::Json)?;
    let data = model_to_bytes(&model)?;
    atomic_write(output, &data)?;

    tracing::info!(map = model.map_name(), bytes = data.len(), "Snapshot written");

    if mode.json {
        print_json(&serde_json::json!({
            "map": model.map_name(),
            "output": output.to_string_lossy(),
            "bytes": data.len(),
        }));
    } else if !mode.quiet {
        println!("Wrote {} bytes to {}", data.len(), output.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_id_is_uppercase_guid() {
        let id = new_project_id();
        assert_eq!(id.len(), 36);
        assert_eq!(id, id.to_uppercase());
        assert_eq!(id.matches('-').count(), 4);
    }

    #[test]
    fn binary_snapshot_round_trips_through_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json = dir.path().join("model.json");
        let bin = dir.path().join("model.bin");
        let model = MemoryModel::new("riverside.cedx");
        std::fs::write(&json, serde_json::to_vec(&model).expect("json")).expect("write");

        cmd_snapshot(OutputMode { quiet: true, json: false }, &json, &bin).expect("snapshot");

        let restored = load_model(&bin, SnapshotFormat::Binary).expect("load");
        assert_eq!(restored, model);
    }

    #[test]
    fn missing_input_is_io_error() {
        let result = load_model(Path::new("/nonexistent/model.json"), SnapshotFormat::Json);
        assert!(matches!(result, Err(CedexError::IoError(_))));
    }
}
