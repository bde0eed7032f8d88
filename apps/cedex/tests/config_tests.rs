//! Tests for `cedex.toml` parsing and the settings derived from it.

use cedex::config::{CedexConfig, DEFAULT_EXPORT_ROOT};
use cedex_core::CedexError;
use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2009, 6, 30)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("time")
}

// =============================================================================
// PARSING
// =============================================================================

#[test]
fn empty_file_yields_defaults() {
    let config = CedexConfig::parse("").expect("parse");
    assert_eq!(config.export.root, PathBuf::from(DEFAULT_EXPORT_ROOT));
    assert_eq!(config.export.layer_id, 10);
    assert_eq!(config.export.coordinate_system, "UTM83-14");
    assert_eq!(config.export.user_name, "CEdit");
    assert_eq!(config.export.machine_name, None);
    assert!(config.mappings.entities.is_empty());
}

#[test]
fn full_file_is_parsed() {
    let text = r#"
[export]
root = "/srv/exports"
layer_id = 4
coordinate_system = "UTM83-15"
user_name = "migration"
machine_name = "SURVEY01"

[mappings]
entities = { "Parcel Boundary" = 12, "Road" = 7 }
id_groups = { "Lots" = 3 }
tables = { "Owners" = 4 }
"#;
    let config = CedexConfig::parse(text).expect("parse");
    assert_eq!(config.export.root, PathBuf::from("/srv/exports"));
    assert_eq!(config.export.layer_id, 4);
    assert_eq!(config.export.machine_name.as_deref(), Some("SURVEY01"));

    let mappings = config.mappings().expect("mappings");
    assert_eq!(mappings.entity("Parcel Boundary"), 12);
    assert_eq!(mappings.entity("Fence"), 0);
    assert_eq!(mappings.id_group("Lots"), 3);
    assert_eq!(mappings.table("Owners"), 4);
    assert_eq!(mappings.table("Zoning"), 123);
}

#[test]
fn unknown_keys_are_rejected() {
    let result = CedexConfig::parse("[export]\nroot = \"x\"\nport = 8080\n");
    assert!(matches!(result, Err(CedexError::SerializationError(_))));
}

#[test]
fn wrong_value_type_is_rejected() {
    let result = CedexConfig::parse("[export]\nlayer_id = \"ten\"\n");
    assert!(result.is_err());
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = CedexConfig::load(&dir.path().join("cedex.toml")).expect("load");
    assert_eq!(config, CedexConfig::default());
}

#[test]
fn legacy_mapping_files_are_merged_under_inline_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("EntityTranslation.txt"),
        "12=Parcel Boundary\n7=Road\n\nbroken line\n",
    )
    .expect("write mapping");
    let path = dir.path().join("cedex.toml");
    std::fs::write(
        &path,
        r#"
[mappings]
entities = { "Road" = 70 }

[mappings.files]
entities = "EntityTranslation.txt"
"#,
    )
    .expect("write config");

    let config = CedexConfig::load(&path).expect("load");
    let mappings = config.mappings().expect("mappings");
    assert_eq!(mappings.entity("Parcel Boundary"), 12);
    assert_eq!(mappings.entity("Road"), 70);
    assert_eq!(mappings.entities.len(), 2);
}

#[test]
fn missing_mapping_file_is_io_error() {
    let config = CedexConfig::parse("[mappings.files]\nfonts = \"/nonexistent/fonts.txt\"\n")
        .expect("parse");
    assert!(matches!(config.mappings(), Err(CedexError::IoError(_))));
}

// =============================================================================
// DERIVED SETTINGS
// =============================================================================

#[test]
fn settings_take_machine_from_file_before_host() {
    let config = CedexConfig::parse("[export]\nmachine_name = \"SURVEY01\"\n").expect("parse");
    let settings = config.settings("GUID", "riverside", created(), Some("laptop"));
    assert_eq!(settings.machine_name, "SURVEY01");
    assert_eq!(settings.project_name, "riverside");
    assert_eq!(settings.created, created());
}

#[test]
fn settings_fall_back_to_host_name() {
    let config = CedexConfig::default();
    let settings = config.settings("GUID", "riverside", created(), Some("laptop"));
    assert_eq!(settings.machine_name, "laptop");
    assert_eq!(settings.user_name, "CEdit");

    let anonymous = config.settings("GUID", "riverside", created(), None);
    assert_eq!(anonymous.machine_name, "");
}

#[test]
fn command_line_root_overrides_file() {
    let config = CedexConfig::parse("[export]\nroot = \"from-file\"\n").expect("parse");
    assert_eq!(config.root(None), PathBuf::from("from-file"));
    assert_eq!(
        config.root(Some(Path::new("from-flag"))),
        PathBuf::from("from-flag")
    );
}
