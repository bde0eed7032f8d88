//! # Format Primitives
//!
//! Fixed constants of the interchange log and of the legacy project defaults.
//!
//! These are compiled into the binary. Anything a site may reasonably change
//! (layer, coordinate system, user name) has a default here and an override
//! in `ExportSettings`.

/// Number of fixed-point units per coordinate unit.
///
/// Positions are held and written as signed 64-bit integers at 10⁻⁶ units.
pub const COORDINATE_SCALE: i64 = 1_000_000;

/// Multiplier from radians to decimal degrees.
pub const RADIANS_TO_DEGREES: f64 = 180.0 / std::f64::consts::PI;

/// Smallest seconds value that survives three-decimal formatting.
///
/// Seconds below this are dropped from angle strings; seconds within this
/// distance of 60 roll over into the next minute.
pub const SECONDS_EPSILON: f64 = 0.001;

/// Indentation unit of the text log.
pub const INDENT: char = '\t';

/// Separator of simple id arrays (`Delete=4;9;12`).
pub const ID_LIST_SEPARATOR: &str = ";";

/// Timestamp layout of `When` fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// PROJECT DEFAULTS
// =============================================================================

/// Survey layer of new projects.
pub const DEFAULT_LAYER_ID: i32 = 10;

/// Coordinate system of new projects (UTM zone 14 on NAD83).
pub const DEFAULT_COORDINATE_SYSTEM: &str = "UTM83-14";

/// User recorded against the project and the prologue session.
pub const DEFAULT_USER_NAME: &str = "CEdit";

/// Table id used for row text whose table has no mapping.
pub const DEFAULT_TABLE_ID: u32 = 123;

// =============================================================================
// OUTPUT LAYOUT
// =============================================================================

/// Directory under the export root holding one marker file per map.
pub const INDEX_DIR: &str = "index";

/// Extension of log and marker files.
pub const LOG_EXTENSION: &str = "txt";

// =============================================================================
// SNAPSHOT FORMAT
// =============================================================================

/// Magic bytes of binary source model snapshots.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"CEDX";

/// Current binary snapshot version.
///
/// Increment this when making breaking changes to the source model layout.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Maximum accepted snapshot size (500 MB).
///
/// Checked before decoding so a corrupt length cannot force a huge allocation.
pub const MAX_SNAPSHOT_SIZE: usize = 500 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radians_to_degrees_is_a_half_turn_per_pi() {
        let half_turn = std::f64::consts::PI * RADIANS_TO_DEGREES;
        assert!((half_turn - 180.0).abs() < 1e-9);
    }

    #[test]
    fn coordinate_scale_is_micro_units() {
        assert_eq!(COORDINATE_SCALE, 10_i64.pow(6));
    }

    #[test]
    fn snapshot_magic_is_four_ascii_bytes() {
        assert!(SNAPSHOT_MAGIC.iter().all(u8::is_ascii_uppercase));
    }
}
