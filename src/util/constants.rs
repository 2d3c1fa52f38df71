// Rollbook - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Rollbook";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "Rollbook";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Ingestion limits
// =============================================================================

/// Default include glob patterns for record files in an upload directory.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.csv", "*.json"];

/// Maximum number of record files merged from a single directory.
pub const DEFAULT_MAX_FILES: usize = 200;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 5_000;

/// Maximum size of a single record file in bytes. Larger files are skipped
/// with a warning rather than read into memory.
pub const MAX_RECORD_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

// =============================================================================
// Dates
// =============================================================================

/// Spreadsheet serial-date epoch (serial 0). Serial 1 is 1899-12-31, which
/// absorbs the historical 1900 leap-year bug for all dates after March 1900.
pub const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

// =============================================================================
// Export
// =============================================================================

/// Title used when no more specific export title applies.
pub const DEFAULT_EXPORT_TITLE: &str = "Filtered_Students";

/// Extension appended to export titles to form the artifact file name.
pub const EXPORT_EXTENSION: &str = "csv";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default export subdirectory under the platform data directory.
pub const EXPORTS_DIR_NAME: &str = "exports";
