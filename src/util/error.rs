// Rollbook - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Missing fields and unparseable values are NOT errors anywhere in the
// core; these types cover the edges only (ingest, user expressions,
// export, configuration).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all Rollbook operations.
#[derive(Debug)]
pub enum RollbookError {
    /// Reading records from a file or directory failed.
    Ingest(IngestError),

    /// A user-supplied filter expression was rejected.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for RollbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingest(e) => write!(f, "Ingest error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for RollbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ingest(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors raised while turning record files into a `RecordSet`.
#[derive(Debug)]
pub enum IngestError {
    /// The path does not exist.
    NotFound { path: PathBuf },

    /// The file extension is not one of the supported record formats.
    UnsupportedFormat { path: PathBuf, extension: String },

    /// File exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// CSV decoding failed.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON decoding failed.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// JSON parsed but is not an array of objects.
    UnexpectedShape { path: PathBuf, reason: String },

    /// Directory traversal error.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// I/O error reading a record file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "'{}' does not exist", path.display()),
            Self::UnsupportedFormat { path, extension } => write!(
                f,
                "'{}': unsupported format '.{extension}' (expected .csv or .json)",
                path.display()
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Csv { path, source } => {
                write!(f, "'{}': CSV decode error: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "'{}': JSON decode error: {source}", path.display())
            }
            Self::UnexpectedShape { path, reason } => {
                write!(f, "'{}': {reason}", path.display())
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Traversal { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IngestError> for RollbookError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to user-supplied filter input.
#[derive(Debug)]
pub enum FilterError {
    /// CGPA expression is not `N`, `=N`, `>N` or `<N`.
    InvalidCgpa { expression: String },

    /// Quick filter name is not one of the known categories.
    UnknownQuickFilter { name: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCgpa { expression } => write!(
                f,
                "Invalid CGPA expression '{expression}'. Expected a number, \
                 optionally prefixed with '=', '>' or '<'"
            ),
            Self::UnknownQuickFilter { name } => write!(
                f,
                "Unknown quick filter '{name}'. Expected one of: male, female, \
                 distinction, first, second, third, distWithFirst, year1-year4"
            ),
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for RollbookError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// The record set to export is empty; no artifact is produced.
    NoData,

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// I/O error writing the export artifact.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoData => write!(f, "No data to export"),
            Self::Csv { source } => write!(f, "CSV serialisation error: {source}"),
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for RollbookError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for RollbookError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for Rollbook results.
pub type Result<T> = std::result::Result<T, RollbookError>;
