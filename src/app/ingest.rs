// Rollbook - app/ingest.rs
//
// Ingestion collaborator: turns record files on disk into a RecordSet.
//
// Supported inputs:
//   - .csv  : header row gives the keys; cells are typed (empty / number / text)
//   - .json : array of flat objects (the "records" orientation spreadsheet
//             tools emit); key order is preserved
//
// A directory is treated as an upload folder: every matching file directly
// inside it is loaded in file-name order and the results concatenated.
// Unreadable files inside a directory are non-fatal and reported as
// warnings; an explicitly named file that fails is an error.

use crate::core::model::{CellValue, Record, RecordSet};
use crate::util::constants;
use crate::util::error::IngestError;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

/// Configuration for loading record files.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Glob patterns (file name only) a file inside a directory must match.
    pub include_patterns: Vec<String>,

    /// Maximum number of files merged from one directory.
    pub max_files: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_files: constants::DEFAULT_MAX_FILES,
        }
    }
}

/// Outcome of loading one or more paths.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub records: RecordSet,
    /// Files that contributed records, in load order.
    pub files: Vec<PathBuf>,
    /// Non-fatal problems (skipped files, truncation).
    pub warnings: Vec<String>,
}

// =============================================================================
// Entry points
// =============================================================================

/// Load a mix of files and directories, concatenating in argument order.
pub fn load_paths(paths: &[PathBuf], config: &IngestConfig) -> Result<IngestOutcome, IngestError> {
    let mut outcome = IngestOutcome::default();

    for path in paths {
        if path.is_dir() {
            let sub = load_directory(path, config)?;
            outcome.records.extend(sub.records);
            outcome.files.extend(sub.files);
            outcome.warnings.extend(sub.warnings);
        } else {
            let records = load_file(path)?;
            outcome.records.extend(records);
            outcome.files.push(path.clone());
        }
    }

    tracing::info!(
        files = outcome.files.len(),
        records = outcome.records.len(),
        warnings = outcome.warnings.len(),
        "Ingest complete"
    );
    Ok(outcome)
}

/// Load every matching file directly inside `dir`.
pub fn load_directory(dir: &Path, config: &IngestConfig) -> Result<IngestOutcome, IngestError> {
    if !dir.exists() {
        return Err(IngestError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let include_pats = compile_patterns(&config.include_patterns);
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);

    let mut candidates: Vec<PathBuf> = Vec::new();
    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    let mut outcome = IngestOutcome::default();

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                // The directory itself being unreadable is fatal.
                if e.depth() == 0 {
                    return Err(IngestError::Traversal {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                }
                let msg = format!("Cannot access entry in '{}': {e}", dir.display());
                tracing::debug!(warning = %msg, "Ingest warning");
                outcome.warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            outcome.warnings.push(format!(
                "Skipping '{}': non-UTF-8 filename",
                entry.path().display()
            ));
            continue;
        };

        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        candidates.push(entry.into_path());
    }

    if candidates.len() > max_files {
        outcome.warnings.push(format!(
            "{} record files found in '{}' but the limit is {max_files}; \
             only the first {max_files} (by name) were loaded.",
            candidates.len(),
            dir.display()
        ));
        candidates.truncate(max_files);
    }

    for path in candidates {
        match load_file(&path) {
            Ok(records) => {
                tracing::debug!(file = %path.display(), records = records.len(), "File loaded");
                outcome.records.extend(records);
                outcome.files.push(path);
            }
            Err(e) => {
                let msg = format!("Skipped '{}': {e}", path.display());
                tracing::warn!(warning = %msg, "Record file skipped");
                outcome.warnings.push(msg);
            }
        }
    }

    Ok(outcome)
}

/// Load a single record file, dispatching on its extension.
pub fn load_file(path: &Path) -> Result<RecordSet, IngestError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IngestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => IngestError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    if metadata.len() > constants::MAX_RECORD_FILE_SIZE {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_RECORD_FILE_SIZE,
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = std::fs::read(path).map_err(|e| IngestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    match extension.as_str() {
        "csv" => parse_csv(&String::from_utf8_lossy(strip_bom(&bytes)), path),
        "json" => parse_json(strip_bom(&bytes), path),
        other => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.to_string(),
        }),
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Parse CSV text. `origin` is only used for error context.
pub fn parse_csv(content: &str, origin: &Path) -> Result<RecordSet, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Csv {
            path: origin.to_path_buf(),
            source: e,
        })?
        .clone();
    let keys = dedupe_headers(headers.iter());

    let mut records = RecordSet::new();
    for result in reader.records() {
        let row = result.map_err(|e| IngestError::Csv {
            path: origin.to_path_buf(),
            source: e,
        })?;

        // Blank lines between rows carry no data.
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let record: Record = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), row.get(i).map(infer_cell).unwrap_or_default()))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Repeated header names get `.1`, `.2`, ... suffixes so no column is lost.
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for header in headers {
        let mut key = header.to_string();
        let mut n = 1;
        while keys.contains(&key) {
            key = format!("{header}.{n}");
            n += 1;
        }
        keys.push(key);
    }
    keys
}

/// Type a raw CSV cell the way spreadsheet readers do: blank cells are
/// empty, plain decimal numbers become numbers, everything else is text.
///
/// A cell only becomes a number when it renders back to exactly the same
/// text, so identifiers such as "0501", "21E05" or "+919876543210" keep
/// their written form through search and export.
fn infer_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if looks_numeric(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            let cell = CellValue::Number(n);
            if cell.render() == trimmed {
                return cell;
            }
        }
    }
    CellValue::Text(raw.to_string())
}

/// Optional `-`, digits, optional `.` and digits. No exponent, no `+`,
/// no leading zero on a multi-digit integer part.
fn looks_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.map_or(true, all_digits) {
        return false;
    }
    // "0501" is an identifier, "0.5" and "0" are numbers.
    !(int.len() > 1 && int.starts_with('0'))
}

// =============================================================================
// JSON
// =============================================================================

/// Parse a JSON array of flat objects.
pub fn parse_json(bytes: &[u8], origin: &Path) -> Result<RecordSet, IngestError> {
    let root: JsonValue = serde_json::from_slice(bytes).map_err(|e| IngestError::Json {
        path: origin.to_path_buf(),
        source: e,
    })?;

    let rows = root.as_array().ok_or_else(|| IngestError::UnexpectedShape {
        path: origin.to_path_buf(),
        reason: "expected a top-level JSON array of records".to_string(),
    })?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<Record, IngestError> {
            let obj = row.as_object().ok_or_else(|| IngestError::UnexpectedShape {
                path: origin.to_path_buf(),
                reason: format!("record {i} is not a JSON object"),
            })?;
            Ok(obj
                .iter()
                .map(|(k, v)| (k.clone(), json_to_cell(v)))
                .collect::<Record>())
        })
        .collect()
}

fn json_to_cell(value: &JsonValue) -> CellValue {
    match value {
        JsonValue::Null => CellValue::Empty,
        JsonValue::String(s) => CellValue::text(s.clone()),
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Text(n.to_string()),
        },
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Compile glob patterns; patterns that fail to compile are logged and skipped.
fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, error = %e, "Invalid include pattern, skipping");
                None
            }
        })
        .collect()
}

/// Case-insensitive: upload folders mix `.CSV` and `.csv`.
fn is_included(file_name: &str, patterns: &[glob::Pattern]) -> bool {
    if patterns.is_empty() {
        return true;
    }
    let options = glob::MatchOptions {
        case_sensitive: false,
        ..Default::default()
    };
    patterns.iter().any(|p| p.matches_with(file_name, options))
}
