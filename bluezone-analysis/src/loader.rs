//! Reading run documents from disk, with a narrow repair for decimal commas.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::LoadError;
use crate::record::{Provenance, RunRecord};

/// File name pattern the simulator uses for run documents.
pub const RUN_FILE_PATTERN: &str = "run-*.json";

/// A numeric object value written with a comma decimal separator, e.g. `: 3,14`.
static DECIMAL_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(:\s*)(-?\d+),(\d+)").expect("decimal comma pattern is valid"));

/// A parsed JSON document and whether the decimal-comma repair was needed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub value: Value,
    pub repaired: bool,
}

/// Rewrite `: 3,14` style values to `: 3.14`. Idempotent; borrows when nothing matches.
#[must_use]
pub fn repair_decimal_commas(text: &str) -> Cow<'_, str> {
    DECIMAL_COMMA.replace_all(text, "${1}${2}.${3}")
}

/// Parse a run document, retrying once after [`repair_decimal_commas`].
///
/// # Errors
///
/// Returns [`LoadError::Parse`] carrying the error of the strict parse when the
/// repaired text does not parse either.
pub fn parse_document(text: &str) -> Result<ParsedDocument, LoadError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(ParsedDocument {
            value,
            repaired: false,
        }),
        Err(original) => {
            let repaired = repair_decimal_commas(text);
            if matches!(repaired, Cow::Borrowed(_)) {
                return Err(LoadError::Parse { source: original });
            }
            serde_json::from_str::<Value>(&repaired)
                .map(|value| ParsedDocument {
                    value,
                    repaired: true,
                })
                .map_err(|_| LoadError::Parse { source: original })
        }
    }
}

/// Parse and decode one run document without provenance.
///
/// # Errors
///
/// Returns a parse error for invalid JSON and a shape error for JSON that is
/// not a run object.
pub fn parse_run(text: &str) -> Result<RunRecord, LoadError> {
    let parsed = parse_document(text)?;
    RunRecord::from_value(parsed.value)
}

/// Load a single run file and tag it with its path and last-modified time.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a run document.
pub fn load_run_file(path: &Path) -> Result<RunRecord, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = fs::read_to_string(path).map_err(io_error)?;
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(io_error)?;

    let parsed = parse_document(&text)?;
    if parsed.repaired {
        log::info!("Repaired decimal commas and loaded {}", path.display());
    }
    let record = RunRecord::from_value(parsed.value)?;
    Ok(record.with_provenance(Provenance::new(path, DateTime::<Utc>::from(modified))))
}

/// A document that could not be loaded. The batch continues without it.
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Outcome of loading a results directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub runs: Vec<RunRecord>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.failures.is_empty()
    }
}

/// Load every `run-*.json` document in `dir`, in path order.
///
/// Unreadable or malformed documents are logged and recorded in
/// [`LoadReport::failures`]; they never abort the batch. A missing directory
/// yields an empty report.
///
/// # Errors
///
/// Returns [`LoadError::Pattern`] only when the directory cannot be turned into
/// a search pattern.
pub fn load_runs_from_dir(dir: &Path) -> Result<LoadReport, LoadError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped)
        .join(RUN_FILE_PATTERN)
        .to_string_lossy()
        .into_owned();
    let entries = glob::glob(&pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut paths = Vec::new();
    let mut report = LoadReport::default();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(err) => {
                let path = err.path().to_path_buf();
                let error = LoadError::Io {
                    path: path.clone(),
                    source: err.into(),
                };
                log::warn!("failed to load {}: {error}", path.display());
                report.failures.push(LoadFailure { path, error });
            }
        }
    }
    paths.sort();

    for path in paths {
        match load_run_file(&path) {
            Ok(record) => report.runs.push(record),
            Err(error) => {
                log::warn!("failed to load {}: {error}", path.display());
                report.failures.push(LoadFailure { path, error });
            }
        }
    }

    Ok(report)
}
