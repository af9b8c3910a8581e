use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one run document into a [`RunRecord`](crate::RunRecord).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON, even after the decimal-comma repair.
    /// Carries the error from the first, unrepaired parse.
    #[error("invalid JSON: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },
    #[error("document is not a run record: {source}")]
    Shape {
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid results directory pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "need at least one {baseline} and one {candidate} run to compare; found modes: [{}]",
        .found.join(", ")
    )]
    MissingModes {
        baseline: String,
        candidate: String,
        found: Vec<String>,
    },
}
