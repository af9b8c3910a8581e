use std::path::PathBuf;

/// Everything one comparison run needs, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    /// Directory holding the `run-*.json` documents.
    pub results_dir: PathBuf,
    /// Directory the JSON, CSV and chart reports are written to.
    pub output_dir: PathBuf,
    /// Most recent runs per mode to include.
    pub run_limit: usize,
    pub render_chart: bool,
    pub verbose: bool,
}

/// Parse the runs-per-mode window. Absent, non-numeric and zero values are
/// unusable and yield `None` so the caller can fall back to its default.
pub fn parse_run_limit(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .and_then(|text| text.parse::<usize>().ok())
        .filter(|limit| *limit > 0)
}
