mod chart;
mod config;
mod output;
mod reports;

use anyhow::{Context, Result};
use bluezone_analysis::{
    ComparisonSummary, DEFAULT_RUN_LIMIT, LoadReport, build_comparison, load_runs_from_dir,
};
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use chart::{chart_bars, default_renderer};
use config::{CompareConfig, parse_run_limit};
use output::{ReportPaths, report_stamp};

#[derive(Debug, Parser)]
#[command(name = "bluezone-compare", version = "0.1.0")]
#[command(about = "Compare the latest adaptive and random Bluezone runs")]
struct Args {
    /// Directory containing run-*.json documents
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Most recent runs per mode to include (falls back to 10 when unusable)
    #[arg(long)]
    runs: Option<String>,

    /// Directory for the comparison reports (defaults to the results directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip rendering the metrics chart
    #[arg(long)]
    no_chart: bool,

    /// Print the runs selected for each mode
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let config = build_config(&args);
    let report = load_runs(&config)?;

    let summary = match build_comparison(&report.runs, config.run_limit) {
        Ok(summary) => summary,
        Err(err) => {
            if report.runs.is_empty() {
                eprintln!(
                    "⚠️  No runs found in {}. Run some simulations first.",
                    config.results_dir.display()
                );
            }
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    if config.verbose {
        print_selected_runs(&summary);
    }

    let paths = ReportPaths::new(&config.output_dir, &report_stamp(Utc::now()));
    let mut console = BufWriter::new(stdout().lock());
    write_reports(&config, &summary, &paths, &mut console)?;
    console.flush()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎯 Bluezone Run Comparison".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn build_config(args: &Args) -> CompareConfig {
    let run_limit = parse_run_limit(args.runs.as_deref()).unwrap_or_else(|| {
        if let Some(raw) = &args.runs {
            eprintln!(
                "⚠️  Ignoring unusable --runs value {}; using {DEFAULT_RUN_LIMIT}",
                raw.yellow()
            );
        }
        DEFAULT_RUN_LIMIT
    });
    CompareConfig {
        results_dir: args.results_dir.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| args.results_dir.clone()),
        run_limit,
        render_chart: !args.no_chart,
        verbose: args.verbose,
    }
}

fn load_runs(config: &CompareConfig) -> Result<LoadReport> {
    let report = load_runs_from_dir(&config.results_dir)
        .with_context(|| format!("failed to scan {}", config.results_dir.display()))?;
    for failure in &report.failures {
        eprintln!(
            "⚠️  Skipping {}: {}",
            failure.path.display().to_string().yellow(),
            failure.error
        );
    }
    log::info!(
        "loaded {} runs from {} ({} skipped)",
        report.runs.len(),
        config.results_dir.display(),
        report.failures.len()
    );
    Ok(report)
}

fn print_selected_runs(summary: &ComparisonSummary) {
    for (mode, runs) in [
        ("adaptive", &summary.adaptive_runs),
        ("random", &summary.random_runs),
    ] {
        println!("🧪 {} runs:", mode.bright_white());
        for run in runs {
            println!("   • {}", run.display());
        }
    }
}

/// Write the JSON and CSV reports, the optional chart, then the console summary.
fn write_reports<W: Write>(
    config: &CompareConfig,
    summary: &ComparisonSummary,
    paths: &ReportPaths,
    console: &mut W,
) -> Result<()> {
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create {}", config.output_dir.display()))?;

    let mut json = create_report_file(&paths.json)?;
    reports::generate_json_report(&mut json, summary)?;
    json.flush()?;

    let csv = create_report_file(&paths.csv)?;
    reports::generate_csv_report(csv, &summary.comparison)?;

    let chart = if config.render_chart {
        render_chart(summary, &paths.chart)
    } else {
        None
    };

    reports::generate_console_report(console, summary)?;
    writeln!(console)?;
    writeln!(console, "📄 Wrote comparison JSON: {}", paths.json.display())?;
    writeln!(console, "📄 Wrote comparison CSV: {}", paths.csv.display())?;
    if let Some(chart) = chart {
        writeln!(console, "📈 Wrote metrics chart: {}", chart.display())?;
    }
    Ok(())
}

fn create_report_file(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Draw the metrics chart. Any failure is logged and leaves the other reports untouched.
fn render_chart(summary: &ComparisonSummary, path: &Path) -> Option<PathBuf> {
    let Some(renderer) = default_renderer() else {
        log::warn!("chart rendering unavailable; rebuild with `--features charts` to enable it");
        return None;
    };
    match renderer.render(&chart_bars(&summary.comparison), path) {
        Ok(()) => Some(path.to_path_buf()),
        Err(err) => {
            log::warn!("chart rendering failed: {err:#}");
            None
        }
    }
}
