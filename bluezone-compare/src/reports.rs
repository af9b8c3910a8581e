use anyhow::Result;
use bluezone_analysis::{ComparisonResult, ComparisonSummary, ModeSide};
use colored::Colorize;
use std::io::Write;

pub const CSV_HEADER: [&str; 10] = [
    "metric",
    "adaptive_mean",
    "adaptive_std",
    "adaptive_count",
    "adaptive_total",
    "random_mean",
    "random_std",
    "random_count",
    "random_total",
    "diff_mean",
];

pub fn generate_json_report<W: Write>(writer: &mut W, summary: &ComparisonSummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// One row per metric in name order. The header is written even when there are no metrics.
pub fn generate_csv_report<W: Write>(writer: W, comparison: &ComparisonResult) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;
    for (name, metric) in &comparison.per_metric {
        let mut row = vec![name.clone()];
        row.extend(side_cells(&metric.adaptive));
        row.extend(side_cells(&metric.random));
        row.push(cell(metric.diff));
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

fn side_cells(side: &ModeSide) -> [String; 4] {
    [
        cell(side.mean),
        cell(side.std),
        side.count.map(|c| c.to_string()).unwrap_or_default(),
        side.total.to_string(),
    ]
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

pub fn generate_console_report<W: Write>(
    writer: &mut W,
    summary: &ComparisonSummary,
) -> Result<()> {
    let comparison = &summary.comparison;
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Adaptive vs Random Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;
    writeln!(
        writer,
        "Runs compared: {} adaptive, {} random",
        summary.adaptive_runs.len().to_string().green(),
        summary.random_runs.len().to_string().green()
    )?;
    writeln!(writer)?;

    if comparison.per_metric.is_empty() {
        writeln!(writer, "No metrics found in the selected runs.")?;
    } else {
        writeln!(
            writer,
            "{:<24} {:>22} {:>22} {:>10}",
            "metric", "adaptive (mean ± std)", "random (mean ± std)", "diff"
        )?;
        for (name, metric) in &comparison.per_metric {
            let diff = match metric.diff {
                Some(d) if d > 0.0 => format!("{d:+.4}").yellow(),
                Some(d) => format!("{d:+.4}").normal(),
                None => "n/a".dimmed(),
            };
            writeln!(
                writer,
                "{:<24} {:>22} {:>22} {:>10}",
                name,
                side_summary(&metric.adaptive),
                side_summary(&metric.random),
                diff
            )?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "{}", "⚖️  Derived Metrics".bright_yellow().bold())?;
    writeln!(writer, "{}", "==================".yellow())?;
    writeln!(
        writer,
        "Fairness improvement: {}",
        fmt_stat(comparison.derived.fairness_improvement)
    )?;
    writeln!(
        writer,
        "Stability gain: {}",
        fmt_stat(comparison.derived.stability_gain)
    )?;
    Ok(())
}

fn side_summary(side: &ModeSide) -> String {
    match (side.mean, side.std) {
        (Some(mean), Some(std)) => format!("{mean:.4} ± {std:.4}"),
        _ => match side.count {
            Some(count) => format!("n/a ({count}/{})", side.total),
            None => "absent".to_string(),
        },
    }
}
