//! Optional grouped bar chart of selected metrics.
//!
//! Rendering lives behind the `charts` feature. Without it no renderer is
//! available and callers skip the chart with a warning.

use anyhow::Result;
use bluezone_analysis::ComparisonResult;
use bluezone_analysis::metrics::{
    AVG_DISTANCE_TO_CENTER, AVG_KILLS, ELIMINATIONS_PER_ROUND, KILL_VARIANCE, WINNER_KILLS,
};
use std::path::Path;

/// Metrics drawn on the chart, in bar order.
pub const CHART_METRICS: &[&str] = &[
    AVG_DISTANCE_TO_CENTER,
    AVG_KILLS,
    KILL_VARIANCE,
    WINNER_KILLS,
    ELIMINATIONS_PER_ROUND,
];

/// Plot values for one metric. Absent statistics plot as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub metric: String,
    pub adaptive: f64,
    pub adaptive_std: f64,
    pub random: f64,
    pub random_std: f64,
}

pub fn chart_bars(comparison: &ComparisonResult) -> Vec<ChartBar> {
    CHART_METRICS
        .iter()
        .map(|&name| {
            let metric = comparison.metric(name);
            let stat = |pick: fn(&bluezone_analysis::MetricComparison) -> Option<f64>| {
                metric.and_then(pick).unwrap_or(0.0)
            };
            ChartBar {
                metric: name.to_string(),
                adaptive: stat(|m| m.adaptive.mean),
                adaptive_std: stat(|m| m.adaptive.std),
                random: stat(|m| m.random.mean),
                random_std: stat(|m| m.random.std),
            }
        })
        .collect()
}

pub trait ChartRenderer {
    /// Draw `bars` to an image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart cannot be drawn or written.
    fn render(&self, bars: &[ChartBar], path: &Path) -> Result<()>;
}

/// The renderer compiled into this build, if any.
pub fn default_renderer() -> Option<Box<dyn ChartRenderer>> {
    #[cfg(feature = "charts")]
    {
        Some(Box::new(bitmap::BitmapChartRenderer::default()))
    }
    #[cfg(not(feature = "charts"))]
    {
        None
    }
}

#[cfg(feature = "charts")]
mod bitmap {
    use super::{ChartBar, ChartRenderer};
    use anyhow::{Result, ensure};
    use bluezone_analysis::numbers::count_to_f64;
    use plotters::prelude::*;
    use std::path::Path;

    #[derive(Debug, Clone, Copy)]
    pub struct BitmapChartRenderer {
        pub size: (u32, u32),
    }

    impl Default for BitmapChartRenderer {
        fn default() -> Self {
            Self { size: (1000, 500) }
        }
    }

    impl ChartRenderer for BitmapChartRenderer {
        fn render(&self, bars: &[ChartBar], path: &Path) -> Result<()> {
            ensure!(!bars.is_empty(), "no metrics to chart");
            let slots = count_to_f64(bars.len());
            let top = bars
                .iter()
                .map(|b| (b.adaptive + b.adaptive_std).max(b.random + b.random_std))
                .fold(0.0_f64, f64::max);
            let bottom = bars
                .iter()
                .map(|b| (b.adaptive - b.adaptive_std).min(b.random - b.random_std))
                .fold(0.0_f64, f64::min);
            let top = if top > bottom { top * 1.1 } else { 1.0 };

            let root = BitMapBackend::new(path, self.size).into_drawing_area();
            root.fill(&WHITE)?;
            let mut chart = ChartBuilder::on(&root)
                .caption("Adaptive vs Random: selected metrics", ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(60)
                .build_cartesian_2d(0.0..slots, bottom..top)?;

            let labels: Vec<&str> = bars.iter().map(|b| b.metric.as_str()).collect();
            let label_at = |x: &f64| {
                let slot = x - 0.5;
                if slot >= 0.0 && (slot - slot.round()).abs() < 1e-6 {
                    labels
                        .iter()
                        .enumerate()
                        .find(|(idx, _)| (count_to_f64(*idx) - slot).abs() < 1e-6)
                        .map(|(_, label)| (*label).to_string())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            };
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(bars.len() * 2 + 1)
                .x_label_formatter(&label_at)
                .y_desc("Value")
                .draw()?;

            let series = [(0.1, BLUE, "adaptive"), (0.5, RED, "random")];
            for (offset, color, label) in series {
                let is_adaptive = label == "adaptive";
                let points: Vec<(f64, f64, f64)> = bars
                    .iter()
                    .enumerate()
                    .map(|(idx, bar)| {
                        let x = count_to_f64(idx) + offset;
                        if is_adaptive {
                            (x, bar.adaptive, bar.adaptive_std)
                        } else {
                            (x, bar.random, bar.random_std)
                        }
                    })
                    .collect();

                chart
                    .draw_series(points.iter().map(|&(x, value, _)| {
                        Rectangle::new([(x, 0.0), (x + 0.4, value)], color.filled())
                    }))?
                    .label(label)
                    .legend(move |(lx, ly)| {
                        Rectangle::new([(lx, ly - 5), (lx + 10, ly + 5)], color.filled())
                    });
                chart.draw_series(points.iter().map(|&(x, value, std)| {
                    PathElement::new(
                        vec![(x + 0.2, value - std), (x + 0.2, value + std)],
                        BLACK.stroke_width(2),
                    )
                }))?;
            }

            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()?;
            root.present()?;
            Ok(())
        }
    }
}
