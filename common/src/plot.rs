use core::fmt::Debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Context, ContextCompat, Result};
use itertools::Itertools;
use plotters::prelude::*;
use tracing::{debug, error, warn};

use crate::{
    config::Settings,
    result::BenchmarkRecord,
    util::{discrete_bounds, log_bounds},
};

pub const COMPARISON_FILENAME: &str = "performance_comparison_loglog.svg";
pub const SCALABILITY_FILENAME: &str = "std_thread_scalability.svg";
const CPU_TIME_LABEL: &str = "CPU Time (nanoseconds)";

#[derive(Debug, Clone, PartialEq)]
pub enum PlotOutcome {
    Written(PathBuf),
    /// Nothing to draw, with the reason
    Skipped(String),
    Failed(String),
}

pub trait Plot: Debug {
    /// Name used in console messages
    fn name(&self) -> &'static str;
    /// Draws the plot into `plot_dir`
    ///
    /// Arguments:
    /// * `records` - Loaded measurement rows, all with an input size
    /// * `plot_dir` - Output directory, already created
    /// * `settings` - Run settings, for the threaded variant and image sizes
    fn plot(
        &self,
        records: &[BenchmarkRecord],
        plot_dir: &Path,
        settings: &Settings,
    ) -> Result<PlotOutcome>;
}

/// One line of a chart: points sorted by x
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(u64, f64)>,
}

impl Series {
    fn from_records<'a, I, F>(label: String, records: I, x: F) -> Self
    where
        I: IntoIterator<Item = &'a BenchmarkRecord>,
        F: Fn(&BenchmarkRecord) -> Option<u64>,
    {
        let mut points = records
            .into_iter()
            .filter_map(|r| Some((x(r)?, r.cpu_time_ns())))
            .collect::<Vec<_>>();
        points.sort_by_key(|p| p.0);
        Self { label, points }
    }
}

/// The threaded variant gets one line per thread count when thread counts
/// are known, every other variant a single line over input size.
pub fn comparison_series(records: &[BenchmarkRecord], threaded_variant: &str) -> Vec<Series> {
    let variants = records.iter().map(|r| r.variant.as_str()).unique();
    let mut series = Vec::new();
    for variant in variants {
        let rows = records.iter().filter(|r| r.variant == variant).collect::<Vec<_>>();
        let is_threaded = !threaded_variant.is_empty() && variant == threaded_variant;
        let thread_counts = rows
            .iter()
            .filter_map(|r| r.threads)
            .sorted_unstable()
            .dedup()
            .collect::<Vec<_>>();

        if is_threaded && !thread_counts.is_empty() {
            for threads in thread_counts {
                series.push(Series::from_records(
                    format!("{variant} ({threads} thr)"),
                    rows.iter().copied().filter(|r| r.threads == Some(threads)),
                    |r| r.size,
                ));
            }
        } else {
            series.push(Series::from_records(variant.to_owned(), rows, |r| r.size));
        }
    }
    series
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingSeries {
    pub variant: String,
    /// Largest input size seen for the variant
    pub size: u64,
    pub series: Series,
}

/// Cpu time over thread count for the threaded variant at its largest input size.
///
/// `None` when the variant is absent or has no thread counts at that size.
pub fn scalability_series(
    records: &[BenchmarkRecord],
    threaded_variant: &str,
) -> Option<ScalingSeries> {
    if threaded_variant.is_empty() {
        return None;
    }
    let rows = records
        .iter()
        .filter(|r| r.variant == threaded_variant)
        .collect::<Vec<_>>();
    let size = rows.iter().filter_map(|r| r.size).max()?;
    let series = Series::from_records(
        threaded_variant.to_owned(),
        rows.into_iter().filter(|r| r.size == Some(size)),
        |r| r.threads,
    );
    if series.points.is_empty() {
        return None;
    }
    Some(ScalingSeries {
        variant: threaded_variant.to_owned(),
        size,
        series,
    })
}

#[derive(Debug, Default, Clone)]
pub struct ComparisonPlot;

impl Plot for ComparisonPlot {
    fn name(&self) -> &'static str {
        "performance comparison"
    }

    fn plot(
        &self,
        records: &[BenchmarkRecord],
        plot_dir: &Path,
        settings: &Settings,
    ) -> Result<PlotOutcome> {
        let series = comparison_series(records, &settings.threaded_variant);
        let x_range = log_bounds(
            series.iter().flat_map(|s| s.points.iter().map(|p| p.0 as f64)),
            1.5,
        );
        let y_range = log_bounds(
            series.iter().flat_map(|s| s.points.iter().map(|p| p.1)),
            1.5,
        );
        let (Some(x_range), Some(y_range)) = (x_range, y_range) else {
            return Ok(PlotOutcome::Skipped(
                "no positive input sizes or cpu times to draw on log axes".to_owned(),
            ));
        };
        debug!("Comparison plot with {} series", series.len());

        let filepath = plot_dir.join(COMPARISON_FILENAME);
        let root = SVGBackend::new(&filepath, settings.comparison_size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Bitonic Sort Performance Comparison",
                ("sans-serif", 28).into_font(),
            )
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range.log_scale().base(2.0), y_range.log_scale())?;
        chart
            .configure_mesh()
            .x_desc("Input Size (N)")
            .y_desc(CPU_TIME_LABEL)
            .x_label_formatter(&|x| format!("{}", x.round() as u64))
            .y_label_formatter(&|y| format!("{y:.0e}"))
            .draw()?;

        for (i, s) in series.iter().enumerate() {
            let points = s
                .points
                .iter()
                .filter(|(x, y)| *x > 0 && *y > 0.0)
                .map(|&(x, y)| (x as f64, y))
                .collect::<Vec<_>>();
            let color = Palette99::pick(i).mix(1.0);
            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
                .label(s.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.filled())))?;
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        root.present()
            .with_context(|| format!("Write {}", filepath.display()))?;

        Ok(PlotOutcome::Written(filepath.clone()))
    }
}

#[derive(Debug, Default, Clone)]
pub struct ScalabilityPlot;

impl Plot for ScalabilityPlot {
    fn name(&self) -> &'static str {
        "scalability"
    }

    fn plot(
        &self,
        records: &[BenchmarkRecord],
        plot_dir: &Path,
        settings: &Settings,
    ) -> Result<PlotOutcome> {
        let variant = &settings.threaded_variant;
        if !records.iter().any(|r| !variant.is_empty() && r.variant == *variant) {
            return Ok(PlotOutcome::Skipped(format!(
                "{variant} sorter not found in data"
            )));
        }
        let Some(scaling) = scalability_series(records, variant) else {
            return Ok(PlotOutcome::Skipped(format!(
                "{variant} rows at the largest input size carry no thread counts"
            )));
        };

        let x_range = discrete_bounds(scaling.series.points.iter().map(|p| p.0))
            .context("Scalability series without points")?;
        let y_max = scaling
            .series
            .points
            .iter()
            .map(|p| p.1)
            .fold(0.0, f64::max);
        let y_range = 0.0..if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let filepath = plot_dir.join(SCALABILITY_FILENAME);
        let root = SVGBackend::new(&filepath, settings.scalability_size).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} Scalability (N={})", scaling.variant, scaling.size),
                ("sans-serif", 28).into_font(),
            )
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(90)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .x_desc("Number of Threads")
            .y_desc(CPU_TIME_LABEL)
            .y_label_formatter(&|y| format!("{y:.2e}"))
            .draw()?;

        let color = Palette99::pick(0).mix(1.0);
        chart.draw_series(LineSeries::new(
            scaling.series.points.clone(),
            color.stroke_width(2),
        ))?;
        chart.draw_series(
            scaling
                .series
                .points
                .iter()
                .map(|p| Circle::new(*p, 3, color.filled())),
        )?;
        root.present()
            .with_context(|| format!("Write {}", filepath.display()))?;

        Ok(PlotOutcome::Written(filepath.clone()))
    }
}

pub fn default_plots() -> Vec<Box<dyn Plot>> {
    vec![Box::new(ComparisonPlot), Box::new(ScalabilityPlot)]
}

pub fn ensure_plot_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("Create plot dir {}", dir.display()))?;
    }
    Ok(())
}

/// Runs every plot in turn; one failing plot does not stop the rest
pub fn render_plots(
    plots: &[Box<dyn Plot>],
    records: &[BenchmarkRecord],
    settings: &Settings,
) -> Result<Vec<PlotOutcome>> {
    if plots.is_empty() {
        debug!("No plots");
        return Ok(Vec::new());
    }
    ensure_plot_dir(&settings.output_dir)?;

    let mut outcomes = Vec::with_capacity(plots.len());
    for plot in plots {
        let outcome = match plot.plot(records, &settings.output_dir, settings) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Error generating {} plot: {err:#}", plot.name());
                PlotOutcome::Failed(format!("{err:#}"))
            }
        };
        match &outcome {
            PlotOutcome::Written(path) => {
                println!("Saved {} plot to {}", plot.name(), path.display())
            }
            PlotOutcome::Skipped(reason) => warn!("Skipping {} plot: {reason}", plot.name()),
            PlotOutcome::Failed(_) => {}
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
