//! Default run: fault sweep, console listing, and the committee-size plot.

use miette::{IntoDiagnostic, WrapErr};
use quorate_plot::Chart;
use quorate_prob::{run_sweep, FaultSweep, SweepReport, DEFAULT_THRESHOLDS};
use tracing::info;

use crate::cli::SweepArgs;
use crate::commands::write_json_artifact;

pub(crate) const X_LABEL: &str = "Number of nodes";
pub(crate) const Y_LABEL: &str = "Committee size";

pub(crate) fn run_sweep_command(args: &SweepArgs) -> miette::Result<()> {
    let sweep = FaultSweep::new(args.start, args.step, args.end).into_diagnostic()?;
    let thresholds: Vec<f64> = if args.thresholds.is_empty() {
        DEFAULT_THRESHOLDS.to_vec()
    } else {
        args.thresholds.clone()
    };

    let report = run_sweep(&sweep, &thresholds, args.precision)
        .into_diagnostic()
        .wrap_err("committee-size sweep failed")?;

    if let Some(series) = report.lowest_confidence() {
        println!("{}", render_sizes(&series.sizes));
    }

    if let Some(path) = &args.json_report {
        write_json_artifact(path, &report)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "sweep report written");
    }

    build_chart(&report, args.width, args.height)?
        .save_jpeg(&args.output)
        .into_diagnostic()
        .wrap_err("failed to render committee-size plot")?;
    Ok(())
}

/// Bracketed, comma-separated listing, e.g. `[3, 13, 23]`.
pub(crate) fn render_sizes(sizes: &[u64]) -> String {
    let items: Vec<String> = sizes.iter().map(u64::to_string).collect();
    format!("[{}]", items.join(", "))
}

pub(crate) fn build_chart(report: &SweepReport, width: u32, height: u32) -> miette::Result<Chart> {
    let xs: Vec<f64> = report.populations.iter().map(|&n| n as f64).collect();
    let mut chart = Chart::new(X_LABEL, Y_LABEL).with_size(width, height);
    for series in &report.series {
        let ys: Vec<f64> = series.sizes.iter().map(|&s| s as f64).collect();
        chart.add_series(series.label.clone(), &xs, &ys).into_diagnostic()?;
    }
    Ok(chart)
}
