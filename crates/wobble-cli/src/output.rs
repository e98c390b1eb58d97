//! Human and JSON rendering for CLI results.
//!
//! JSON output is the serde form of the library types. Human output prints a
//! header block followed by one labelled table per statistic; undefined cells
//! read `n/a`.

use std::io::{self, Write};

use serde::Serialize;
use wobble_core::{CorrelationMatrix, GraphStats, RobustnessReport};

/// Shared width for human separators.
pub const RULE_WIDTH: usize = 72;

/// Width of one matrix cell.
const CELL_WIDTH: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

fn section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    rule(w)
}

fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

/// Write `matrix` as a right-aligned table with row and column labels.
pub fn write_matrix(w: &mut dyn Write, matrix: &CorrelationMatrix) -> io::Result<()> {
    let label_width = matrix
        .labels()
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(5);

    write!(w, "{:label_width$}", "")?;
    for label in matrix.labels() {
        write!(w, " {label:>CELL_WIDTH$}")?;
    }
    writeln!(w)?;

    for (label, row) in matrix.labels().iter().zip(matrix.rows()) {
        write!(w, "{label:<label_width$}")?;
        for &value in row {
            write!(w, " {:>CELL_WIDTH$}", cell(value))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn write_report(w: &mut dyn Write, report: &RobustnessReport) -> io::Result<()> {
    let cfg = &report.config;
    section(w, "Robustness run")?;
    kv(w, "centrality", &report.centrality)?;
    kv(
        w,
        "graph",
        format!(
            "{} nodes, {} edges",
            report.graph.node_count, report.graph.edge_count
        ),
    )?;
    kv(w, "fraction", cfg.perturbation_fraction.to_string())?;
    kv(w, "depth", cfg.cascade_depth.to_string())?;
    kv(w, "trials", cfg.trial_count.to_string())?;
    kv(w, "seed", cfg.seed.to_string())?;
    kv(w, "aggregation", cfg.aggregation.to_string())?;
    kv(w, "elapsed", format!("{} ms", report.elapsed_ms))?;
    writeln!(w)?;

    section(w, "Kendall tau-b")?;
    write_matrix(w, &report.tau_b)?;
    writeln!(w)?;

    section(w, "Goodman-Kruskal gamma")?;
    write_matrix(w, &report.gamma)
}

fn write_stats(w: &mut dyn Write, stats: &GraphStats) -> io::Result<()> {
    section(w, "Graph")?;
    kv(w, "nodes", stats.node_count.to_string())?;
    kv(w, "edges", stats.edge_count.to_string())?;
    kv(w, "density", format!("{:.6}", stats.density))?;
    kv(w, "components", stats.component_count.to_string())?;
    kv(w, "isolated", stats.isolated_node_count.to_string())?;
    kv(w, "max degree", stats.max_degree.to_string())?;
    kv(w, "hash", &stats.content_hash)
}

fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human(value, &mut out)?,
    }
    Ok(())
}

pub fn render_report(report: &RobustnessReport, mode: OutputMode) -> anyhow::Result<()> {
    render(mode, report, |r, w| write_report(w, r))
}

pub fn render_stats(stats: &GraphStats, mode: OutputMode) -> anyhow::Result<()> {
    render(mode, stats, |s, w| write_stats(w, s))
}
