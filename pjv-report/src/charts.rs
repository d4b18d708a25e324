//! Static chart rendering for the batch report
//!
//! Five independent figures, fixed filenames. Rendering is best-effort:
//! a failed chart is logged and the remaining charts are still produced.

use std::path::{Path, PathBuf};

use anyhow::Result;
use pjv_common::model::{CaseRow, LoadSummary};
use pjv_common::metrics;
use plotters::prelude::*;
use tracing::{info, warn};

pub const HIT_RATE_FILE: &str = "resumo_consultas.png";
pub const TOP_MATTERS_FILE: &str = "top_assuntos.png";
pub const VENUES_FILE: &str = "distribuicao_tribunal.png";
pub const YEARLY_FILE: &str = "evolucao_temporal.png";
pub const TOP_CLASSES_FILE: &str = "top_classes.png";

/// Render all five figures into `dir`, continuing past individual
/// failures. Returns the number of charts rendered successfully.
pub fn render_all(rows: &[CaseRow], summary: &LoadSummary, dir: &Path) -> usize {
    let jobs: [(&str, Result<PathBuf>); 5] = [
        (HIT_RATE_FILE, hit_rate_pie(summary, dir)),
        (TOP_MATTERS_FILE, top_matters(rows, dir)),
        (VENUES_FILE, venue_distribution(rows, dir)),
        (YEARLY_FILE, yearly_trend(rows, dir)),
        (TOP_CLASSES_FILE, top_classes(rows, dir)),
    ];

    let mut rendered = 0;
    for (name, result) in jobs {
        match result {
            Ok(path) => {
                info!("Rendered {}", path.display());
                rendered += 1;
            }
            Err(e) => warn!("Failed to render {}: {}", name, e),
        }
    }
    rendered
}

/// Proportion of subjects with at least one case vs. none
fn hit_rate_pie(summary: &LoadSummary, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(HIT_RATE_FILE);
    let sizes = [summary.with_cases as f64, summary.without_cases as f64];
    if sizes.iter().sum::<f64>() <= 0.0 {
        anyhow::bail!("no lookups in summary");
    }

    let root = BitMapBackend::new(&path, (800, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Proporção de CPFs com Processos Encontrados", ("sans-serif", 28))?;

    let labels = ["Com Processos".to_string(), "Sem Processos".to_string()];
    let colors = [RGBColor(76, 175, 80), RGBColor(255, 193, 7)];
    let center = (400, 300);
    let radius = 220.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 20).into_font());
    pie.percentages(("sans-serif", 16).into_font());
    root.draw(&pie)?;
    root.present()?;
    Ok(path.clone())
}

/// Top-10 subject-matter categories by frequency
fn top_matters(rows: &[CaseRow], dir: &Path) -> Result<PathBuf> {
    let counts = metrics::top_n(rows, |r| r.matter.as_deref(), 10);
    horizontal_bars(
        &counts,
        "Top 10 Assuntos Mais Recorrentes",
        "Quantidade de Processos",
        &dir.join(TOP_MATTERS_FILE),
    )
}

/// Top-10 procedural classes by frequency
fn top_classes(rows: &[CaseRow], dir: &Path) -> Result<PathBuf> {
    let counts = metrics::top_n(rows, |r| r.class.as_deref(), 10);
    horizontal_bars(
        &counts,
        "Top 10 Classes Processuais",
        "Quantidade",
        &dir.join(TOP_CLASSES_FILE),
    )
}

/// Per-venue case counts across all distinct venues
fn venue_distribution(rows: &[CaseRow], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(VENUES_FILE);
    let counts = metrics::venue_counts(rows);
    if counts.is_empty() {
        anyhow::bail!("no venue data");
    }
    let max = counts.iter().map(|c| c.1).max().unwrap_or(1) as i32;
    let n = counts.len() as i32;

    let root = BitMapBackend::new(&path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Distribuição de Processos por Tribunal", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..n, 0..max + 1)?;

    let names: Vec<String> = counts.iter().map(|c| c.0.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(counts.len())
        .x_label_formatter(&|x| names.get(*x as usize).cloned().unwrap_or_default())
        .y_desc("Quantidade")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        Rectangle::new(
            [(i as i32, 0), (i as i32 + 1, *count as i32)],
            RGBColor(156, 39, 176).mix(0.7).filled(),
        )
    }))?;
    root.present()?;
    Ok(path.clone())
}

/// Per-year case counts, ascending; rows without a year are excluded
fn yearly_trend(rows: &[CaseRow], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(YEARLY_FILE);
    let points: Vec<(i32, i32)> = metrics::year_counts(rows)
        .into_iter()
        .filter_map(|(year, count)| year.parse::<i32>().ok().map(|y| (y, count as i32)))
        .collect();
    if points.is_empty() {
        anyhow::bail!("no parseable filing years");
    }

    let min_year = points.first().map(|p| p.0).unwrap_or(0);
    let max_year = points.last().map(|p| p.0).unwrap_or(0);
    let max_count = points.iter().map(|p| p.1).max().unwrap_or(1);

    let root = BitMapBackend::new(&path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Evolução de Distribuição de Processos ao Longo dos Anos",
            ("sans-serif", 30),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_year..max_year + 1, 0..max_count + 1)?;

    chart
        .configure_mesh()
        .x_desc("Ano")
        .y_desc("Quantidade de Processos")
        .draw()?;

    chart.draw_series(LineSeries::new(points.clone(), &RGBColor(30, 58, 138)))?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, 4, RGBColor(30, 58, 138).filled())),
    )?;
    root.present()?;
    Ok(path.clone())
}

/// Shared horizontal bar layout for the two top-N figures
fn horizontal_bars(
    counts: &[(String, usize)],
    title: &str,
    x_desc: &str,
    path: &Path,
) -> Result<PathBuf> {
    if counts.is_empty() {
        anyhow::bail!("no data for {}", title);
    }
    let max = counts.iter().map(|c| c.1).max().unwrap_or(1) as i32;
    let n = counts.len() as i32;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(320)
        .build_cartesian_2d(0..max + 1, 0..n)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(counts.len())
        .y_label_formatter(&|y| counts.get(*y as usize).map(|c| c.0.clone()).unwrap_or_default())
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        Rectangle::new(
            [(0, i as i32), (*count as i32, i as i32 + 1)],
            RGBColor(63, 81, 181).mix(0.7).filled(),
        )
    }))?;
    root.present()?;
    Ok(path.to_path_buf())
}
