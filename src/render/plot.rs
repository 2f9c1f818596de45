//! Two-panel PNG chart (memory over CPU) with the recommendation in a footer box.

use crate::host::HostInfo;
use crate::model::{Recommendation, Snapshot};
use crate::Result;

use anyhow::anyhow;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (1800, 1050);
const FOOTER_HEIGHT: u32 = 200;
const LINE_HEIGHT: i32 = 22;

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
const WHEAT: RGBColor = RGBColor(245, 222, 179);

struct Panel<'a> {
    caption: String,
    label: &'a str,
    y_desc: &'a str,
    x_desc: Option<&'a str>,
    color: RGBColor,
    values: Vec<f64>,
}

fn plot_error<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow!("plot rendering failed: {}", e)
}

pub fn render_plot(
    path: &Path,
    snapshots: &[Snapshot],
    host: &HostInfo,
    recommendation: &Recommendation,
) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let (charts, footer) = root.split_vertically(SIZE.1 - FOOTER_HEIGHT);
    let panels = charts.split_evenly((2, 1));

    draw_panel(
        &panels[0],
        &Panel {
            caption: "Memory usage over time".into(),
            label: "Memory usage (MiB)",
            y_desc: "MiB",
            x_desc: None,
            color: STEEL_BLUE,
            values: snapshots.iter().map(|s| s.mem_usage_mib).collect(),
        },
    )?;
    draw_panel(
        &panels[1],
        &Panel {
            caption: format!("CPU usage over time ({})", host.label()),
            label: "CPU usage (m)",
            y_desc: "CPU (milli-cores)",
            x_desc: Some("Sample"),
            color: DARK_ORANGE,
            values: snapshots.iter().map(|s| s.cpu_mcpu).collect(),
        },
    )?;
    draw_annotation(&footer, recommendation)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<()> {
    let y_max = y_upper(&panel.values);
    let x_max = panel.values.len().saturating_sub(1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.caption, ("sans-serif", 26))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0..x_max, 0.0..y_max)
        .map_err(plot_error)?;

    let mut mesh = chart.configure_mesh();
    mesh.y_desc(panel.y_desc);
    if let Some(x_desc) = panel.x_desc {
        mesh.x_desc(x_desc);
    }
    mesh.draw().map_err(plot_error)?;

    let color = panel.color;
    chart
        .draw_series(LineSeries::new(
            panel.values.iter().enumerate().map(|(i, v)| (i, *v)),
            color.stroke_width(2),
        ))
        .map_err(plot_error)?
        .label(panel.label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 25, y)], &color));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    Ok(())
}

/// Upper y bound with 10% headroom. Always finite and positive; an infinite
/// range never finishes drawing its mesh.
fn y_upper(values: &[f64]) -> f64 {
    let peak = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return 1.0;
    }
    let padded = peak * 1.1;
    if padded.is_finite() { padded } else { peak }
}

fn draw_annotation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    recommendation: &Recommendation,
) -> Result<()> {
    let text = recommendation.to_string();
    let lines: Vec<&str> = text.lines().collect();
    let height = LINE_HEIGHT * lines.len() as i32 + 16;

    area.draw(&Rectangle::new(
        [(16, 10), (520, 10 + height)],
        WHEAT.mix(0.5).filled(),
    ))
    .map_err(plot_error)?;

    let style = ("monospace", 18).into_font().color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        area.draw_text(line, &style, (28, 18 + LINE_HEIGHT * i as i32))
            .map_err(plot_error)?;
    }

    Ok(())
}
