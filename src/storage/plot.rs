// SVG rendering of a run's resource series
// Author: Gabriel Demetrios Lafis

use std::fmt::Write;

use crate::monitor::RunMetrics;

const WIDTH: f64 = 800.0;
const PANEL_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;

struct Panel<'a> {
    title: String,
    y_label: &'a str,
    color: &'a str,
    points: Vec<(f64, f64)>,
}

/// Render CPU usage over time above memory usage over time
pub fn render_svg(function: &str, metrics: &RunMetrics) -> Result<String, std::fmt::Error> {
    let function = escape(function);
    let panels = [
        Panel {
            title: format!("CPU Usage - {}", function),
            y_label: "CPU Usage (%)",
            color: "#1f77b4",
            points: metrics.samples.iter().map(|s| (s.elapsed_seconds, s.cpu_percent)).collect(),
        },
        Panel {
            title: format!("Memory Usage - {}", function),
            y_label: "Memory Usage (MB)",
            color: "#d62728",
            points: metrics.samples.iter().map(|s| (s.elapsed_seconds, s.memory_mb)).collect(),
        },
    ];

    let mut svg = String::new();
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = WIDTH,
        h = PANEL_HEIGHT * panels.len() as f64
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

    for (idx, panel) in panels.iter().enumerate() {
        render_panel(&mut svg, panel, idx as f64 * PANEL_HEIGHT)?;
    }

    writeln!(svg, "</svg>")?;
    Ok(svg)
}

fn render_panel(svg: &mut String, panel: &Panel, offset_y: f64) -> std::fmt::Result {
    let left = MARGIN_LEFT;
    let right = WIDTH - MARGIN_RIGHT;
    let top = offset_y + MARGIN_TOP;
    let bottom = offset_y + PANEL_HEIGHT - MARGIN_BOTTOM;

    let x_max = panel.points.iter().map(|p| p.0).fold(0.0, f64::max);
    let y_max = panel.points.iter().map(|p| p.1).fold(0.0, f64::max);
    // Flat or empty series still get a visible axis range
    let x_max = if x_max > 0.0 { x_max } else { 1.0 };
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let scale_x = |x: f64| left + x / x_max * (right - left);
    let scale_y = |y: f64| bottom - y / y_max * (bottom - top);

    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        top - 15.0,
        panel.title
    )?;

    // grid and tick labels
    for i in 0..=4 {
        let frac = i as f64 / 4.0;
        let gy = bottom - frac * (bottom - top);
        let gx = left + frac * (right - left);
        writeln!(
            svg,
            r##"<line x1="{l}" y1="{gy:.1}" x2="{r}" y2="{gy:.1}" stroke="#dddddd"/><text x="{tx}" y="{ty:.1}" text-anchor="end" font-size="11">{v:.1}</text>"##,
            l = left,
            r = right,
            gy = gy,
            tx = left - 6.0,
            ty = gy + 4.0,
            v = frac * y_max
        )?;
        writeln!(
            svg,
            r##"<line x1="{gx:.1}" y1="{t}" x2="{gx:.1}" y2="{b}" stroke="#dddddd"/><text x="{gx:.1}" y="{ty}" text-anchor="middle" font-size="11">{v:.2}</text>"##,
            gx = gx,
            t = top,
            b = bottom,
            ty = bottom + 16.0,
            v = frac * x_max
        )?;
    }

    writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black"/>"#,
        left,
        top,
        right - left,
        bottom - top
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="12">Time (seconds)</text>"#,
        (left + right) / 2.0,
        bottom + 36.0
    )?;
    writeln!(
        svg,
        r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="12" transform="rotate(-90 {x} {y})">{label}</text>"#,
        x = 18.0,
        y = (top + bottom) / 2.0,
        label = panel.y_label
    )?;

    let mut points = String::new();
    for &(x, y) in &panel.points {
        write!(points, "{:.2},{:.2} ", scale_x(x), scale_y(y))?;
    }
    writeln!(
        svg,
        r#"<polyline fill="none" stroke="{}" stroke-width="2" points="{}"/>"#,
        panel.color,
        points.trim_end()
    )?;

    for &(x, y) in &panel.points {
        writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{}"/>"#,
            scale_x(x),
            scale_y(y),
            panel.color
        )?;
    }

    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
