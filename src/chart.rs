//! SVG line-chart sink for abnormal-return series

use crate::error::{EventStudyError, Result};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 25.0;
const MARGIN_TOP: f64 = 45.0;
const MARGIN_BOTTOM: f64 = 45.0;

/// Render a percentage series over dates as an SVG line chart.
///
/// NaN points (degenerate abnormal returns) are drawn as gaps. At least one
/// finite value is required; dates and values must be aligned.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    dates: &[NaiveDate],
    values: &[f64],
) -> Result<()> {
    if dates.len() != values.len() {
        return Err(EventStudyError::Validation(format!(
            "Chart has {} dates but {} values",
            dates.len(),
            values.len()
        )));
    }
    if values.is_empty() {
        return Err(EventStudyError::Validation(
            "Cannot render a chart for an empty series".to_string(),
        ));
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Err(EventStudyError::Validation(
            "Cannot render a chart without any finite values".to_string(),
        ));
    }

    let mut y_min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut y_max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (y_max - y_min).abs() < f64::EPSILON {
        // Flat series: open up a band so the line does not sit on an edge
        y_min -= 1.0;
        y_max += 1.0;
    } else {
        let pad = (y_max - y_min) * 0.05;
        y_min -= pad;
        y_max += pad;
    }

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let x_step = if values.len() > 1 {
        plot_width / (values.len() - 1) as f64
    } else {
        0.0
    };
    let x_at = |index: usize| {
        if values.len() > 1 {
            MARGIN_LEFT + index as f64 * x_step
        } else {
            MARGIN_LEFT + plot_width / 2.0
        }
    };
    let y_at = |value: f64| MARGIN_TOP + (y_max - value) / (y_max - y_min) * plot_height;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="25" font-family="sans-serif" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape_xml(title)
    );
    let _ = writeln!(
        svg,
        r#"  <text x="18" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="middle" transform="rotate(-90 18 {:.1})">% Change</text>"#,
        HEIGHT / 2.0,
        HEIGHT / 2.0
    );

    // Axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{:.1}" stroke="black"/>"#,
        HEIGHT - MARGIN_BOTTOM
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        HEIGHT - MARGIN_BOTTOM,
        WIDTH - MARGIN_RIGHT,
        HEIGHT - MARGIN_BOTTOM
    );

    // Zero reference line when zero lies inside the value range
    if y_min < 0.0 && y_max > 0.0 {
        let y_zero = y_at(0.0);
        let _ = writeln!(
            svg,
            r#"  <line x1="{MARGIN_LEFT}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="gray" stroke-dasharray="4 3"/>"#,
            y_zero,
            WIDTH - MARGIN_RIGHT,
            y_zero
        );
    }

    // Y-axis extremes and x-axis end labels
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{:.2}</text>"#,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + 4.0,
        y_max
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{:.2}</text>"#,
        MARGIN_LEFT - 6.0,
        HEIGHT - MARGIN_BOTTOM + 4.0,
        y_min
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{MARGIN_LEFT}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="start">{}</text>"#,
        HEIGHT - MARGIN_BOTTOM + 18.0,
        dates[0]
    );
    if dates.len() > 1 {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{}</text>"#,
            WIDTH - MARGIN_RIGHT,
            HEIGHT - MARGIN_BOTTOM + 18.0,
            dates[dates.len() - 1]
        );
    }

    // Series: polylines over runs of finite points, a marker per point
    let mut run: Vec<String> = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        if value.is_finite() {
            run.push(format!("{:.2},{:.2}", x_at(index), y_at(value)));
        } else if run.len() > 1 {
            let _ = writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="steelblue" stroke-width="1.5"/>"#,
                run.join(" ")
            );
            run.clear();
        } else {
            run.clear();
        }
    }
    if run.len() > 1 {
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="steelblue" stroke-width="1.5"/>"#,
            run.join(" ")
        );
    }
    for (index, &value) in values.iter().enumerate() {
        if value.is_finite() {
            let _ = writeln!(
                svg,
                r#"  <circle cx="{:.2}" cy="{:.2}" r="2.5" fill="steelblue"/>"#,
                x_at(index),
                y_at(value)
            );
        }
    }

    let _ = writeln!(svg, "</svg>");

    std::fs::write(path, svg)?;
    Ok(())
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
