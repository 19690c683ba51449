//! Scatter + regression rendering of rank vs. peak.
//!
//! The plot is built as an SVG string, rasterized with resvg into a
//! tiny-skia pixmap, PNG-encoded, and returned as a base64 data URI
//! suitable for embedding directly in an `<img>` tag.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fmt::Write as _;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const POINT_COLOR: &str = "#4c72b0";
const LINE_COLOR: &str = "#d62728";
const GRID_COLOR: &str = "#e5e5e5";
const TEXT_COLOR: &str = "#333333";
const FONT: &str = "DejaVu Sans, Helvetica, sans-serif";

/// Render the scatterplot and return it as a `data:image/png;base64,` URI.
///
/// Callers are expected to pass at least two points; fewer still renders
/// (an empty plot) rather than failing.
pub fn scatter_data_uri(points: &[(f64, f64)]) -> Result<String> {
    let svg = render_svg(points);
    let png = rasterize(&svg, WIDTH, HEIGHT)?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Least-squares slope and intercept. `None` for fewer than 2 points or
/// zero x-variance, in which case the regression line is omitted.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Data range padded by 5% on each side; degenerate ranges get a unit pad.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

/// Round a raw tick interval to a 1/2/5 × 10^k step.
fn nice_step(raw: f64) -> f64 {
    let mag = 10f64.powf(raw.abs().log10().floor());
    let norm = raw / mag;
    let n = if norm < 1.5 {
        1.0
    } else if norm < 3.0 {
        2.0
    } else if norm < 7.0 {
        5.0
    } else {
        10.0
    };
    n * mag
}

fn ticks(min: f64, max: f64) -> Vec<f64> {
    let step = nice_step((max - min) / 5.0);
    let mut t = (min / step).ceil() * step;
    let mut out = Vec::new();
    while t <= max + step * 1e-9 {
        out.push(t);
        t += step;
    }
    out
}

fn tick_label(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        format!("{v:.1}")
    }
}

fn render_svg(points: &[(f64, f64)]) -> String {
    let (x_min, x_max) = padded_range(points.iter().map(|(x, _)| *x));
    let (y_min, y_max) = padded_range(points.iter().map(|(_, y)| *y));

    let plot_w = WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT as f64 - MARGIN_TOP - MARGIN_BOTTOM;
    let px = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
    let py = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{WIDTH}' height='{HEIGHT}' viewBox='0 0 {WIDTH} {HEIGHT}'>"
    );
    let _ = writeln!(svg, "  <rect width='{WIDTH}' height='{HEIGHT}' fill='white'/>");

    // Grid and tick labels
    for t in ticks(y_min, y_max) {
        let y = py(t);
        let _ = writeln!(
            svg,
            "  <line x1='{MARGIN_LEFT:.2}' y1='{y:.2}' x2='{:.2}' y2='{y:.2}' stroke='{GRID_COLOR}' stroke-width='1'/>",
            MARGIN_LEFT + plot_w
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.2}' y='{:.2}' text-anchor='end' fill='{TEXT_COLOR}' font-family='{FONT}' font-size='12'>{}</text>",
            MARGIN_LEFT - 8.0,
            y + 4.0,
            tick_label(t)
        );
    }
    for t in ticks(x_min, x_max) {
        let x = px(t);
        let _ = writeln!(
            svg,
            "  <line x1='{x:.2}' y1='{MARGIN_TOP:.2}' x2='{x:.2}' y2='{:.2}' stroke='{GRID_COLOR}' stroke-width='1'/>",
            MARGIN_TOP + plot_h
        );
        let _ = writeln!(
            svg,
            "  <text x='{x:.2}' y='{:.2}' text-anchor='middle' fill='{TEXT_COLOR}' font-family='{FONT}' font-size='12'>{}</text>",
            MARGIN_TOP + plot_h + 20.0,
            tick_label(t)
        );
    }

    // Plot border
    let _ = writeln!(
        svg,
        "  <rect x='{MARGIN_LEFT:.2}' y='{MARGIN_TOP:.2}' width='{plot_w:.2}' height='{plot_h:.2}' fill='none' stroke='#cccccc' stroke-width='1'/>"
    );

    // Points
    for (x, y) in points {
        let _ = writeln!(
            svg,
            "  <circle cx='{:.2}' cy='{:.2}' r='5' fill='{POINT_COLOR}' fill-opacity='0.6'/>",
            px(*x),
            py(*y)
        );
    }

    // Regression line, dotted red, clipped to the data's x-range
    if let Some((slope, intercept)) = linear_fit(points) {
        let x0 = points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
        let x1 = points
            .iter()
            .map(|(x, _)| *x)
            .fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(
            svg,
            "  <line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' stroke='{LINE_COLOR}' stroke-width='2' stroke-dasharray='2 5'/>",
            px(x0),
            py(slope * x0 + intercept),
            px(x1),
            py(slope * x1 + intercept)
        );
    }

    // Title and axis labels
    let _ = writeln!(
        svg,
        "  <text x='{:.2}' y='28' text-anchor='middle' fill='{TEXT_COLOR}' font-family='{FONT}' font-size='16'>Rank vs Peak</text>",
        WIDTH as f64 / 2.0
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.2}' y='{:.2}' text-anchor='middle' fill='{TEXT_COLOR}' font-family='{FONT}' font-size='13'>Rank</text>",
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT as f64 - 16.0
    );
    let _ = writeln!(
        svg,
        "  <text x='20' y='{:.2}' text-anchor='middle' fill='{TEXT_COLOR}' font-family='{FONT}' font-size='13' transform='rotate(-90 20 {:.2})'>Peak</text>",
        MARGIN_TOP + plot_h / 2.0,
        MARGIN_TOP + plot_h / 2.0
    );

    let _ = writeln!(svg, "</svg>");
    svg
}

fn rasterize(svg: &str, width: u32, height: u32) -> Result<Vec<u8>> {
    use png::{BitDepth, ColorType, Encoder};
    use tiny_skia::{Pixmap, Transform};
    use usvg::{Options, Tree};

    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree: Tree = Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| anyhow!("svg parse failed: {e}"))?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| anyhow!("pixmap allocation failed"))?;
    let mut pixmap_ref = pixmap.as_mut();
    resvg::render(&tree, Transform::default(), &mut pixmap_ref);

    let mut out = Vec::new();
    let mut encoder = Encoder::new(&mut out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder
        .write_header()
        .context("png header")?
        .write_image_data(pixmap.data())
        .context("png image data")?;

    Ok(out)
}
