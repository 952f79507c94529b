use std::fmt::Write as _;

use crate::master::Chart;
use crate::render::Plot;

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];
const MARGIN: f64 = 40.0;

/// Built-in [`Plot`] that draws charts as inline SVG
#[derive(Debug, Clone)]
pub struct SvgPlot {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
}

impl Default for SvgPlot {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
        }
    }
}

impl Plot for SvgPlot {
    fn draw(&mut self, chart: &Chart) -> String {
        let (w, h) = (self.width as f64, self.height as f64);
        let (x0, x1) = chart.x_range();
        let (y0, y1) = chart.y_range();
        let plot_w = (w - 2.0 * MARGIN).max(1.0);
        let plot_h = (h - 2.0 * MARGIN).max(1.0);
        let scale_x = |x: f64| MARGIN + (x - x0) / (x1 - x0) * plot_w;
        let scale_y = |y: f64| h - MARGIN - (y - y0) / (y1 - y0) * plot_h;

        let mut out = String::new();
        // _: fmt for string does not fail
        let _ = writeln!(
            out,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}'>",
            self.width, self.height
        );
        let _ = writeln!(
            out,
            "  <rect x='{MARGIN}' y='{MARGIN}' width='{plot_w}' height='{plot_h}' fill='none' stroke='#888'/>"
        );
        let _ = writeln!(
            out,
            "  <text x='{MARGIN}' y='{}' font-size='10'>{}</text>",
            h - MARGIN + 14.0,
            short(x0)
        );
        let _ = writeln!(
            out,
            "  <text x='{}' y='{}' font-size='10' text-anchor='end'>{}</text>",
            w - MARGIN,
            h - MARGIN + 14.0,
            short(x1)
        );
        let _ = writeln!(
            out,
            "  <text x='{}' y='{}' font-size='10' text-anchor='end'>{}</text>",
            MARGIN - 4.0,
            h - MARGIN,
            short(y0)
        );
        let _ = writeln!(
            out,
            "  <text x='{}' y='{}' font-size='10' text-anchor='end'>{}</text>",
            MARGIN - 4.0,
            MARGIN + 10.0,
            short(y1)
        );
        let mut legend_y = MARGIN + 14.0;
        for (i, series) in chart.series.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let points = series
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|&(x, y)| format!("{:.1},{:.1}", scale_x(x), scale_y(y)))
                .collect::<Vec<_>>();
            if !points.is_empty() {
                let _ = writeln!(
                    out,
                    "  <polyline fill='none' stroke='{color}' stroke-width='1.5' points='{}'/>",
                    points.join(" ")
                );
            }
            let name = chart.names.get(i).map(String::as_str).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let _ = writeln!(
                out,
                "  <text x='{}' y='{legend_y}' font-size='11' fill='{color}' text-anchor='end'>{name}</text>",
                w - MARGIN - 6.0
            );
            legend_y += 14.0;
        }
        out.push_str("</svg>\n");
        out
    }
}

fn short(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e9 {
        format!("{v:.0}")
    } else {
        format!("{v:.3}")
    }
}
