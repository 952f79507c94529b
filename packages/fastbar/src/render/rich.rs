use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use crate::master::Chart;
use crate::render::{Frame, MasterPaint, Paint, Plot};

/// Handle of a rendered output on a [`DisplaySurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayId(pub u64);

/// Rich display surface, such as a notebook front-end.
///
/// The surface renders markup and can replace a rendered output in place.
/// Calls are expected to never fail; a surface that cannot render
/// should report it in [`probe`](Self::probe) so the process can fall back
/// to terminal output.
pub trait DisplaySurface: Send {
    /// Check the surface can be used. Called once at installation
    fn probe(&mut self) -> crate::Result<()> {
        Ok(())
    }
    /// Render new markup and return a handle to update it later
    fn display(&mut self, markup: &str) -> DisplayId;
    /// Replace a rendered output
    fn update(&mut self, id: DisplayId, markup: &str);
    /// Remove a rendered output
    fn clear(&mut self, id: DisplayId);
}

/// Shared state of the rich renderer: the surface and the plotting backend
pub struct RichTarget {
    surface: Mutex<Box<dyn DisplaySurface>>,
    plot: Mutex<Box<dyn Plot>>,
}

impl RichTarget {
    pub(crate) fn new(surface: Box<dyn DisplaySurface>, plot: Box<dyn Plot>) -> Self {
        Self {
            surface: Mutex::new(surface),
            plot: Mutex::new(plot),
        }
    }

    /// Display the markup, or update it in place if it was displayed before
    fn show(&self, id: &mut Option<DisplayId>, markup: &str) {
        let Ok(mut surface) = self.surface.lock() else {
            return;
        };
        match id {
            Some(id) => surface.update(*id, markup),
            None => *id = Some(surface.display(markup)),
        }
    }

    fn clear(&self, id: DisplayId) {
        if let Ok(mut surface) = self.surface.lock() {
            surface.clear(id);
        }
    }

    fn draw(&self, chart: &Chart) -> Option<String> {
        let mut plot = self.plot.lock().ok()?;
        Some(plot.draw(chart))
    }
}

/// Make the markup fragment for a bar: a `<progress>` element followed by the label
pub fn html_progress_bar(value: u64, total: u64, label: &str, interrupted: bool) -> String {
    let bar_style = if interrupted {
        "progress-bar-interrupted"
    } else {
        ""
    };
    format!(
        r#"
    <div>
        <style>
            /* Turns off some styling */
            progress {{
                /* gets rid of default border in Firefox and Opera. */
                border: none;
                /* Needs to be in here for Safari polyfill so background images work as expected. */
                background-size: auto;
            }}
            .progress-bar-interrupted, .progress-bar-interrupted::-webkit-progress-bar {{
                background: #F44336;
            }}
        </style>
      <progress value='{value}' class='{bar_style}' max='{total}', style='width:300px; height:20px; vertical-align: middle;'></progress>
      {label}
    </div>
    "#
    )
}

/// Make a markup table. Cells that are empty are skipped
pub fn html_table(rows: &[Vec<String>]) -> String {
    let cols = rows.first().map(Vec::len).unwrap_or_default();
    let mut out = format!(
        "<table style='width:{}px; margin-bottom:10px'>\n",
        (75 * cols).max(300)
    );
    for row in rows {
        out.push_str("  <tr>\n");
        let cells = row
            .iter()
            .filter(|cell| !cell.is_empty())
            .map(|cell| format!("    <th>{cell}</th>"))
            .collect::<Vec<_>>();
        out.push_str(&cells.join("\n"));
        out.push_str("\n  </tr>\n");
    }
    out.push_str("</table>\n");
    out
}

fn html_image_grid(images: &[String], titles: &[String], cols: usize) -> String {
    let cols = cols.max(1);
    let rows = images.len().div_ceil(cols);
    let mut out = String::from("<table style='margin-bottom:10px'>\n");
    for r in 0..rows {
        out.push_str("  <tr>\n");
        for c in 0..cols {
            let i = r * cols + c;
            match images.get(i) {
                Some(image) => {
                    let title = titles.get(i).map(String::as_str).unwrap_or_default();
                    // _: fmt for string does not fail
                    let _ = writeln!(
                        out,
                        "    <td><figure style='margin:0'>{image}<figcaption>{title}</figcaption></figure></td>"
                    );
                }
                None => out.push_str("    <td></td>\n"),
            }
        }
        out.push_str("  </tr>\n");
    }
    out.push_str("</table>\n");
    out
}

/// Rich painter for one bar
pub(crate) struct RichBar {
    target: Arc<RichTarget>,
    id: Option<DisplayId>,
    html: String,
}

impl RichBar {
    pub fn new(target: Arc<RichTarget>) -> Self {
        Self {
            target,
            id: None,
            html: html_progress_bar(0, 0, "", false),
        }
    }
}

impl Paint for RichBar {
    fn begin(&mut self, display: bool) {
        if display {
            // a new run gets a new output
            self.id = None;
        }
    }

    fn paint(&mut self, frame: &Frame<'_>, display: bool) {
        self.html = if frame.interrupted {
            html_progress_bar(0, frame.total, "Interrupted", true)
        } else if frame.prefix.is_empty() {
            html_progress_bar(frame.value, frame.total, frame.label, false)
        } else {
            let label = format!("{} {}", frame.prefix, frame.label);
            html_progress_bar(frame.value, frame.total, &label, false)
        };
        if display {
            self.target.show(&mut self.id, &self.html);
        }
    }

    fn end(&mut self, leave: bool, display: bool) {
        if leave || !display {
            return;
        }
        if let Some(id) = self.id.take() {
            self.target.clear(id);
        }
    }

    fn markup(&self) -> Option<&str> {
        Some(&self.html)
    }
}

/// Rich painter for a master bar
pub(crate) struct RichMaster {
    target: Arc<RichTarget>,
    id: Option<DisplayId>,
}

impl RichMaster {
    pub fn new(target: Arc<RichTarget>) -> Self {
        Self { target, id: None }
    }
}

impl MasterPaint for RichMaster {
    fn begin(&mut self, composite: &str) {
        self.id = None;
        self.target.show(&mut self.id, composite);
    }

    fn show(&mut self, composite: &str) {
        self.target.show(&mut self.id, composite);
    }

    fn report_line(&mut self, _: &str) {}

    fn report_row(&mut self, _: &[String], _: bool) {}

    fn text_markup(&self, lines: &[String], table: &[Vec<String>]) -> Option<String> {
        if lines.is_empty() && table.is_empty() {
            return None;
        }
        let mut out = String::new();
        for line in lines {
            out.push_str(line);
            out.push_str("<p>");
        }
        if !table.is_empty() {
            out.push_str(&html_table(table));
        }
        Some(out)
    }

    fn chart_markup(&mut self, chart: &Chart) -> Option<String> {
        self.target.draw(chart)
    }

    fn images_markup(&mut self, images: &[String], titles: &[String], cols: usize) -> Option<String> {
        Some(html_image_grid(images, titles, cols))
    }

    fn interrupt(&mut self, clean: bool) {
        if !clean {
            return;
        }
        if let Some(id) = self.id.take() {
            self.target.clear(id);
        }
    }

    fn end(&mut self, summary: Option<&str>, composite: &str) {
        match summary {
            Some(summary) => {
                let view = format!("{summary} <p>{composite}");
                self.target.show(&mut self.id, &view);
            }
            None => self.target.show(&mut self.id, composite),
        }
    }
}
