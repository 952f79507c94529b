//! # Renderers
//!
//! Bars do not know where they are drawn. Every bar gets a [`Paint`]
//! and every master bar a [`MasterPaint`] from a [`Renderer`], which
//! is one of two families:
//! - [`Env::Rich`]: markup fragments on a [`DisplaySurface`] (for example a notebook
//!   front-end), updated in place.
//! - [`Env::Terminal`]: text lines terminated by `\r`, written to the
//!   [configured](crate::Config) writer.
//!
//! The family is chosen once per process by [`env`]: it is `Rich` if a display
//! surface was installed with [`install_display`] before any bar was created,
//! and `Terminal` otherwise. [`Config::force_console`](crate::Config) overrides
//! the choice.
use std::sync::{Arc, Mutex, OnceLock};

mod rich;
pub use rich::{DisplayId, DisplaySurface, RichTarget, html_progress_bar, html_table};
use rich::{RichBar, RichMaster};
mod svg;
pub use svg::SvgPlot;
mod term;
pub use term::TermOutput;
use term::{TermBar, TermMaster};

use crate::master::Chart;

/// Environment (renderer family) of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Env {
    /// Markup on a display surface
    Rich,
    /// Plain text in a terminal
    Terminal,
}

/// What a bar looks like at one paint
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Current position
    pub value: u64,
    /// Total steps
    pub total: u64,
    /// The formatted label, like `25.00% [50/200 01:05<03:15]`
    pub label: &'a str,
    /// Context displayed before the bar (like `Epoch 1/10 :`)
    pub prefix: &'a str,
    /// If the bar is painted in the interrupted state
    pub interrupted: bool,
}

/// Paint callbacks for one bar
pub trait Paint: Send {
    /// Called when the bar begins
    fn begin(&mut self, display: bool);
    /// Draw the frame
    fn paint(&mut self, frame: &Frame<'_>, display: bool);
    /// Called when the bar ends. The rendered region is removed if `leave` is false
    fn end(&mut self, leave: bool, display: bool);
    /// Latest renderable of the bar, for composition into a master bar view
    fn markup(&self) -> Option<&str> {
        None
    }
}

/// Paint callbacks for a master bar
pub trait MasterPaint: Send {
    /// Called when the master bar begins, with the initial composite
    fn begin(&mut self, composite: &str);
    /// Re-render the whole composite
    fn show(&mut self, composite: &str);
    /// A line was reported
    fn report_line(&mut self, line: &str);
    /// A table row was reported. The first row reported is the header
    fn report_row(&mut self, row: &[String], is_header: bool);
    /// Renderable of the text region. `None` if the text region is not re-rendered
    fn text_markup(&self, lines: &[String], table: &[Vec<String>]) -> Option<String>;
    /// Renderable of the chart region. `None` if charts are not supported
    fn chart_markup(&mut self, chart: &Chart) -> Option<String>;
    /// Renderable of an image grid. `None` if images are not supported
    fn images_markup(&mut self, images: &[String], titles: &[String], cols: usize) -> Option<String>;
    /// A bar in the master bar was interrupted. `clean` requests clearing the output
    fn interrupt(&mut self, clean: bool);
    /// Called when the master bar ends with the final view
    fn end(&mut self, summary: Option<&str>, composite: &str);
}

/// Capability-tagged handle to a renderer family.
///
/// Cloning is cheap, and all clones share the same output.
#[derive(Clone)]
pub enum Renderer {
    /// Markup on a display surface
    Rich(Arc<RichTarget>),
    /// Text in a terminal
    Terminal(Arc<TermOutput>),
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rich(_) => write!(f, "Renderer::Rich"),
            Self::Terminal(_) => write!(f, "Renderer::Terminal"),
        }
    }
}

impl Renderer {
    /// Make a rich renderer drawing on `surface`, with charts drawn as SVG
    pub fn rich(surface: impl DisplaySurface + 'static) -> Self {
        Self::rich_with_plot(surface, SvgPlot::default())
    }

    /// Make a rich renderer drawing on `surface`, with charts drawn by `plot`
    pub fn rich_with_plot(
        surface: impl DisplaySurface + 'static,
        plot: impl Plot + 'static,
    ) -> Self {
        Self::Rich(Arc::new(RichTarget::new(Box::new(surface), Box::new(plot))))
    }

    /// Make a terminal renderer with the given configuration
    pub fn terminal(config: crate::Config) -> Self {
        Self::Terminal(Arc::new(TermOutput::new(config)))
    }

    /// The family of this renderer
    pub fn env(&self) -> Env {
        match self {
            Self::Rich(_) => Env::Rich,
            Self::Terminal(_) => Env::Terminal,
        }
    }

    pub(crate) fn bar_painter(&self) -> Box<dyn Paint> {
        match self {
            Self::Rich(target) => Box::new(RichBar::new(Arc::clone(target))),
            Self::Terminal(out) => Box::new(TermBar::new(Arc::clone(out))),
        }
    }

    pub(crate) fn master_painter(&self) -> Box<dyn MasterPaint> {
        match self {
            Self::Rich(target) => Box::new(RichMaster::new(Arc::clone(target))),
            Self::Terminal(out) => Box::new(TermMaster::new(Arc::clone(out))),
        }
    }
}

/// Plotting surface used by the rich renderer to draw charts
pub trait Plot: Send {
    /// Draw a labeled line chart and return its markup
    fn draw(&mut self, chart: &Chart) -> String;
}

/// Rich display installed for this process, resolved once
static RICH: OnceLock<Option<Arc<RichTarget>>> = OnceLock::new();
/// Cached default renderer, cleared when the configuration changes
static DEFAULT: Mutex<Option<Renderer>> = Mutex::new(None);

/// Install the rich display surface for this process.
///
/// This has to be called before any bar is created. The surface is probed
/// once: if it is not usable, a warning is logged and the process keeps using
/// terminal rendering.
pub fn install_display(
    surface: impl DisplaySurface + 'static,
    plot: Option<Box<dyn Plot>>,
) -> crate::Result<Env> {
    let mut surface: Box<dyn DisplaySurface> = Box::new(surface);
    let target = match surface.probe() {
        Ok(()) => {
            let plot = plot.unwrap_or_else(|| Box::new(SvgPlot::default()));
            Some(Arc::new(RichTarget::new(surface, plot)))
        }
        Err(e) => {
            crate::warn!("display surface is not available, progress bars will use console behavior: {e:#}");
            None
        }
    };
    if RICH.set(target).is_err() {
        crate::bail!("cannot install display surface: the environment is already selected");
    }
    invalidate_default();
    Ok(env())
}

/// Get the environment bars are rendered in.
///
/// The first call fixes the environment for the rest of the process
pub fn env() -> Env {
    if crate::config::force_console() {
        return Env::Terminal;
    }
    match RICH.get_or_init(|| None) {
        Some(_) => Env::Rich,
        None => Env::Terminal,
    }
}

/// If a rich surface is installed, even if console behavior is forced
pub(crate) fn rich_available() -> bool {
    matches!(RICH.get(), Some(Some(_)))
}

/// Get the default renderer for the current environment and configuration
pub fn renderer() -> Renderer {
    let env = env();
    let Ok(mut cached) = DEFAULT.lock() else {
        return make_default(env);
    };
    if let Some(r) = cached.as_ref()
        && r.env() == env
    {
        return r.clone();
    }
    let r = make_default(env);
    *cached = Some(r.clone());
    r
}

fn make_default(env: Env) -> Renderer {
    match (env, RICH.get()) {
        (Env::Rich, Some(Some(target))) => Renderer::Rich(Arc::clone(target)),
        _ => Renderer::terminal(crate::config()),
    }
}

/// Drop the cached default renderer so the next bar picks up changes
pub(crate) fn invalidate_default() {
    if let Ok(mut cached) = DEFAULT.lock() {
        *cached = None;
    }
}
