use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::progress::{BarBuilder, BarIter, ProgressBar, format_time};
use crate::render::{Env, MasterPaint, Renderer};

mod builder;
pub use builder::MasterBarBuilder;
mod chart;
pub use chart::{Chart, Series};
mod regions;
pub use regions::{DEFAULT_ORDER, Region};

/// # Master Bars
/// A master bar follows an outer loop (like epochs) with a primary bar,
/// and shows one child bar for the inner loop (like batches) at a time.
/// It also has a report region for text lines and a table, and a chart region.
///
/// ```rust,no_run
/// let mut epochs = fastbar::master().wrap(0..3)?;
/// let mb = std::sync::Arc::clone(epochs.bar());
/// mb.report_table(["epoch", "train_loss"]);
/// for epoch in &mut epochs {
///     for batch in mb.child().wrap(0..100)? {
///         // train on batch
///     }
///     mb.report_table([epoch.to_string(), format!("{:.4}", 0.5)]);
/// }
/// # fastbar::Ok(())
/// ```
///
/// In the terminal, the primary bar is not drawn. Each child bar is drawn on its own
/// line with a prefix like `Epoch 2/3 :`, and reported lines are printed once.
///
/// On a rich display surface, the whole master bar is one output that is
/// updated in place. It shows the regions that have content, in the configured
/// [order](MasterBarBuilder::order). When the master bar ends, the output is replaced
/// with the total time, the reported text and the chart.
#[inline(always)]
pub fn master() -> MasterBarBuilder {
    MasterBarBuilder::new()
}

/// Handle for a master bar (the handle is `Arc<MasterBar>`)
///
/// See [Master Bars](fn@crate::master)
pub struct MasterBar {
    props: MasterProps,
    primary: Arc<ProgressBar>,
    state: Mutex<MasterState>,
}

/// Options of a master bar
#[derive(Debug, Clone)]
pub(crate) struct MasterProps {
    pub order: Vec<Region>,
    pub hide_graph: bool,
    pub clean_on_interrupt: bool,
    pub total_time: bool,
    pub renderer: Renderer,
}

struct MasterState {
    painter: Box<dyn MasterPaint>,
    child: Option<Arc<ProgressBar>>,
    lines: Vec<String>,
    table: Vec<Vec<String>>,
    /// Renderable of the text region
    text: Option<String>,
    chart: Chart,
    /// Renderable of the chart region
    graph: Option<String>,
    start: Option<Instant>,
    active: bool,
    /// The output was removed after an interruption
    cleaned: bool,
}

impl MasterBar {
    pub(crate) fn new(props: MasterProps, primary: Arc<ProgressBar>, names: Vec<String>) -> Arc<Self> {
        let painter = props.renderer.master_painter();
        let master = Arc::new(Self {
            props,
            primary,
            state: Mutex::new(MasterState {
                painter,
                child: None,
                lines: vec![],
                table: vec![],
                text: None,
                chart: Chart::new(names),
                graph: None,
                start: None,
                active: false,
                cleaned: false,
            }),
        });
        master.primary.set_parent(Arc::downgrade(&master));
        master
    }

    /// The bar of the outer loop
    #[inline(always)]
    pub fn primary(&self) -> &Arc<ProgressBar> {
        &self.primary
    }

    /// The renderer of the master bar and its bars
    #[inline(always)]
    pub fn renderer(&self) -> &Renderer {
        &self.props.renderer
    }

    /// The environment the master bar is drawn in
    #[inline(always)]
    pub fn env(&self) -> Env {
        self.props.renderer.env()
    }

    /// The child bar currently shown
    pub fn current_child(&self) -> Option<Arc<ProgressBar>> {
        self.state.lock().ok()?.child.clone()
    }

    /// Start building a child bar. The bar replaces the current child
    /// when it is built
    ///
    /// ```rust,no_run
    /// # let mb = fastbar::master().total(3).wrap(0..3)?.bar().clone();
    /// for batch in mb.child().wrap(0..100)? {
    ///     // ...
    /// }
    /// let bar = mb.child().total(10).spawn()?;
    /// fastbar::progress!(bar += 10);
    /// # fastbar::Ok(())
    /// ```
    #[inline(always)]
    pub fn child(self: &Arc<Self>) -> BarBuilder {
        BarBuilder::new().parent(Some(Arc::clone(self)))
    }

    /// Show `bar` as the child bar, replacing the current one.
    ///
    /// The bar gets the prefix `Epoch {n}/{total} :` from the primary bar.
    /// In the terminal, the bar draws itself. On a rich surface, it is only
    /// shown in the view of the master bar.
    /// Bars built with [`child`](Self::child) are attached automatically
    pub fn attach_child(self: &Arc<Self>, bar: &Arc<ProgressBar>) {
        let epoch = self.primary.position() + 1;
        bar.set_prefix(format!("Epoch {epoch}/{} :", self.primary.total()));
        bar.set_parent(Arc::downgrade(self));
        // on a rich surface the child is only drawn in the composite
        bar.set_display(self.env() == Env::Terminal);
        if let Ok(mut state) = self.state.lock() {
            state.child = Some(Arc::clone(bar));
        }
        self.show();
    }

    /// Add a line to the report
    pub fn report(&self, line: impl Into<String>) {
        {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let line = line.into();
            state.painter.report_line(&line);
            state.lines.push(line);
            state.update_text();
        }
        self.show();
    }

    /// Add a row to the report table. The first row is the header
    ///
    /// ```rust,no_run
    /// # let mb = fastbar::master().total(3).wrap(0..3)?.bar().clone();
    /// mb.report_table(["epoch", "train_loss", "valid_loss"]);
    /// mb.report_table(["1", "0.512", "0.498"]);
    /// # fastbar::Ok(())
    /// ```
    pub fn report_table<S: ToString>(&self, row: impl IntoIterator<Item = S>) {
        {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let row = row.into_iter().map(|x| x.to_string()).collect::<Vec<_>>();
            let is_header = state.table.is_empty();
            state.painter.report_row(&row, is_header);
            state.table.push(row);
            state.update_text();
        }
        self.show();
    }

    /// Lines reported so far
    pub fn lines(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.lines.clone())
            .unwrap_or_default()
    }

    /// Table rows reported so far, starting with the header
    pub fn table(&self) -> Vec<Vec<String>> {
        self.state
            .lock()
            .map(|s| s.table.clone())
            .unwrap_or_default()
    }

    /// Replace the chart with the lines in `series`.
    ///
    /// The lines are named from the legend names (`train`, `valid` by default),
    /// lines after those are not named. The axes are fitted to the data unless
    /// bounds are given.
    ///
    /// Does nothing if the graph is hidden or in the terminal
    pub fn update_chart(
        &self,
        series: Vec<Series>,
        x_bounds: Option<(f64, f64)>,
        y_bounds: Option<(f64, f64)>,
    ) {
        if !self.has_graph() {
            return;
        }
        {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let state = &mut *state;
            state.chart.set(series, x_bounds, y_bounds);
            state.graph = state.painter.chart_markup(&state.chart);
        }
        self.show();
    }

    /// Show pre-rendered images in a grid with `cols` columns, in place of the chart.
    ///
    /// Each image is a markup fragment (like an `<img>` element). Titles are matched
    /// with images by index. Does nothing if the graph is hidden or in the terminal
    pub fn show_images(&self, images: &[String], titles: &[String], cols: usize) {
        if !self.has_graph() {
            return;
        }
        {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            state.graph = state.painter.images_markup(images, titles, cols);
        }
        self.show();
    }

    /// Current chart content
    pub fn chart(&self) -> Chart {
        self.state
            .lock()
            .map(|s| s.chart.clone())
            .unwrap_or_default()
    }

    fn has_graph(&self) -> bool {
        !self.props.hide_graph && self.env() == Env::Rich
    }

    /// Start the master bar and show it. Does nothing if it is active
    pub fn begin(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.active {
            return;
        }
        state.active = true;
        state.cleaned = false;
        state.start = Some(Instant::now());
        let composite = self.composite(&state, &self.props.order);
        state.painter.begin(&composite);
    }

    /// Re-render the view of the master bar
    pub fn show(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if !state.active || state.cleaned {
            return;
        }
        let composite = self.composite(&state, &self.props.order);
        state.painter.show(&composite);
    }

    /// End the master bar, showing the total time and the final report.
    ///
    /// Calling this more than once has no effect
    pub fn end(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if !state.active {
            return;
        }
        state.active = false;
        if state.cleaned {
            return;
        }
        let summary = match state.start {
            Some(start) if self.props.total_time => Some(format!(
                "Total time: {}",
                format_time(start.elapsed().as_secs_f64())
            )),
            _ => None,
        };
        let order = self
            .props
            .order
            .iter()
            .copied()
            .filter(|r| matches!(r, Region::Text | Region::Chart))
            .collect::<Vec<_>>();
        let composite = self.composite(&state, &order);
        state.painter.end(summary.as_deref(), &composite);
    }

    /// A bar in this master bar was interrupted
    pub(crate) fn on_interrupt(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let clean = self.props.clean_on_interrupt;
        state.painter.interrupt(clean);
        if clean {
            state.cleaned = true;
        }
    }

    /// Lock order is always master then bar
    fn composite(&self, state: &MasterState, order: &[Region]) -> String {
        regions::compose(order, |r| match r {
            Region::Primary => self.primary.markup(),
            Region::Text => state.text.clone(),
            Region::Child => state.child.as_ref().and_then(|c| c.markup()),
            Region::Chart => state.graph.clone(),
        })
    }
}

impl MasterState {
    fn update_text(&mut self) {
        self.text = self.painter.text_markup(&self.lines, &self.table);
    }
}

impl std::fmt::Debug for MasterBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("MasterBar");
        s.field("props", &self.props).field("primary", &self.primary);
        if let Ok(state) = self.state.lock() {
            s.field("child", &state.child)
                .field("lines", &state.lines)
                .field("table", &state.table)
                .field("active", &state.active);
        }
        s.finish_non_exhaustive()
    }
}

/// Iterator of the outer loop of a [`MasterBar`]
///
/// The master bar begins before the first element and ends after
/// the last one. If it is dropped before that, the primary bar is interrupted,
/// then the master bar ends.
#[derive(Debug)]
pub struct MasterIter<I> {
    master: Arc<MasterBar>,
    inner: BarIter<I>,
    started: bool,
}

impl<I: Iterator> MasterIter<I> {
    pub(crate) fn new(master: Arc<MasterBar>, inner: BarIter<I>) -> Self {
        Self {
            master,
            inner,
            started: false,
        }
    }

    /// The master bar handle, to use in the loop
    #[inline(always)]
    pub fn bar(&self) -> &Arc<MasterBar> {
        &self.master
    }
}

impl<I: Iterator> Iterator for MasterIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.master.begin();
        }
        let item = self.inner.next();
        if item.is_none() {
            self.master.end();
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> Drop for MasterIter<I> {
    fn drop(&mut self) {
        if self.started {
            // the primary bar has to show the interruption before the final view
            self.inner.abort();
            self.master.end();
        }
    }
}
