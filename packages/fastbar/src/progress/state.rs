use std::sync::{Arc, Mutex, Weak};
use std::time::Instant;

use crate::master::MasterBar;
use crate::progress::{BarIter, Estimator, TryBarIter, format_time};
use crate::render::{Frame, Paint};

/// Handle for a progress bar (This is the internal state, the handle is `Arc<ProgressBar>`)
///
/// See [Progress Bars](fn@crate::progress)
pub struct ProgressBar {
    props: Props,
    state: Mutex<State>,
}

/// Immutable properties of a bar
#[derive(Debug, Clone, Copy)]
pub(crate) struct Props {
    /// Total steps
    pub total: u64,
    /// If the traversal moves the bar after each element
    pub auto_update: bool,
}

/// Internal mutable state
struct State {
    /// If the bar draws itself
    display: bool,
    /// If the bar stays visible after it ends
    leave: bool,
    prefix: String,
    comment: String,
    position: u64,
    eta: Estimator,
    active: bool,
    interrupted: bool,
    /// The empty warning is only logged once
    warned_empty: bool,
    /// Master bar this bar is shown in, as the primary or the child
    parent: Option<Weak<MasterBar>>,
    painter: Box<dyn Paint>,
}

impl ProgressBar {
    pub(crate) fn new(
        props: Props,
        display: bool,
        leave: bool,
        comment: String,
        painter: Box<dyn Paint>,
    ) -> Arc<Self> {
        Arc::new(Self {
            props,
            state: Mutex::new(State {
                display,
                leave,
                prefix: String::new(),
                comment,
                position: 0,
                eta: Estimator::new(),
                active: false,
                interrupted: false,
                warned_empty: false,
                parent: None,
                painter,
            }),
        })
    }

    /// Total steps of the bar
    #[inline(always)]
    pub fn total(&self) -> u64 {
        self.props.total
    }

    /// Current position
    pub fn position(&self) -> u64 {
        self.state.lock().map(|s| s.position).unwrap_or_default()
    }

    /// If the bar has begun and not ended
    pub fn is_active(&self) -> bool {
        self.state.lock().map(|s| s.active).unwrap_or_default()
    }

    /// If the last run of the bar was interrupted
    pub fn is_interrupted(&self) -> bool {
        self.state.lock().map(|s| s.interrupted).unwrap_or_default()
    }

    /// If the traversal moves the bar after each element
    #[inline(always)]
    pub fn is_auto_update(&self) -> bool {
        self.props.auto_update
    }

    /// The comment at the end of the label
    pub fn comment(&self) -> String {
        self.state
            .lock()
            .map(|s| s.comment.clone())
            .unwrap_or_default()
    }

    /// Set the comment at the end of the label. It is shown on the next redraw
    pub fn set_comment(&self, comment: impl Into<String>) {
        if let Ok(mut bar) = self.state.lock() {
            bar.comment = comment.into();
        }
    }

    /// The context displayed before the bar
    pub fn prefix(&self) -> String {
        self.state
            .lock()
            .map(|s| s.prefix.clone())
            .unwrap_or_default()
    }

    /// Set the context displayed before the bar (like `Epoch 1/10 :`)
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        if let Ok(mut bar) = self.state.lock() {
            bar.prefix = prefix.into();
        }
    }

    pub(crate) fn set_display(&self, display: bool) {
        if let Ok(mut bar) = self.state.lock() {
            bar.display = display;
        }
    }

    pub(crate) fn set_parent(&self, parent: Weak<MasterBar>) {
        if let Ok(mut bar) = self.state.lock() {
            bar.parent = Some(parent);
        }
    }

    fn parent(&self) -> Option<Arc<MasterBar>> {
        let bar = self.state.lock().ok()?;
        bar.parent.as_ref()?.upgrade()
    }

    /// Latest renderable of the bar, used by the master bar
    pub(crate) fn markup(&self) -> Option<String> {
        let bar = self.state.lock().ok()?;
        bar.painter.markup().map(str::to_string)
    }

    /// Start a run of the bar at position 0. Does nothing if the bar is active
    pub fn begin(&self) {
        {
            let Ok(mut bar) = self.state.lock() else {
                return;
            };
            if bar.active {
                return;
            }
            bar.begin(&self.props);
        }
        self.notify_parent();
    }

    /// Move the bar to `position`, redrawing it if a redraw is due.
    ///
    /// The bar begins if it is not active. Position `0` starts the run over.
    /// A bar that is not updated by its traversal ends when `position` reaches the total
    pub fn advance_to(&self, position: u64) {
        let (painted, ended) = {
            let Ok(mut bar) = self.state.lock() else {
                return;
            };
            if !bar.active {
                bar.begin(&self.props);
            }
            bar.position = position;
            let now = Instant::now();
            if position == 0 {
                bar.eta.reset(now);
                bar.paint(&self.props);
                (true, false)
            } else if bar.eta.observe(position, self.props.total, now) {
                bar.paint(&self.props);
                (true, !self.props.auto_update && position >= self.props.total)
            } else {
                (false, false)
            }
        };
        if painted {
            self.notify_parent();
        }
        if ended {
            self.end();
        }
    }

    /// Move the bar `n` steps forward
    pub fn advance_by(&self, n: u64) {
        let position = self.position().saturating_add(n);
        self.advance_to(position);
    }

    /// Show the bar as interrupted, then end it.
    ///
    /// The master bar the bar is in (if any) is told first.
    pub fn interrupt(&self) {
        if let Some(master) = self.parent() {
            master.on_interrupt();
        }
        let painted = {
            let Ok(mut bar) = self.state.lock() else {
                return;
            };
            if bar.active {
                bar.interrupted = true;
                bar.paint(&self.props);
            }
            bar.active
        };
        if painted {
            self.notify_parent();
        }
        self.end();
    }

    /// End the run. The bar is erased if it does not `leave`.
    ///
    /// Calling this more than once has no effect
    pub fn end(&self) {
        if let Ok(mut bar) = self.state.lock() {
            if !bar.active {
                return;
            }
            bar.active = false;
            let (leave, display) = (bar.leave, bar.display);
            bar.painter.end(leave, display);
        }
    }

    /// Follow the iterator with this bar. See [`BarIter`]
    pub fn traverse<I: IntoIterator>(self: &Arc<Self>, iter: I) -> BarIter<I::IntoIter> {
        BarIter::new(Arc::clone(self), iter.into_iter())
    }

    /// Follow an iterator of results with this bar. See [`TryBarIter`]
    pub fn try_traverse<T, E, I>(self: &Arc<Self>, iter: I) -> TryBarIter<I::IntoIter>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        TryBarIter::new(self.traverse(iter))
    }

    #[doc(hidden)]
    #[inline(always)]
    pub fn __set(&self, current: u64, message: Option<String>) {
        if let Some(x) = message {
            self.set_comment(x);
        }
        self.advance_to(current);
    }

    #[doc(hidden)]
    #[inline(always)]
    pub fn __inc(&self, amount: u64, message: Option<String>) {
        if let Some(x) = message {
            self.set_comment(x);
        }
        if amount != 0 {
            self.advance_by(amount);
        }
    }

    /// Redraw the master bar this bar is in. The bar lock must not be held
    fn notify_parent(&self) {
        if let Some(master) = self.parent() {
            master.show();
        }
    }
}

impl std::fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ProgressBar");
        s.field("total", &self.props.total)
            .field("auto_update", &self.props.auto_update);
        if let Ok(bar) = self.state.lock() {
            s.field("position", &bar.position)
                .field("active", &bar.active)
                .field("interrupted", &bar.interrupted)
                .field("comment", &bar.comment);
        }
        s.finish_non_exhaustive()
    }
}

impl State {
    fn begin(&mut self, props: &Props) {
        self.active = true;
        self.interrupted = false;
        self.position = 0;
        self.painter.begin(self.display);
        self.eta.reset(Instant::now());
        self.paint(props);
    }

    fn paint(&mut self, props: &Props) {
        let label = self.label(props.total);
        let frame = Frame {
            value: self.position,
            total: props.total,
            label: &label,
            prefix: &self.prefix,
            interrupted: self.interrupted,
        };
        self.painter.paint(&frame, self.display);
    }

    fn label(&mut self, total: u64) -> String {
        if total == 0 {
            if !self.warned_empty {
                self.warned_empty = true;
                crate::warn!("generator is empty");
            }
            return "100% [0/0]".to_string();
        }
        format_label(
            self.position,
            total,
            self.eta.elapsed(),
            self.eta.remaining(),
            &self.comment,
        )
    }
}

/// Format the label of a bar, like `25.00% [50/200 01:05<03:15 comment]`
pub(crate) fn format_label(
    position: u64,
    total: u64,
    elapsed: f64,
    remaining: f64,
    comment: &str,
) -> String {
    let pct = 100.0 * position as f64 / total as f64;
    let elapsed = format_time(elapsed);
    let remaining = format_time(remaining);
    if comment.is_empty() {
        format!("{pct:.2}% [{position}/{total} {elapsed}<{remaining}]")
    } else {
        format!("{pct:.2}% [{position}/{total} {elapsed}<{remaining} {comment}]")
    }
}
