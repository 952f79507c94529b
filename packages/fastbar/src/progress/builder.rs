use std::sync::Arc;

use crate::master::MasterBar;
use crate::progress::{BarIter, ProgressBar, Props, TryBarIter};
use crate::render::Renderer;

/// Builder for a progress bar
#[derive(Debug, Clone)] // Clone sometimes needed to build by ref
pub struct BarBuilder {
    /// Total steps (None = take it from the iterator)
    total: Option<u64>,
    /// If the bar draws itself
    display: bool,
    /// If the bar stays visible after it ends
    leave: bool,
    /// If the traversal moves the bar after each element
    auto_update: bool,
    /// Initial comment
    comment: String,
    /// Master bar to show the bar in, as its child
    parent: Option<Arc<MasterBar>>,
    /// Renderer to use instead of the default
    renderer: Option<Renderer>,
}

impl Default for BarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarBuilder {
    /// Start building a progress bar. Note [`fastbar::progress`](fn@crate::progress) is the canonical shorthand
    pub fn new() -> Self {
        Self {
            total: None,
            display: true,
            leave: true,
            auto_update: true,
            comment: String::new(),
            parent: None,
            renderer: None,
        }
    }

    /// Set the total steps.
    ///
    /// By default, the total is the exact size of the wrapped iterator.
    /// It must be set if the iterator does not know its size, or if the bar
    /// is updated manually.
    ///
    /// ```rust
    /// fastbar::progress().total(10);
    /// ```
    #[inline(always)]
    pub fn total(mut self, total: usize) -> Self {
        self.total = Some(total as u64);
        self
    }

    /// Set the total as a `u64` on platforms where `usize` is less than 64 bits
    #[cfg(not(target_pointer_width = "64"))]
    pub fn total_u64(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Set if the bar draws itself. Default is `true`.
    ///
    /// Ignored for bars in a master bar
    #[inline(always)]
    pub fn display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    /// Set if the bar should stay visible after it ends.
    ///
    /// Default is `true`. Ignored for bars in a master bar, which are always removed
    ///
    /// ```rust
    /// fastbar::progress().leave(false);
    /// ```
    #[inline(always)]
    pub fn leave(mut self, leave: bool) -> Self {
        self.leave = leave;
        self
    }

    /// Set if the traversal moves the bar after each element.
    ///
    /// Default is `true`. If `false`, the bar is moved with
    /// [`progress!`](macro@crate::progress) or [`advance_to`](ProgressBar::advance_to),
    /// and ends when the total is reached.
    #[inline(always)]
    pub fn auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    /// Set the initial comment at the end of the label
    #[inline(always)]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the master bar to show this bar in, as its child.
    ///
    /// If the parent is known to be `Some`, use `master.child()` instead
    pub fn parent(mut self, parent: Option<Arc<MasterBar>>) -> Self {
        self.parent = parent;
        self
    }

    /// Draw with this renderer instead of the [default one](crate::renderer).
    ///
    /// Bars in a master bar always use the renderer of the master bar
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Build a bar that follows the iterator
    ///
    /// # Errors
    /// If the total is not set and the iterator does not know its exact size
    pub fn wrap<I: IntoIterator>(self, iter: I) -> crate::Result<BarIter<I::IntoIter>> {
        let iter = iter.into_iter();
        let total = match self.total {
            Some(total) => total,
            None => match iter.size_hint() {
                (lo, Some(hi)) if lo == hi => lo as u64,
                _ => crate::bail!(
                    "cannot take the total from an iterator without exact size, set it with `.total()`"
                ),
            },
        };
        let bar = self.build(total, self.auto_update);
        Ok(bar.traverse(iter))
    }

    /// Build a bar that follows an iterator of results. See [`TryBarIter`]
    ///
    /// # Errors
    /// If the total is not set and the iterator does not know its exact size
    pub fn try_wrap<T, E, I>(self, iter: I) -> crate::Result<TryBarIter<I::IntoIter>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        Ok(TryBarIter::new(self.wrap(iter)?))
    }

    /// Build a bar that is updated manually, and begin it.
    ///
    /// The bar ends when it reaches the total.
    ///
    /// # Errors
    /// If the total is not set
    pub fn spawn(self) -> crate::Result<Arc<ProgressBar>> {
        let Some(total) = self.total else {
            crate::bail!("a bar that is updated manually needs a total, set it with `.total()`");
        };
        let bar = self.build(total, false);
        bar.begin();
        Ok(bar)
    }

    fn build(&self, total: u64, auto_update: bool) -> Arc<ProgressBar> {
        let props = Props { total, auto_update };
        match &self.parent {
            Some(parent) => {
                let painter = parent.renderer().bar_painter();
                let bar = ProgressBar::new(props, false, false, self.comment.clone(), painter);
                parent.attach_child(&bar);
                bar
            }
            None => {
                let painter = match &self.renderer {
                    Some(r) => r.bar_painter(),
                    None => crate::renderer().bar_painter(),
                };
                ProgressBar::new(props, self.display, self.leave, self.comment.clone(), painter)
            }
        }
    }
}
