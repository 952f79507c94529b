use crate::master::{DEFAULT_ORDER, MasterBar, MasterIter, MasterProps, Region};
use crate::progress::{ProgressBar, Props};
use crate::render::Renderer;

/// Builder for a master bar
#[derive(Debug, Clone)]
pub struct MasterBarBuilder {
    /// Total steps of the outer loop (None = take it from the iterator)
    total: Option<u64>,
    /// Order of the regions from top to bottom
    order: Vec<Region>,
    /// Don't show charts and images
    hide_graph: bool,
    /// Remove the output when a bar is interrupted
    clean_on_interrupt: bool,
    /// Show the total time when the master bar ends
    total_time: bool,
    /// Legend names of the chart lines
    names: Vec<String>,
    /// Renderer to use instead of the default
    renderer: Option<Renderer>,
}

impl Default for MasterBarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterBarBuilder {
    /// Start building a master bar. Note [`fastbar::master`](fn@crate::master) is the canonical shorthand
    pub fn new() -> Self {
        Self {
            total: None,
            order: DEFAULT_ORDER.to_vec(),
            hide_graph: false,
            clean_on_interrupt: false,
            total_time: true,
            names: vec!["train".to_string(), "valid".to_string()],
            renderer: None,
        }
    }

    /// Set the total steps of the outer loop. By default, it is the exact size
    /// of the wrapped iterator
    #[inline(always)]
    pub fn total(mut self, total: usize) -> Self {
        self.total = Some(total as u64);
        self
    }

    /// Set the order of the regions, from top to bottom. Regions that are
    /// not in the order are not shown.
    ///
    /// ```rust
    /// use fastbar::Region;
    /// fastbar::master().order([Region::Child, Region::Primary, Region::Text]);
    /// ```
    pub fn order(mut self, order: impl IntoIterator<Item = Region>) -> Self {
        self.order = order.into_iter().collect();
        self
    }

    /// Don't show charts and images. Default is `false`
    #[inline(always)]
    pub fn hide_graph(mut self, hide: bool) -> Self {
        self.hide_graph = hide;
        self
    }

    /// Remove the output of the master bar when one of its bars is
    /// interrupted. Default is `false`
    #[inline(always)]
    pub fn clean_on_interrupt(mut self, clean: bool) -> Self {
        self.clean_on_interrupt = clean;
        self
    }

    /// Show `Total time: MM:SS` when the master bar ends. Default is `true`
    #[inline(always)]
    pub fn total_time(mut self, show: bool) -> Self {
        self.total_time = show;
        self
    }

    /// Set the legend names of the chart lines. Default is `train`, `valid`
    pub fn names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Draw with this renderer instead of the [default one](crate::renderer)
    pub fn renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Build a master bar that follows the outer loop
    ///
    /// # Errors
    /// If the total is not set and the iterator does not know its exact size
    pub fn wrap<I: IntoIterator>(self, iter: I) -> crate::Result<MasterIter<I::IntoIter>> {
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
        let renderer = self.renderer.unwrap_or_else(crate::renderer);
        let primary = ProgressBar::new(
            Props {
                total,
                auto_update: true,
            },
            false,
            true,
            String::new(),
            renderer.bar_painter(),
        );
        let props = MasterProps {
            order: self.order,
            hide_graph: self.hide_graph,
            clean_on_interrupt: self.clean_on_interrupt,
            total_time: self.total_time,
            renderer,
        };
        let master = MasterBar::new(props, primary, self.names);
        let inner = master.primary().traverse(iter);
        Ok(MasterIter::new(master, inner))
    }
}
