/// One line of a chart, as `(x, y)` points
pub type Series = Vec<(f64, f64)>;

/// Content of the chart region of a master bar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    /// Lines to draw
    pub series: Vec<Series>,
    /// Name of each line in the legend.
    ///
    /// Has at least as many names as `series`. Lines without a name
    /// are not listed in the legend
    pub names: Vec<String>,
    /// Fixed range of the x axis, or computed from the data
    pub x_bounds: Option<(f64, f64)>,
    /// Fixed range of the y axis, or computed from the data
    pub y_bounds: Option<(f64, f64)>,
}

impl Chart {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self {
            names,
            ..Self::default()
        }
    }

    /// Replace the content. Names are padded with empty names to cover all series
    pub(crate) fn set(
        &mut self,
        series: Vec<Series>,
        x_bounds: Option<(f64, f64)>,
        y_bounds: Option<(f64, f64)>,
    ) {
        if self.names.len() < series.len() {
            self.names.resize(series.len(), String::new());
        }
        self.series = series;
        self.x_bounds = x_bounds;
        self.y_bounds = y_bounds;
    }

    /// If there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Vec::is_empty)
    }

    /// Range of the x axis. The range is never empty
    pub fn x_range(&self) -> (f64, f64) {
        match self.x_bounds {
            Some((lo, hi)) => widen(lo, hi),
            None => data_range(self.series.iter().flatten().map(|p| p.0)),
        }
    }

    /// Range of the y axis. The range is never empty
    pub fn y_range(&self) -> (f64, f64) {
        match self.y_bounds {
            Some((lo, hi)) => widen(lo, hi),
            None => data_range(self.series.iter().flatten().map(|p| p.1)),
        }
    }
}

/// Min and max of the finite values. The range is never empty
fn data_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    widen(lo, hi)
}

/// Widen a range of a single value
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}
