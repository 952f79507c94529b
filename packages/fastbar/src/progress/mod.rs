mod eta;
pub use eta::{Estimator, UPDATE_EVERY, format_time};
mod builder;
pub use builder::BarBuilder;
mod state;
pub use state::ProgressBar;
pub(crate) use state::Props;
mod iter;
pub use iter::{BarIter, TryBarIter};
mod macros;

/// # Progress Bars
/// A bar follows a loop over a sequence with a known number of elements,
/// and shows how far the loop is and how long it has left.
///
/// ## Components
/// The label of a bar looks like this:
/// ```text
/// 25.00% [50/200 01:05<03:15 loss 0.42]
/// ```
/// - Percentage of the steps done
/// - Current and total steps
/// - Elapsed time and estimated remaining time
/// - An optional comment, set while the bar is running
///
/// In a terminal, the label is printed after the bar itself, on a line that is
/// redrawn in place:
/// ```text
///  |████████████------------------------------------| 25.00% [50/200 01:05<03:15]
/// ```
/// On a rich display surface, the bar is a `<progress>` element
/// followed by the label. See [`Renderer`](crate::Renderer).
///
/// ## Redraws
/// The bar is not redrawn on every step. It estimates the time per step
/// and skips enough steps to redraw about every [`UPDATE_EVERY`], so wrapping
/// a fast loop costs almost nothing. The last step is always drawn.
///
/// ## Wrapping an iterator
/// [`wrap`](BarBuilder::wrap) makes an iterator that moves the bar each time an element
/// is done (when the next element is requested).
/// The total is taken from the exact size of the iterator, or can be set with
/// [`total`](BarBuilder::total).
///
/// ```rust
/// for i in fastbar::progress().wrap(0..100)? {
///     // work on i
/// }
/// # fastbar::Ok(())
/// ```
///
/// If the loop stops early (`break`, `?`, or a panic), the bar is shown as interrupted
/// and cleaned up before the loop is left.
///
/// ## Updating the bar manually
/// [`spawn`](BarBuilder::spawn) makes a bar that is updated with the
/// [`progress`](macro@crate::progress) macro. It starts right away, and ends
/// when the total is reached.
///
/// ```rust
/// let bar = fastbar::progress().total(10).spawn()?;
/// for i in 0..10 {
///     fastbar::progress!(bar = i + 1, "step {i}");
/// }
/// assert!(!bar.is_active());
/// # fastbar::Ok(())
/// ```
///
/// ## Options
/// - `display`: if the bar draws itself. Bars in a master bar are drawn by the master bar instead.
/// - `leave`: if the bar stays visible after it ends. Default is `true`, `false` for child bars
/// - `comment`: initial comment
#[inline(always)]
pub fn progress() -> BarBuilder {
    BarBuilder::new()
}
