use std::sync::Arc;

use crate::progress::ProgressBar;

/// Iterator that moves a [`ProgressBar`] while the inner iterator is consumed.
///
/// - The bar begins when the first element is requested.
/// - An element counts as done when the next one is requested, so the bar shows
///   the work done in the loop body.
/// - At most `total` elements are yielded. The bar ends when the inner
///   iterator is exhausted or the total is reached.
/// - If the iterator is dropped before that (`break`, `?` or a panic in the loop),
///   the bar is interrupted and ended right away.
/// - The iteration stops early, as interrupted, after [Ctrl-C](crate::catch_ctrlc).
#[derive(Debug)]
pub struct BarIter<I> {
    bar: Arc<ProgressBar>,
    iter: I,
    /// Number of elements yielded
    index: u64,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    Running,
    Done,
}

impl<I> BarIter<I> {
    pub(crate) fn new(bar: Arc<ProgressBar>, iter: I) -> Self {
        Self {
            bar,
            iter,
            index: 0,
            phase: Phase::NotStarted,
        }
    }

    /// The bar moved by this iterator
    #[inline(always)]
    pub fn bar(&self) -> &Arc<ProgressBar> {
        &self.bar
    }

    /// Stop the iteration as interrupted
    pub(crate) fn abort(&mut self) {
        if self.phase == Phase::Running {
            self.bar.interrupt();
        }
        self.phase = Phase::Done;
    }

    fn finish(&mut self) {
        self.bar.end();
        self.phase = Phase::Done;
    }
}

impl<I: Iterator> Iterator for BarIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Done => return None,
            Phase::NotStarted => {
                self.bar.begin();
                self.phase = Phase::Running;
            }
            Phase::Running => {
                // the previous element is done
                if self.bar.is_auto_update() {
                    self.bar.advance_to(self.index);
                }
            }
        }
        if crate::ctrlc_requested() {
            self.abort();
            return None;
        }
        let total = self.bar.total();
        if self.index >= total || self.bar.position() > total {
            self.finish();
            return None;
        }
        match self.iter.next() {
            Some(item) => {
                self.index += 1;
                Some(item)
            }
            None => {
                self.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.phase == Phase::Done {
            return (0, Some(0));
        }
        let left = self.bar.total().saturating_sub(self.index);
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        let (lo, hi) = self.iter.size_hint();
        (lo.min(left), Some(hi.map_or(left, |hi| hi.min(left))))
    }
}

impl<I> Drop for BarIter<I> {
    fn drop(&mut self) {
        if self.phase == Phase::Running {
            self.bar.interrupt();
        }
    }
}

/// Iterator of results that moves a [`ProgressBar`], like [`BarIter`].
///
/// The first `Err` interrupts and ends the bar, then it is yielded unchanged.
/// Nothing is yielded after it.
///
/// ```rust
/// let lines = vec![Ok(1), Ok(2), Err("bad line"), Ok(4)];
/// let mut sum = 0;
/// let result = fastbar::progress()
///     .display(false)
///     .try_wrap(lines)?
///     .try_for_each(|x| {
///         sum += x?;
///         Ok::<_, &str>(())
///     });
/// assert_eq!(result, Err("bad line"));
/// assert_eq!(sum, 3);
/// # fastbar::Ok(())
/// ```
#[derive(Debug)]
pub struct TryBarIter<I> {
    inner: BarIter<I>,
}

impl<I> TryBarIter<I> {
    pub(crate) fn new(inner: BarIter<I>) -> Self {
        Self { inner }
    }

    /// The bar moved by this iterator
    #[inline(always)]
    pub fn bar(&self) -> &Arc<ProgressBar> {
        self.inner.bar()
    }
}

impl<T, E, I: Iterator<Item = Result<T, E>>> Iterator for TryBarIter<I> {
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(x) => Some(Ok(x)),
            Err(e) => {
                self.inner.abort();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, hi) = self.inner.size_hint();
        (0, hi)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::progress::Props;
    use crate::render::{Frame, Paint};

    struct Silent;
    impl Paint for Silent {
        fn begin(&mut self, _: bool) {}
        fn paint(&mut self, _: &Frame<'_>, _: bool) {}
        fn end(&mut self, _: bool, _: bool) {}
    }

    fn make_bar(total: u64, auto_update: bool) -> Arc<ProgressBar> {
        ProgressBar::new(
            Props { total, auto_update },
            false,
            true,
            String::new(),
            Box::new(Silent),
        )
    }

    #[test]
    fn test_full_traversal() {
        let bar = make_bar(3, true);
        let mut iter = bar.traverse(vec!['a', 'b', 'c']);
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.next(), Some('a'));
        assert!(bar.is_active());
        assert_eq!(bar.position(), 0);
        assert_eq!(iter.next(), Some('b'));
        assert_eq!(bar.position(), 1);
        assert_eq!(iter.next(), Some('c'));
        assert_eq!(iter.next(), None);
        assert_eq!(bar.position(), 3);
        assert!(!bar.is_active());
        assert!(!bar.is_interrupted());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_at_most_total() {
        let bar = make_bar(2, true);
        let items = bar.traverse(0..10).collect::<Vec<_>>();
        assert_eq!(items, vec![0, 1]);
        assert!(!bar.is_interrupted());
    }

    #[test]
    fn test_shorter_than_total() {
        let bar = make_bar(5, true);
        assert_eq!(bar.traverse(0..2).count(), 2);
        assert_eq!(bar.position(), 2);
        assert!(!bar.is_active());
        assert!(!bar.is_interrupted());
    }

    #[test]
    fn test_break_interrupts() {
        let bar = make_bar(5, true);
        for i in bar.traverse(0..5) {
            if i == 2 {
                break;
            }
        }
        assert!(bar.is_interrupted());
        assert!(!bar.is_active());
    }

    #[test]
    fn test_dropped_before_start() {
        let bar = make_bar(5, true);
        drop(bar.traverse(0..5));
        assert!(!bar.is_interrupted());
        assert!(!bar.is_active());
    }

    #[test]
    fn test_manual_position_past_total() {
        let bar = make_bar(3, false);
        let mut seen = vec![];
        for i in bar.traverse(0..10) {
            seen.push(i);
            bar.advance_to(10);
        }
        assert_eq!(seen, vec![0]);
        assert!(!bar.is_interrupted());
    }

    #[test]
    fn test_manual_traversal_does_not_move() {
        let bar = make_bar(3, false);
        let mut iter = bar.traverse(0..3);
        iter.next();
        iter.next();
        assert_eq!(bar.position(), 0);
        bar.advance_to(2);
        assert_eq!(bar.position(), 2);
    }

    #[test]
    fn test_try_traversal_stops_at_error() {
        let bar = make_bar(4, true);
        let items: Vec<Result<i32, String>> =
            vec![Ok(1), Err("boom".to_string()), Ok(3), Ok(4)];
        let mut iter = bar.try_traverse(items);
        assert_eq!(iter.next(), Some(Ok(1)));
        assert_eq!(iter.next(), Some(Err("boom".to_string())));
        assert!(bar.is_interrupted());
        assert!(!bar.is_active());
        assert_eq!(iter.next(), None);
    }
}
