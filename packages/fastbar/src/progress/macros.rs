/// Update a [progress bar](fn@crate::progress)
///
/// The macro takes 2 parts separated by comma `,`:
/// - An expression for updating the progress:
/// - Optional format args for updating the comment.
///
/// The progress update expression can be one of:
/// - `bar = i`: move the bar to position `i`
/// - `bar += i`: move the bar `i` steps forward
/// - `bar`: don't move the bar
///
/// , where `bar` is an ident
///
/// The format args can be omitted to update the progress without
/// updating the comment. The comment is shown on the next redraw.
///
/// # Examples
/// ```rust
/// let bar = fastbar::progress().total(10).spawn()?;
/// // update the current position and comment
/// let i = 1;
/// fastbar::progress!(bar = i, "loss {:.3}", 0.5);
/// // update the current position without changing the comment
/// fastbar::progress!(bar += 2);
/// // update the comment without moving the bar
/// fastbar::progress!(bar, "almost there");
/// assert_eq!(bar.position(), 3);
/// # fastbar::Ok(())
/// ```
#[macro_export]
macro_rules! progress {
    ($bar:ident, $($fmt_args:tt)*) => {
        $bar.__inc(0u64, Some(format!($($fmt_args)*)))
    };
    ($bar:ident += $inc:expr) => {
        $bar.__inc({ $inc } as u64, None)
    };
    ($bar:ident += $inc:expr, $($fmt_args:tt)*) => {
        $bar.__inc({ $inc } as u64, Some(format!($($fmt_args)*)))
    };
    ($bar:ident = $x:expr) => {
        $bar.__set({ $x } as u64, None)
    };
    ($bar:ident = $x:expr, $($fmt_args:tt)*) => {
        $bar.__set({ $x } as u64, Some(format!($($fmt_args)*)))
    };
}
