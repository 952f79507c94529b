pub use anyhow::{Context, Error, Ok, Result, anyhow as fmterr, bail, ensure};

/// # Error Handling
///
/// Errors are [`anyhow`](https://docs.rs/anyhow) errors. The common items are
/// re-exported:
/// - `anyhow::Result` is `fastbar::Result`
/// - `anyhow::bail!`  is `fastbar::bail!`
/// - `anyhow::ensure!` is `fastbar::ensure!`
/// - `anyhow::anyhow!` is `fastbar::fmterr!`
///
/// Bars never fail while drawing. Errors only come from building a bar
/// with an invalid configuration:
/// ```rust
/// let result = fastbar::progress().wrap(std::iter::repeat(1).take_while(|x| *x > 0));
/// assert!(result.is_err());
/// ```
///
/// `fastbar::check!` wraps `.with_context()`
/// ```rust
/// use fastbar::Context as _;
///
/// fn some_fallable_func() -> fastbar::Result<String> {
///     Ok("foo".to_string())
/// }
/// fn main() -> fastbar::Result<()> {
///     let epoch = 3;
///     let foo = fastbar::check!(some_fallable_func(), "failed at epoch {epoch}")?;
///     // with anyhow, this would be:
///     // let foo = some_fallable_func().with_context(|| format!("failed at epoch {epoch}"))?;
///     assert_eq!(foo, "foo");
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! check {
    ($result:expr, $($args:tt)*) => {{
        { $result }.with_context(|| format!($($args)*))
    }};
}
