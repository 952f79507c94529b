use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPT_REQUESTED: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "ctrlc")]
static INIT_ONCE: std::sync::LazyLock<Result<(), String>> = std::sync::LazyLock::new(|| {
    let set_result = ::ctrlc::try_set_handler(|| {
        if INTERRUPT_REQUESTED.swap(true, Ordering::AcqRel) {
            // second Ctrl-C: the loop did not stop in time
            std::process::exit(130);
        }
    });
    match set_result {
        Err(::ctrlc::Error::MultipleHandlers) => Err(
            "failed to set ctrl-c handler: a handler is already set using the `ctrlc` crate"
                .to_string(),
        ),
        Err(other_error) => Err(format!("failed to set ctrl-c handler: {other_error}")),
        Ok(_) => Ok(()),
    }
});

/// # Handling Ctrl-C
///
/// Install a Ctrl-C handler that stops traversals instead of killing the process.
///
/// After the first Ctrl-C, every traversal adapter ([`BarIter`](crate::BarIter),
/// [`MasterIter`](crate::MasterIter)) stops before its next element and shows its bar
/// as interrupted, so the program can print its results and exit normally.
/// A second Ctrl-C exits the process immediately.
///
/// Calling this more than once is fine. An error is returned if a handler was
/// already set with the `ctrlc` crate directly.
///
/// ```rust,no_run
/// fastbar::catch_ctrlc()?;
/// for _ in fastbar::progress().wrap(0..1000)? {
///     // interrupted by Ctrl-C
/// }
/// if fastbar::ctrlc_requested() {
///     fastbar::warn!("stopped early");
/// }
/// # fastbar::Ok(())
/// ```
#[cfg(feature = "ctrlc")]
pub fn catch_ctrlc() -> crate::Result<()> {
    if let Err(e) = &*INIT_ONCE {
        crate::bail!("{e}");
    }
    Ok(())
}

/// Check if the user requested to stop with Ctrl-C
#[inline(always)]
pub fn ctrlc_requested() -> bool {
    INTERRUPT_REQUESTED.load(Ordering::Acquire)
}

/// Clear the Ctrl-C request, so the next traversals run again
#[inline(always)]
pub fn reset_ctrlc() {
    INTERRUPT_REQUESTED.store(false, Ordering::Release);
}

/// Raise the interrupt request as if Ctrl-C was pressed
#[doc(hidden)]
pub fn __request_interrupt() {
    INTERRUPT_REQUESTED.store(true, Ordering::Release);
}
