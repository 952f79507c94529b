//! Progress bars for loops, in the terminal or on a rich display surface
//!
//! # General Principal
//! `fastbar` tries to be as short as possible with imports. Everything is
//! exported directly by the crate and should be used as `fastbar::xxx`.
//!
//! Quick Feature Reference:
//! - `ctrlc` (default): Enables [`catch_ctrlc`] to stop loops cleanly on Ctrl-C
//! - `cli`: Enables [`cli::Flags`] for integration with `clap`
//!
//! # Progress Bar
//! Wrap the iterator of a loop to follow it with a bar:
//! ```rust,no_run
//! for item in fastbar::progress().wrap(0..1000)? {
//!     // work on item
//! }
//! # fastbar::Ok(())
//! ```
//! The bar shows the percentage done, the steps, the elapsed time
//! and the estimated remaining time. See [`progress`](fn@progress) for more.
//!
//! # Master Bar
//! For nested loops, like epochs and batches, a master bar shows the outer
//! loop with one child bar for the inner loop, plus a report of lines or
//! a table, and a chart. See [`master`](fn@master).
//!
//! ```rust,no_run
//! let mut epochs = fastbar::master().wrap(0..10)?;
//! let mb = std::sync::Arc::clone(epochs.bar());
//! for epoch in &mut epochs {
//!     for batch in mb.child().wrap(0..100)? {
//!         // train
//!     }
//!     mb.report(format!("finished epoch {epoch}"));
//! }
//! # fastbar::Ok(())
//! ```
//!
//! # Rendering
//! Bars are drawn by a [`Renderer`]. By default, bars are printed as text lines
//! in the terminal. If a [`DisplaySurface`] (like a notebook front-end) is installed
//! with [`install_display`] before the first bar, bars are drawn as markup on the surface
//! instead, and updated in place. The choice is made once per process, see [`env`].
//!
//! Process-wide options, like the output of the terminal renderer, are set with [`Config`].
//!
//! # `log` integration
//! `fastbar` logs warnings through `log`, like when a wrapped iterator is empty.
//! The common `error`, `warn`, `info`, `debug`, `trace` macros are re-exported.
//! [`log_init`] and [`init_options`] install a small logger that prints to stderr,
//! filtered by the print level:
//! |         | `-qq` | ` -q` | `   ` | ` -v` | `-vv` |
//! |-|-      |-     |-       |-     |-      |
//! | [`error!`](crate::error) | ❌ | ✅ | ✅ | ✅ | ✅ |
//! | [`warn!`](crate::warn)  | ❌ | ❌ | ✅ | ✅ | ✅ |
//! | [`info!`](crate::info)  | ❌ | ❌ | ✅ | ✅ | ✅ |
//! | [`debug!`](crate::debug) | ❌ | ❌ | ❌ | ✅ | ✅ |
//! | [`trace!`](crate::trace) | ❌ | ❌ | ❌ | ❌ | ✅ |
//!
//! `-qq` also turns off the bars.
//!
//! The `RUST_LOG` environment variable is also supported in the same
//! way as in [`env_logger`](https://docs.rs/env_logger/latest/env_logger/#enabling-logging).

#![cfg_attr(any(docsrs, feature = "nightly"), feature(doc_auto_cfg))]

mod ansi;

#[cfg(feature = "cli")]
pub mod cli;

mod config;
pub use config::{Config, Writer, config, set_config, update_config};

mod ctrlc;
#[cfg(feature = "ctrlc")]
pub use ctrlc::catch_ctrlc;
#[doc(hidden)]
pub use ctrlc::__request_interrupt;
pub use ctrlc::{ctrlc_requested, reset_ctrlc};

mod error_handling;
pub use error_handling::*;

mod init;
pub use init::{init_options, log_init};

/// Print levels of the logger
pub mod lv;

mod master;
pub use master::{
    Chart, DEFAULT_ORDER, MasterBar, MasterBarBuilder, MasterIter, Region, Series, master,
};

mod progress;
pub use progress::{
    BarBuilder, BarIter, Estimator, ProgressBar, TryBarIter, UPDATE_EVERY, format_time, progress,
};

mod render;
pub use render::{
    DisplayId, DisplaySurface, Env, Plot, Renderer, RichTarget, SvgPlot, TermOutput, env,
    html_progress_bar, html_table, install_display, renderer,
};

mod term;
pub use term::{term_width, term_width_height};

// re-exports from libraries
pub use log::{debug, error, info, trace, warn};
