//! Integration with clap
use std::path::PathBuf;

use crate::lv;

/// Options for printing and progress bars.
///
/// Flatten this into the arguments of the program, and call [`apply`](Flags::apply)
/// after parsing:
/// ```rust,no_run
/// use clap::Parser;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     flags: fastbar::cli::Flags,
///     /// Number of epochs
///     #[clap(long, default_value_t = 5)]
///     epochs: usize,
/// }
///
/// let args = Args::parse();
/// args.flags.apply();
/// ```
#[derive(Debug, Clone, Default, PartialEq, clap::Args)]
pub struct Flags {
    /// Verbose. More -v makes it more verbose (opposite of --quiet)
    #[clap(short = 'v', long, action(clap::ArgAction::Count))]
    verbose: u8,
    /// Quiet. More -q makes it more quiet (opposite of --verbose). -qq also hides the bars
    #[clap(short = 'q', long, action(clap::ArgAction::Count))]
    quiet: u8,
    /// Don't print progress bars. Reported lines are still printed
    #[clap(long)]
    no_bar: bool,
    /// Save the printed output to a file
    #[clap(long, value_name = "PATH")]
    save_to: Option<PathBuf>,
    /// Append to the file of --save-to instead of overwriting it
    #[clap(long, requires = "save_to")]
    append: bool,
    /// Draw the bars in the console, even if a rich display is available
    #[clap(long)]
    console: bool,
    /// Maximum number of columns used by a bar
    #[clap(long, value_name = "COLUMNS")]
    max_width: Option<usize>,
}

impl AsRef<Flags> for Flags {
    fn as_ref(&self) -> &Flags {
        self
    }
}

impl Flags {
    /// Print level from the -v and -q flags
    pub fn level(&self) -> lv::Print {
        let level = self.verbose.clamp(0, 2) as i8 - self.quiet.clamp(0, 2) as i8;
        level.into()
    }

    /// Apply the flags: initialize logging and update the [configuration](crate::Config)
    pub fn apply(&self) {
        crate::init_options(self.level());
        crate::update_config(|c| {
            if self.no_bar {
                c.no_bar = true;
            }
            if let Some(path) = &self.save_to {
                c.save_path = Some(path.clone());
                c.save_append = self.append;
            }
            if self.console {
                c.force_console = true;
            }
            if let Some(width) = self.max_width {
                c.max_width = width;
            }
        });
    }
}
