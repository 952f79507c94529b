use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

pub(crate) static PRINT_LEVEL: AtomicU8 = AtomicU8::new(Print::Normal as u8);
pub(crate) static USE_COLOR: AtomicBool = AtomicBool::new(true);

/// Get the current print level
pub fn print_level() -> Print {
    PRINT_LEVEL.load(Ordering::Acquire).into()
}

/// Check if messages of `level` are printed at the current print level
pub fn log_enabled(level: log::Level) -> bool {
    print_level().allows(level)
}

/// Get if color printing is enabled
pub fn color_enabled() -> bool {
    USE_COLOR.load(Ordering::Acquire)
}

/// Print level settable with `-v` and `-q` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Print {
    /// Nothing is logged, and bars are not printed
    QuietQuiet,
    /// Only errors
    Quiet,
    Normal,
    /// Debug messages too
    Verbose,
    VerboseVerbose,
}

impl Print {
    /// If a message of `level` is printed at this print level
    #[inline]
    pub fn allows(self, level: log::Level) -> bool {
        level <= log::LevelFilter::from(self)
    }
}

impl From<i8> for Print {
    fn from(value: i8) -> Self {
        match value {
            ..=-2 => Self::QuietQuiet,
            -1 => Self::Quiet,
            0 => Self::Normal,
            1 => Self::Verbose,
            2.. => Self::VerboseVerbose,
        }
    }
}

impl From<u8> for Print {
    fn from(value: u8) -> Self {
        [
            Self::QuietQuiet,
            Self::Quiet,
            Self::Normal,
            Self::Verbose,
            Self::VerboseVerbose,
        ]
        .get(value as usize)
        .copied()
        .unwrap_or(Self::Normal)
    }
}

impl From<Print> for log::LevelFilter {
    fn from(value: Print) -> Self {
        match value {
            Print::QuietQuiet => log::LevelFilter::Off,
            Print::Quiet => log::LevelFilter::Error,
            Print::Normal => log::LevelFilter::Info,
            Print::Verbose => log::LevelFilter::Debug,
            Print::VerboseVerbose => log::LevelFilter::Trace,
        }
    }
}
