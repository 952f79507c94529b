use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Output sink of the terminal renderer, called with the text and the line ending
pub type Writer = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Process-wide options for progress bars.
///
/// The options are read when a renderer is created. Bars that are already
/// created keep the renderer they were created with.
///
/// ```rust
/// fastbar::update_config(|c| {
///     c.max_width = 80;
///     c.newline_on_end = true;
/// });
/// assert_eq!(fastbar::config().max_width, 80);
/// ```
#[derive(Clone)]
pub struct Config {
    /// Don't print bars in the terminal. Reported lines are still printed
    pub no_bar: bool,
    /// Where the terminal renderer writes. Default prints to stdout
    pub writer: Writer,
    /// Flush stdout after each write
    pub flush: bool,
    /// Mirror everything the terminal renderer writes to this file
    pub save_path: Option<PathBuf>,
    /// Append to the save file instead of truncating it
    pub save_append: bool,
    /// Maximum number of columns used by a bar line
    pub max_width: usize,
    /// If the output is interactive. Default is if stdout is a terminal
    pub interactive: bool,
    /// Use terminal rendering even when a rich display is installed
    pub force_console: bool,
    /// Write a new line when a kept bar ends in the terminal
    pub newline_on_end: bool,
}

impl Default for Config {
    fn default() -> Self {
        use std::io::IsTerminal;
        Self {
            no_bar: false,
            writer: Arc::new(print_stdout),
            flush: true,
            save_path: None,
            save_append: false,
            max_width: 120,
            interactive: std::io::stdout().is_terminal(),
            force_console: false,
            newline_on_end: false,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("no_bar", &self.no_bar)
            .field("flush", &self.flush)
            .field("save_path", &self.save_path)
            .field("save_append", &self.save_append)
            .field("max_width", &self.max_width)
            .field("interactive", &self.interactive)
            .field("force_console", &self.force_console)
            .field("newline_on_end", &self.newline_on_end)
            .finish_non_exhaustive()
    }
}

fn print_stdout(text: &str, end: &str) {
    use std::io::Write;
    let mut stdout = std::io::stdout().lock();
    // _: nowhere to report a broken stdout
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.write_all(end.as_bytes());
}

static CONFIG: Mutex<Option<Config>> = Mutex::new(None);
static FORCE_CONSOLE: AtomicBool = AtomicBool::new(false);

/// Get a copy of the current configuration
pub fn config() -> Config {
    if let Ok(config) = CONFIG.lock()
        && let Some(config) = config.as_ref()
    {
        return config.clone();
    }
    Config::default()
}

/// Replace the configuration
pub fn set_config(config: Config) {
    FORCE_CONSOLE.store(config.force_console, Ordering::Release);
    if let Ok(mut g_config) = CONFIG.lock() {
        *g_config = Some(config);
    }
    crate::render::invalidate_default();
}

/// Change some options of the configuration
pub fn update_config<F: FnOnce(&mut Config)>(f: F) {
    let mut c = config();
    f(&mut c);
    set_config(c);
}

/// If console behavior is forced, without locking the configuration
pub(crate) fn force_console() -> bool {
    FORCE_CONSOLE.load(Ordering::Acquire)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default() {
        let c = Config::default();
        assert!(!c.no_bar);
        assert!(c.flush);
        assert_eq!(c.max_width, 120);
        assert!(c.save_path.is_none());
        assert!(format!("{c:?}").starts_with("Config {"));
    }
}
