use std::io::Write as _;
use std::sync::OnceLock;
use std::sync::atomic::Ordering;

use env_filter::{Builder as LogEnvBuilder, Filter as LogEnvFilter};

use crate::{ansi, lv};

static LOG_FILTER: OnceLock<LogEnvFilter> = OnceLock::new();

/// Shorthand to quickly setup logging. Can be useful in tests.
///
/// `qq`, `q`, `v` and `vv` inputs map to corresponding print levels. Other inputs
/// are mapped to default level
///
/// ```rust
/// fastbar::log_init("v");
/// fastbar::debug!("now visible");
/// ```
#[doc(alias = "quick_init")]
pub fn log_init(lv: &str) {
    let level = match lv {
        "qq" => lv::Print::QuietQuiet,
        "q" => lv::Print::Quiet,
        "v" => lv::Print::Verbose,
        "vv" => lv::Print::VerboseVerbose,
        _ => lv::Print::Normal,
    };
    init_options(level);
}

/// Set global print options. This is usually called from clap args
///
/// Messages are filtered by `RUST_LOG` if it is set. `QuietQuiet` also
/// turns off printing bars
pub fn init_options(level: lv::Print) {
    // not logging anything, since the logger is not set yet
    let env_rust_log = std::env::var("RUST_LOG");
    let log_level = match env_rust_log {
        Ok(value) if !value.is_empty() => {
            let mut builder = LogEnvBuilder::new();
            let filter = builder.parse(&value).build();
            let log_level = filter.filter();
            let _ = LOG_FILTER.set(filter);
            log_level.max(level.into())
        }
        _ => level.into(),
    };
    log::set_max_level(log_level);

    use std::io::IsTerminal;
    let use_color = std::io::stderr().is_terminal();
    lv::USE_COLOR.store(use_color, Ordering::Release);
    lv::PRINT_LEVEL.store(level as u8, Ordering::Release);
    if level == lv::Print::QuietQuiet {
        crate::update_config(|c| c.no_bar = true);
    }
    let _ = log::set_logger(&LogImpl);
}

struct LogImpl;
impl log::Log for LogImpl {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match LOG_FILTER.get() {
            Some(filter) => filter.enabled(metadata),
            None => lv::log_enabled(metadata.level()),
        }
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format_message(record.level(), &record.args().to_string());
        let mut stderr = std::io::stderr().lock();
        // bars are drawn on the current line of stdout, so messages start on a new one
        let _ = writeln!(stderr, "{message}");
    }

    fn flush(&self) {}
}

/// Format a message with the `X]` prefix of its level
fn format_message(level: log::Level, message: &str) -> String {
    let colors = ansi::colors(lv::color_enabled());
    let (prefix_color, prefix, text_color) = match level {
        log::Level::Error => (colors.red, 'E', colors.red),
        log::Level::Warn => (colors.yellow, 'W', colors.yellow),
        log::Level::Info => (colors.green, 'I', colors.reset),
        log::Level::Debug => (colors.gray, 'D', colors.cyan),
        log::Level::Trace => (colors.magenta, '*', colors.magenta),
    };
    let mut out = String::new();
    for (i, line) in message.lines().enumerate() {
        if i == 0 {
            out.push_str(prefix_color);
            out.push(prefix);
            out.push_str(colors.gray);
            out.push(']');
        } else {
            out.push('\n');
            out.push_str(colors.gray);
            out.push(' ');
            out.push(' ');
        }
        out.push_str(text_color);
        out.push(' ');
        out.push_str(line);
        out.push_str(colors.reset);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_message() {
        lv::USE_COLOR.store(false, Ordering::Release);
        assert_eq!(format_message(log::Level::Warn, "generator is empty"), "W] generator is empty");
        assert_eq!(format_message(log::Level::Error, "a\nb"), "E] a\n   b");
    }
}
