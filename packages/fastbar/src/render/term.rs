use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::Config;
use crate::ansi;
use crate::master::Chart;
use crate::render::{Frame, MasterPaint, Paint};

/// Maximum number of columns used by the bar itself
const BAR_LENGTH: usize = 50;
/// Character for the filled part of the bar
const FILL: char = '\u{2588}';
/// Columns taken by the decorations around the bar (` |`, `| `)
/// plus one spare column so the cursor does not wrap
const DECORATION_WIDTH: usize = 5;
/// Header cells of a reported table are padded to at least this width
const MIN_COLUMN_WIDTH: usize = 8;

/// Save files opened by this process, by path.
///
/// Renderers are rebuilt when the configuration changes, so the files
/// outlive them. A path is only truncated the first time it is opened
static SAVE_FILES: Mutex<Option<HashMap<PathBuf, SaveFile>>> = Mutex::new(None);

/// Output of the terminal renderer
///
/// Holds a snapshot of the [`Config`] taken when the renderer was made.
/// Everything written is mirrored to the save file of the configuration
pub struct TermOutput {
    config: Config,
}

enum SaveFile {
    Open(File),
    /// Opening failed, don't try again
    Failed,
}

impl TermOutput {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    /// If bars should be printed
    pub fn printing(&self) -> bool {
        if self.config.no_bar {
            return false;
        }
        self.config.interactive || crate::render::rich_available()
    }

    /// Number of columns available
    pub fn columns(&self) -> usize {
        let max = self.config.max_width;
        crate::term_width().unwrap_or(max).min(max)
    }

    /// Write to the output and the save file
    pub fn write(&self, text: &str, end: &str) {
        (self.config.writer)(text, end);
        if self.config.flush {
            let _ = std::io::stdout().flush();
        }
        self.mirror(text, end);
    }

    fn mirror(&self, text: &str, end: &str) {
        let Some(path) = &self.config.save_path else {
            return;
        };
        let Ok(mut files) = SAVE_FILES.lock() else {
            return;
        };
        let save = files
            .get_or_insert_with(HashMap::new)
            .entry(path.clone())
            .or_insert_with(|| {
                let mut options = OpenOptions::new();
                options.create(true);
                if self.config.save_append {
                    options.append(true);
                } else {
                    options.write(true).truncate(true);
                }
                match options.open(path) {
                    Ok(file) => SaveFile::Open(file),
                    Err(e) => {
                        crate::warn!("failed to open save file '{}': {e}", path.display());
                        SaveFile::Failed
                    }
                }
            });
        if let SaveFile::Open(file) = save {
            // _: mirroring is best effort
            let _ = write!(file, "{text}{end}");
            if self.config.flush {
                let _ = file.flush();
            }
        }
    }

    fn newline_on_end(&self) -> bool {
        self.config.newline_on_end
    }
}

/// Format a bar line for the terminal: `\r{prefix} |█████-----| {label}`
pub(crate) fn format_bar_line(frame: &Frame<'_>, columns: usize) -> String {
    let reserved = ansi::width(frame.prefix) + ansi::width(frame.label) + DECORATION_WIDTH;
    let length = BAR_LENGTH.min(columns.saturating_sub(reserved));
    let filled = if frame.total == 0 {
        length
    } else {
        // u128 so large totals do not overflow
        (length as u128 * frame.value.min(frame.total) as u128 / frame.total as u128) as usize
    };
    let mut out = String::with_capacity(columns * 3);
    out.push('\r');
    out.push_str(frame.prefix);
    out.push_str(" |");
    for _ in 0..filled {
        out.push(FILL);
    }
    for _ in filled..length {
        out.push('-');
    }
    out.push_str("| ");
    out.push_str(frame.label);
    out
}

/// Terminal painter for one bar
pub(crate) struct TermBar {
    out: Arc<TermOutput>,
    /// The prefix of the last frame, kept when the line is erased
    prefix: String,
    /// Width of the longest line drawn
    max_len: usize,
}

impl TermBar {
    pub fn new(out: Arc<TermOutput>) -> Self {
        Self {
            out,
            prefix: String::new(),
            max_len: 0,
        }
    }
}

impl Paint for TermBar {
    fn begin(&mut self, _: bool) {}

    fn paint(&mut self, frame: &Frame<'_>, display: bool) {
        // the terminal does not show an interrupted state
        if !display || frame.interrupted {
            return;
        }
        let line = format_bar_line(frame, self.out.columns());
        self.max_len = self.max_len.max(ansi::width(&line));
        if frame.prefix != self.prefix {
            self.prefix.clear();
            self.prefix.push_str(frame.prefix);
        }
        if self.out.printing() {
            self.out.write(&line, "\r");
        }
    }

    fn end(&mut self, leave: bool, _: bool) {
        if self.max_len == 0 {
            // nothing drawn
            return;
        }
        if !self.out.printing() {
            return;
        }
        if !leave {
            let prefix_len = ansi::width(&self.prefix);
            let mut line = String::with_capacity(self.max_len + 1);
            line.push('\r');
            line.push_str(&self.prefix);
            for _ in prefix_len..self.max_len {
                line.push(' ');
            }
            self.out.write(&line, "\r");
        } else if self.out.newline_on_end() {
            self.out.write("", "\n");
        }
        self.max_len = 0;
    }
}

/// Terminal painter for a master bar
///
/// Child bars draw their own lines, so this only prints reported lines once
pub(crate) struct TermMaster {
    out: Arc<TermOutput>,
    /// Width of each column, set by the header of the table
    column_widths: Vec<usize>,
}

impl TermMaster {
    pub fn new(out: Arc<TermOutput>) -> Self {
        Self {
            out,
            column_widths: vec![],
        }
    }
}

impl MasterPaint for TermMaster {
    fn begin(&mut self, _: &str) {}

    fn show(&mut self, _: &str) {}

    fn report_line(&mut self, line: &str) {
        self.out.write(line, "\n");
    }

    fn report_row(&mut self, row: &[String], is_header: bool) {
        if is_header {
            self.column_widths = row
                .iter()
                .map(|name| ansi::width(name).max(MIN_COLUMN_WIDTH))
                .collect();
        }
        let mut text = String::new();
        for (cell, width) in row.iter().zip(&self.column_widths) {
            text.push_str(cell);
            for _ in ansi::width(cell)..*width {
                text.push(' ');
            }
        }
        self.out.write(&text, "\n");
    }

    fn text_markup(&self, _: &[String], _: &[Vec<String>]) -> Option<String> {
        None
    }

    fn chart_markup(&mut self, _: &Chart) -> Option<String> {
        None
    }

    fn images_markup(&mut self, _: &[String], _: &[String], _: usize) -> Option<String> {
        None
    }

    fn interrupt(&mut self, _: bool) {}

    fn end(&mut self, summary: Option<&str>, _: &str) {
        if let Some(summary) = summary {
            self.out.write(summary, "\n");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn capture(config: Config) -> (Arc<TermOutput>, Arc<Mutex<String>>) {
        let buf = Arc::new(Mutex::new(String::new()));
        let config = {
            let buf = Arc::clone(&buf);
            Config {
                interactive: true,
                flush: false,
                writer: Arc::new(move |text, end| {
                    if let Ok(mut buf) = buf.lock() {
                        buf.push_str(text);
                        buf.push_str(end);
                    }
                }),
                ..config
            }
        };
        (Arc::new(TermOutput::new(config)), buf)
    }

    fn frame<'a>(value: u64, total: u64, label: &'a str, prefix: &'a str) -> Frame<'a> {
        Frame {
            value,
            total,
            label,
            prefix,
            interrupted: false,
        }
    }

    #[test]
    fn test_bar_line() {
        let line = format_bar_line(&frame(5, 10, "50.00% [5/10 00:01<00:01]", ""), 200);
        let bar = format!("{}{}", "\u{2588}".repeat(25), "-".repeat(25));
        assert_eq!(line, format!("\r |{bar}| 50.00% [5/10 00:01<00:01]"));
    }

    #[test]
    fn test_bar_line_narrow() {
        // 40 columns - (0 + 10 + 5) reserved = 25 columns for the bar
        let line = format_bar_line(&frame(10, 10, "100.00% []", ""), 40);
        assert_eq!(line, format!("\r |{}| 100.00% []", "\u{2588}".repeat(25)));
        // no space at all
        let line = format_bar_line(&frame(1, 10, "label", "Epoch 1/2 :"), 3);
        assert_eq!(line, "\rEpoch 1/2 : || label");
    }

    #[test]
    fn test_bar_line_large_total() {
        let total = u64::MAX / 10;
        let line = format_bar_line(&frame(total, total, "x", ""), 200);
        assert_eq!(line, format!("\r |{}| x", "\u{2588}".repeat(50)));
        let line = format_bar_line(&frame(total / 2, total, "x", ""), 200);
        assert_eq!(line.matches('\u{2588}').count(), 24);
        assert_eq!(line.matches('-').count(), 26);
    }

    #[test]
    fn test_bar_line_empty_total() {
        let line = format_bar_line(&frame(0, 0, "100% [0/0]", ""), 200);
        assert_eq!(line, format!("\r |{}| 100% [0/0]", "\u{2588}".repeat(50)));
    }

    #[test]
    fn test_erase_keeps_prefix() {
        let (out, buf) = capture(Config::default());
        let mut bar = TermBar::new(out);
        bar.begin(true);
        bar.paint(&frame(1, 2, "50.00% [1/2 00:00<00:00]", "Epoch 1/3 :"), true);
        bar.end(false, true);
        let buf = buf.lock().unwrap();
        let (drawn, erased) = buf.split_once("\r\r").unwrap();
        assert!(drawn.starts_with("\rEpoch 1/3 : |"));
        assert!(erased.starts_with("Epoch 1/3 :"));
        assert!(erased.ends_with("\r"));
        assert_eq!(
            ansi::width(erased.trim_end_matches('\r')),
            ansi::width(drawn)
        );
    }

    #[test]
    fn test_end_twice_erases_once() {
        let (out, buf) = capture(Config::default());
        let mut bar = TermBar::new(out);
        bar.paint(&frame(1, 2, "x", ""), true);
        bar.end(false, true);
        let len = buf.lock().unwrap().len();
        bar.end(false, true);
        assert_eq!(buf.lock().unwrap().len(), len);
    }

    #[test]
    fn test_hidden_and_suppressed() {
        let (out, buf) = capture(Config::default());
        let mut bar = TermBar::new(out);
        bar.paint(&frame(1, 2, "x", ""), false);
        bar.end(false, false);
        assert!(buf.lock().unwrap().is_empty());

        let (out, buf) = capture(Config {
            no_bar: true,
            ..Config::default()
        });
        let mut bar = TermBar::new(out);
        bar.paint(&frame(1, 2, "x", ""), true);
        bar.end(false, true);
        assert!(buf.lock().unwrap().is_empty());
    }

    #[test]
    fn test_newline_on_end() {
        let (out, buf) = capture(Config {
            newline_on_end: true,
            ..Config::default()
        });
        let mut bar = TermBar::new(out);
        bar.paint(&frame(2, 2, "done", ""), true);
        bar.end(true, true);
        assert!(buf.lock().unwrap().ends_with("| done\r\n"));
    }

    #[test]
    fn test_table_rows_padded() {
        let (out, buf) = capture(Config::default());
        let mut master = TermMaster::new(out);
        let header = vec!["epoch".to_string(), "train_loss".to_string()];
        master.report_row(&header, true);
        master.report_row(&["1".to_string(), "0.25".to_string()], false);
        assert_eq!(
            buf.lock().unwrap().as_str(),
            "epoch   train_loss\n1       0.25      \n"
        );
    }

    #[test]
    fn test_mirror_to_save_file() {
        let dir = std::env::temp_dir().join(format!("fastbar-save-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("log.txt");
        std::fs::write(&path, "old\n").unwrap();

        let (out, _) = capture(Config {
            save_path: Some(path.clone()),
            save_append: false,
            ..Config::default()
        });
        out.write("hello", "\n");
        out.write("world", "\n");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\nworld\n");

        let (out, _) = capture(Config {
            save_path: Some(path.clone()),
            save_append: true,
            ..Config::default()
        });
        out.write("again", "\n");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "hello\nworld\nagain\n"
        );

        // a new output on the same path does not truncate it again
        let (out, _) = capture(Config {
            save_path: Some(path.clone()),
            save_append: false,
            max_width: 80,
            ..Config::default()
        });
        out.write("more", "\n");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "hello\nworld\nagain\nmore\n"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
