/// Columns and rows are capped at this amount
const MAX_SIZE: usize = 400;

/// Get the terminal width, capped at some internal amount
pub fn term_width() -> Option<usize> {
    term_width_height().map(|x| x.0)
}

/// Get the terminal size as `(width, height)`, capped at some internal amount
pub fn term_width_height() -> Option<(usize, usize)> {
    if cfg!(any(test, feature = "__test")) {
        // fix the size in test
        Some((60, 20))
    } else {
        use terminal_size::*;
        terminal_size().map(|(Width(w), Height(h))| {
            ((w as usize).min(MAX_SIZE), (h as usize).min(MAX_SIZE))
        })
    }
}
