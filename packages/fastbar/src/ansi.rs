/// Escape codes for the colors of log messages
#[derive(Clone, Copy)]
pub(crate) struct Colors {
    pub reset: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub gray: &'static str,
    pub magenta: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
}

#[inline]
pub(crate) const fn colors(use_color: bool) -> Colors {
    if !use_color {
        return Colors {
            reset: "",
            yellow: "",
            red: "",
            gray: "",
            magenta: "",
            cyan: "",
            green: "",
        };
    }
    Colors {
        reset: "\x1b[0m",
        yellow: "\x1b[93m",
        red: "\x1b[91m",
        gray: "\x1b[90m",
        magenta: "\x1b[95m",
        cyan: "\x1b[96m",
        green: "\x1b[92m",
    }
}

/// Display width of the text in a terminal. Escape sequences take no space
pub(crate) fn width(text: &str) -> usize {
    use unicode_width::UnicodeWidthChar;

    let mut in_escape = false;
    let mut total = 0;
    for c in text.chars() {
        if in_escape {
            in_escape = !ends_escape(c);
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            total += c.width().unwrap_or(0);
        }
    }
    total
}

/// Final byte of the escape sequences this crate prints (colors, cursor moves)
fn ends_escape(c: char) -> bool {
    c.is_ascii() && b"mAKGJBCDEFHSTfhlin".contains(&(c as u8))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_width() {
        assert_eq!(width("Epoch 1/10 :"), 12);
        assert_eq!(width("\x1b[93mW]\x1b[0m hi"), 5);
        assert_eq!(width("\r"), 0);
        assert_eq!(width("\u{2588}\u{2588}--"), 4);
        assert_eq!(width("训练"), 4);
        assert_eq!(colors(false).red, "");
    }
}
