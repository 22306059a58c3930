use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` so it occupies at most `max_width` terminal columns.
///
/// Appends `...` when text is cut and there is room for it. Widths of 3 or
/// less get a plain prefix instead, since an ellipsis alone says nothing.
/// Returns `Cow::Borrowed` whenever the input already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width > ELLIPSIS.len() {
        max_width - ELLIPSIS.len()
    } else {
        max_width
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width > ELLIPSIS.len() {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    } else {
        Cow::Owned(s[..end].to_string())
    }
}

fn is_stripped_control(c: char) -> bool {
    c == '\u{7f}' || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
}

/// Remove terminal control characters and ANSI escape sequences.
///
/// Catalog strings (titles, overviews, cast names) come from a third-party
/// API and are written straight into the terminal, so CSI (`ESC [`) and OSC
/// (`ESC ]`, terminated by BEL or `ESC \`) sequences are dropped whole.
/// Tab, newline and carriage return are kept.
pub fn sanitize(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                // CSI ends at the first byte in 0x40..=0x7e
                for c in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\u{07}' {
                        break;
                    }
                    if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

/// Extract the year from an API date string (`YYYY-MM-DD`).
///
/// The API sends an empty string for unreleased titles, so anything that
/// does not parse yields `None`.
pub fn release_year(date: Option<&str>) -> Option<i32> {
    use chrono::Datelike;

    let date = date?.trim();
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Format a runtime in minutes as `2h 15m`.
pub fn format_runtime(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
