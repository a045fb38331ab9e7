//! Fixed-width wrapping for monospace rendering.
//!
//! Widths are terminal columns as reported by `unicode-width`. The breaking rules follow the
//! usual greedy paragraph fill: break on whitespace, keep the first segment's indentation, drop
//! whitespace at segment edges, break after hyphens inside words, and split words that cannot fit
//! on a line of their own across the rest of the current line and the ones after it.

use unicode_width::UnicodeWidthChar;

/// Tab stops are every 8 columns.
pub const TAB_WIDTH: usize = 8;

/// Column width of one character (control characters count as one).
pub fn char_columns(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Column width of a string.
pub fn str_columns(s: &str) -> usize {
    s.chars().map(char_columns).sum()
}

/// Expand tabs to spaces and replace every other whitespace character with a single space.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0usize;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - (col % TAB_WIDTH);
            out.extend(std::iter::repeat_n(' ', pad));
            col += pad;
        } else if ch.is_whitespace() {
            out.push(' ');
            col += 1;
        } else {
            out.push(ch);
            col += char_columns(ch);
        }
    }
    out
}

/// Wrap `text` into segments no wider than `width` columns and no longer than `width` characters.
///
/// Whitespace-only input yields no segments. `width` must be at least 2 so that every
/// character fits on a line.
pub fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let text = normalize_whitespace(text);
    let mut out = Vec::new();
    if text.trim().is_empty() {
        return out;
    }

    let mut line = Line::default();
    for token in tokens(&text) {
        if token.starts_with(' ') {
            // Continuation lines never start with whitespace.
            if line.is_empty() && !out.is_empty() {
                continue;
            }
            if line.fits(token, width) {
                line.push(token);
            } else {
                line.flush_into(&mut out);
            }
            continue;
        }

        if line.fits(token, width) {
            line.push(token);
            continue;
        }
        if str_columns(token) <= width && token.chars().count() <= width {
            line.flush_into(&mut out);
            line.push(token);
            continue;
        }

        // Too long for any line: fill what is left of this one, then whole lines.
        let mut rest = token;
        while !line.fits(rest, width) {
            let split = line.room_for(rest, width);
            if split == 0 {
                if line.is_empty() {
                    let one = rest.chars().next().map_or(rest.len(), char::len_utf8);
                    line.push(&rest[..one]);
                    rest = &rest[one..];
                }
                line.flush_into(&mut out);
                continue;
            }
            line.push(&rest[..split]);
            rest = &rest[split..];
            line.flush_into(&mut out);
        }
        line.push(rest);
    }
    line.flush_into(&mut out);
    out
}

#[derive(Default)]
struct Line {
    text: String,
    cols: usize,
    chars: usize,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    fn fits(&self, s: &str, width: usize) -> bool {
        self.cols + str_columns(s) <= width && self.chars + s.chars().count() <= width
    }

    /// Byte offset of the longest prefix of `s` that still fits on this line.
    fn room_for(&self, s: &str, width: usize) -> usize {
        let mut cols = self.cols;
        let mut chars = self.chars;
        for (i, ch) in s.char_indices() {
            cols += char_columns(ch);
            chars += 1;
            if cols > width || chars > width {
                return i;
            }
        }
        s.len()
    }

    fn push(&mut self, s: &str) {
        self.text.push_str(s);
        self.cols += str_columns(s);
        self.chars += s.chars().count();
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cols = 0;
        self.chars = 0;
    }

    fn flush_into(&mut self, out: &mut Vec<String>) {
        if self.has_content() {
            out.push(self.text.trim_end().to_string());
        }
        self.clear();
    }
}

/// Runs of spaces and words; a word is also split after a hyphen joining two alphanumerics.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let end = if first == ' ' {
            rest.find(|c: char| c != ' ').unwrap_or(rest.len())
        } else {
            word_end(rest)
        };
        let (tok, tail) = rest.split_at(end);
        rest = tail;
        Some(tok)
    })
}

fn word_end(s: &str) -> usize {
    let mut prev: Option<char> = None;
    let mut it = s.char_indices().peekable();
    while let Some((i, c)) = it.next() {
        if c == ' ' {
            return i;
        }
        if c == '-'
            && prev.is_some_and(char::is_alphanumeric)
            && it.peek().is_some_and(|&(_, next)| next.is_alphanumeric())
        {
            return i + 1;
        }
        prev = Some(c);
    }
    s.len()
}

#[cfg(test)]
#[path = "../../tests/unit/diff/wrap.rs"]
mod tests;
