//! Scan cursor
//!
//! Owns the markup source and a forward-only read position. Counts passed
//! to `peek`/`read` are in characters; the position is a byte offset that
//! always sits on a character boundary.

use regex::Regex;

/// Forward-only cursor over a markup string
#[derive(Debug, Clone)]
pub struct ScanCursor {
    source: String,
    position: usize,
}

impl ScanCursor {
    /// Create a cursor positioned at the start of `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            position: 0,
        }
    }

    /// Current byte offset into the source
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once the whole source has been consumed
    pub fn is_eof(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Character at the current position
    pub fn current(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    /// Unconsumed part of the source, starting with the current character
    pub fn remainder(&self) -> &str {
        &self.source[self.position..]
    }

    /// The `count` characters after the current one, without advancing.
    pub fn peek(&self, count: usize) -> &str {
        let (start, end) = self.lookahead(count);
        &self.source[start..end]
    }

    /// Advance `count` characters and return what `peek(count)` would have
    /// returned beforehand.
    pub fn read(&mut self, count: usize) -> &str {
        if count == 0 {
            return "";
        }
        let (start, end) = self.lookahead(count);
        self.position = self.offset_after(self.position, count);
        &self.source[start..end]
    }

    /// Step forward until the characters read so far no longer end in
    /// whitespace. Returns everything read.
    pub fn read_until_non_whitespace(&mut self) -> String {
        let mut value = String::new();
        while !self.is_eof() {
            value.push_str(self.read(1));
            if !value.ends_with(char::is_whitespace) {
                break;
            }
        }
        value
    }

    /// Consume the match of `pattern` anchored at the current position.
    ///
    /// Returns an empty string and stays put when the pattern does not match
    /// right here.
    pub fn read_regex(&mut self, pattern: &Regex) -> &str {
        let len = match pattern.find(self.remainder()) {
            Some(m) if m.start() == 0 => m.end(),
            _ => 0,
        };
        self.advance_by(len)
    }

    /// Up to `count` non-whitespace characters after the current one.
    pub fn peek_ignore_whitespace(&self, count: usize) -> String {
        self.remainder()
            .chars()
            .skip(1)
            .filter(|c| !c.is_whitespace())
            .take(count)
            .collect()
    }

    /// Consume up to and including the first `terminator`.
    ///
    /// Returns the text before the terminator and whether it was found. A
    /// missing terminator consumes the rest of the input.
    pub fn read_through(&mut self, terminator: &str) -> (&str, bool) {
        match self.remainder().find(terminator) {
            Some(len) => {
                let start = self.position;
                self.position += len + terminator.len();
                (&self.source[start..start + len], true)
            }
            None => {
                let len = self.remainder().len();
                (self.advance_by(len), false)
            }
        }
    }

    /// Consume `len` bytes of the remainder. `len` must land on a character
    /// boundary; it is clamped to the end of input.
    pub fn advance_by(&mut self, len: usize) -> &str {
        let start = self.position;
        self.position = (start + len).min(self.source.len());
        &self.source[start..self.position]
    }

    /// Byte range of the `count` characters following the current one
    fn lookahead(&self, count: usize) -> (usize, usize) {
        if count == 0 || self.is_eof() {
            return (self.position, self.position);
        }
        let start = self.offset_after(self.position, 1);
        (start, self.offset_after(start, count))
    }

    /// Byte offset reached by skipping `count` characters from `from`
    fn offset_after(&self, from: usize, count: usize) -> usize {
        self.source[from..]
            .char_indices()
            .nth(count)
            .map_or(self.source.len(), |(i, _)| from + i)
    }
}
