//! Attribute reader
//!
//! Reads `name[=value]` pairs inside an open tag or XML prolog, stopping at
//! the closing token of the surrounding context. Stray characters between
//! attributes are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::cursor::ScanCursor;
use crate::event::Attribute;
use crate::tokenizer::{is_name_start, TAG_NAME};

/// `=` with any surrounding whitespace
static EQUALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*=\s*").expect("hardcoded regex is valid"));

/// Unquoted value: runs to whitespace, `>` or end of input
static UNQUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s>]*").expect("hardcoded regex is valid"));

/// Where the attributes being read live, which decides the closing token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeContext {
    /// Ordinary tag, closed by `>` or `/` ... `>`
    Element,
    /// `<?xml ... ?>`, closed by `?>` only
    XmlProlog,
}

/// Iterator over the attributes at the cursor
pub struct AttributeReader<'c> {
    cursor: &'c mut ScanCursor,
    context: AttributeContext,
}

impl<'c> AttributeReader<'c> {
    /// Read attributes starting at the cursor's position
    pub fn new(cursor: &'c mut ScanCursor, context: AttributeContext) -> Self {
        Self { cursor, context }
    }

    /// Check if the cursor sits on the closing token of this context
    fn at_closing_token(&self) -> bool {
        match self.context {
            AttributeContext::XmlProlog => {
                self.cursor.current() == Some('?') && self.cursor.peek(1) == ">"
            }
            AttributeContext::Element => match self.cursor.current() {
                Some('>') => true,
                Some('/') => self.cursor.peek_ignore_whitespace(1) == ">",
                _ => false,
            },
        }
    }

    fn read_attribute(&mut self) -> Attribute {
        let name = self.cursor.read_regex(&TAG_NAME).to_string();

        let has_value = self.cursor.current() == Some('=')
            || self.cursor.peek_ignore_whitespace(1) == "=";
        let value = has_value.then(|| self.read_value());

        Attribute { name, value }
    }

    fn read_value(&mut self) -> String {
        self.cursor.read_regex(&EQUALS);

        match self.cursor.current() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor.advance_by(quote.len_utf8());
                let terminator = if quote == '"' { "\"" } else { "'" };
                let (value, closed) = self.cursor.read_through(terminator);
                let value = value.to_string();
                if !closed {
                    log::trace!("Unterminated attribute value, ran to end of input");
                }
                value
            }
            _ => self.cursor.read_regex(&UNQUOTED_VALUE).to_string(),
        }
    }
}

impl Iterator for AttributeReader<'_> {
    type Item = Attribute;

    fn next(&mut self) -> Option<Attribute> {
        while !self.cursor.is_eof() && !self.at_closing_token() {
            match self.cursor.current() {
                Some(c) if is_name_start(c) => return Some(self.read_attribute()),
                _ => {
                    self.cursor.read(1);
                }
            }
        }
        None
    }
}
