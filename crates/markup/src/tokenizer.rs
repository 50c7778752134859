//! Markup Tokenizer
//!
//! Converts markup text into a stream of events. Each step looks at the
//! next one or two characters and hands off to a sub-parser; anything that
//! does not look like markup becomes text.

use std::collections::VecDeque;
use std::mem;
use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::attributes::{AttributeContext, AttributeReader};
use crate::cursor::ScanCursor;
use crate::elements::{is_raw_text_element, is_void_element};
use crate::event::{Attribute, ClosingToken, Event};
use crate::normalize_newlines;

/// Element and attribute names
pub(crate) static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_:-]*").expect("hardcoded regex is valid"));

/// Any closing tag; raw text bodies end at the first one whose name matches
static CLOSE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</([a-zA-Z_][a-zA-Z0-9_:-]*)\s*>").expect("hardcoded regex is valid")
});

static LEADING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*").expect("hardcoded regex is valid"));

/// Check if `c` can start an element or attribute name
pub(crate) fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if `name` is a complete element/attribute name
pub fn is_tag_name(name: &str) -> bool {
    TAG_NAME.find(name).is_some_and(|m| m.end() == name.len())
}

/// Markup tokenizer
///
/// Produces events lazily through [`Iterator`]. Text is buffered until the
/// next structural event or end of input so it is never split.
pub struct Tokenizer {
    cursor: ScanCursor,
    events: VecDeque<Event>,
    text: String,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input
    pub fn new(input: &str) -> Self {
        Self {
            cursor: ScanCursor::new(normalize_newlines(input).into_owned()),
            events: VecDeque::new(),
            text: String::new(),
        }
    }

    /// Get the next event
    pub fn next_event(&mut self) -> Option<Event> {
        while self.events.is_empty() {
            if self.cursor.is_eof() {
                self.flush_text();
                break;
            }
            self.step();
        }
        self.events.pop_front()
    }

    /// Queue an event, flushing pending text in front of it
    fn emit(&mut self, event: Event) {
        self.flush_text();
        self.events.push_back(event);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.events.push_back(Event::Text(mem::take(&mut self.text)));
        }
    }

    /// Execute one dispatch step. Always consumes at least one character.
    fn step(&mut self) {
        let Some(current) = self.cursor.current() else {
            return;
        };

        if current != '<' {
            self.text.push(current);
            self.cursor.read(1);
            return;
        }

        self.cursor.read(1);
        match self.cursor.current() {
            Some('/') => {
                self.cursor.read(1);
                if self.cursor.current().is_some_and(is_name_start) {
                    self.parse_close_element();
                } else {
                    self.literal("</");
                }
            }
            Some('!') => {
                let rest = self.cursor.remainder();
                if rest.starts_with("![CDATA[") {
                    self.parse_cdata();
                } else if rest.starts_with("!--") {
                    self.parse_comment();
                } else if starts_with_ignore_case(rest, "!doctype") {
                    self.parse_doctype();
                } else {
                    self.literal("<");
                }
            }
            Some('?') => {
                if self.cursor.remainder().starts_with("?xml") {
                    self.parse_xml_prolog();
                } else {
                    self.literal("<");
                }
            }
            Some(c) if is_name_start(c) => self.parse_open_element(),
            _ => self.literal("<"),
        }
    }

    /// Keep malformed markup as text. The character after `prefix` goes
    /// with it.
    fn literal(&mut self, prefix: &str) {
        log::trace!(
            "Treating {:?} as text at offset {}",
            prefix,
            self.cursor.position()
        );
        self.text.push_str(prefix);
        if let Some(next) = self.cursor.current() {
            self.text.push(next);
            self.cursor.read(1);
        }
    }

    fn read_name(&mut self) -> String {
        self.cursor.read_regex(&TAG_NAME).to_string()
    }

    fn parse_open_element(&mut self) {
        let name = self.read_name();
        self.emit(Event::OpenElement(name.clone()));

        self.emit_attributes(AttributeContext::Element);

        let token = self.read_closing_token();
        let is_void = is_void_element(&name);
        self.emit(Event::CloseOpenedElement {
            name: name.clone(),
            token,
            is_void,
        });

        if is_raw_text_element(&name) {
            self.parse_raw_text(&name);
        }
    }

    fn emit_attributes(&mut self, context: AttributeContext) {
        let attributes: SmallVec<[Attribute; 4]> =
            AttributeReader::new(&mut self.cursor, context).collect();
        for Attribute { name, value } in attributes {
            self.emit(Event::Attribute { name, value });
        }
    }

    /// Consume `>`, `/>` (possibly `/ >`) or `?>`
    fn read_closing_token(&mut self) -> ClosingToken {
        match self.cursor.current() {
            Some('/') => {
                self.cursor.read_until_non_whitespace();
                self.cursor.read(1);
                ClosingToken::SelfClosing
            }
            Some('?') => {
                self.cursor.read(2);
                ClosingToken::XmlDecl
            }
            _ => {
                self.cursor.read(1);
                ClosingToken::Normal
            }
        }
    }

    /// Read a script/xmp body verbatim up to its closing tag
    fn parse_raw_text(&mut self, name: &str) {
        let rest = self.cursor.remainder();
        let close = CLOSE_TAG
            .captures_iter(rest)
            .find(|caps| caps[1].eq_ignore_ascii_case(name))
            .and_then(|caps| Some((caps.get(0)?, caps.get(1)?.as_str().to_string())));

        let (content_len, consumed, close_name) = match close {
            Some((tag, close_name)) => (tag.start(), tag.end(), Some(close_name)),
            None => (rest.len(), rest.len(), None),
        };
        let content = rest[..content_len].to_string();
        self.cursor.advance_by(consumed);

        if !content.is_empty() {
            self.emit(Event::CData(content));
        }
        match close_name {
            Some(close_name) => self.emit(Event::CloseElement(close_name)),
            None => log::trace!("Unclosed <{}>, raw text ran to end of input", name),
        }
    }

    fn parse_close_element(&mut self) {
        let name = self.read_name();
        self.emit(Event::CloseElement(name));
        // Anything else inside the closing tag is dropped
        self.cursor.read_through(">");
    }

    fn parse_cdata(&mut self) {
        // "![CDATA["
        self.cursor.read(8);
        let content = self.read_terminated("]]>", "CDATA section");
        self.emit(Event::CData(content));
    }

    fn parse_comment(&mut self) {
        // "!--"
        self.cursor.read(3);
        let content = self.read_terminated("-->", "comment");
        self.emit(Event::Comment(content));
    }

    fn parse_doctype(&mut self) {
        // "!doctype"
        self.cursor.read(8);
        self.cursor.read_regex(&LEADING_WHITESPACE);
        let content = self.read_terminated(">", "doctype");
        self.emit(Event::DocType(content));
    }

    fn parse_xml_prolog(&mut self) {
        // "?xml"
        self.cursor.read(4);
        self.emit(Event::XmlProlog);
        self.emit_attributes(AttributeContext::XmlProlog);
        let token = self.read_closing_token();
        self.emit(Event::CloseOpenedElement {
            name: "?xml".to_string(),
            token,
            is_void: false,
        });
    }

    /// Read up to the first `terminator` (or end of input) and step past it
    fn read_terminated(&mut self, terminator: &str, what: &str) -> String {
        let (content, found) = self.cursor.read_through(terminator);
        let content = content.to_string();
        if !found {
            log::trace!("Unterminated {}, ran to end of input", what);
        }
        content
    }
}

impl Iterator for Tokenizer {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.next_event()
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
