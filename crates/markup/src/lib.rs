//! Scour Markup Tokenizer
//!
//! Error-tolerant HTML/XML-ish tokenizer that turns markup into a stream of
//! structural events. Malformed markup never fails; it degrades to text.

mod attributes;
mod cursor;
mod elements;
mod event;
mod tokenizer;

use std::borrow::Cow;

pub use attributes::{AttributeContext, AttributeReader};
pub use cursor::ScanCursor;
pub use elements::{is_raw_text_element, is_void_element};
pub use event::{Attribute, ClosingToken, Event, Handler};
pub use tokenizer::{is_tag_name, Tokenizer};

/// Tokenize `input` and feed every event to `handler` in document order.
pub fn parse<H: Handler + ?Sized>(input: &str, handler: &mut H) {
    for event in Tokenizer::new(input) {
        event.dispatch(handler);
    }
}

/// Tokenize `input` into a vector of events.
pub fn tokenize(input: &str) -> Vec<Event> {
    Tokenizer::new(input).collect()
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(input: &str) -> Cow<'_, str> {
    if input.contains('\r') {
        Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Handler for Recorder {
        fn open_element(&mut self, name: &str) {
            self.calls.push(format!("open {}", name));
        }

        fn close_opened_element(&mut self, name: &str, token: ClosingToken, is_void: bool) {
            self.calls.push(format!("close-opened {} {} {}", name, token, is_void));
        }

        fn text(&mut self, value: &str) {
            self.calls.push(format!("text {}", value));
        }

        fn close_element(&mut self, name: &str) {
            self.calls.push(format!("close {}", name));
        }
    }

    #[test]
    fn test_parse_dispatches_in_order() {
        let mut recorder = Recorder::default();
        parse("<b>hi</b>", &mut recorder);

        assert_eq!(
            recorder.calls,
            vec!["open b", "close-opened b > false", "text hi", "close b"]
        );
    }

    #[test]
    fn test_parse_skips_unhandled_events() {
        // Recorder has no comment handler; the comment is simply dropped
        let mut recorder = Recorder::default();
        parse("a<!-- c -->b", &mut recorder);

        assert_eq!(recorder.calls, vec!["text a", "text b"]);
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tokenize_normalizes_newlines() {
        let events = tokenize("a\r\nb\r");
        assert_eq!(events, vec![Event::Text("a\nb\n".to_string())]);
    }
}
