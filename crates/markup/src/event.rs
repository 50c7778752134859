//! Markup events
//!
//! The tokenizer's output: a flat stream of structural events in document
//! order, plus a handler trait for callback-style consumers.

use std::fmt;

use serde::Serialize;

/// Literal sequence that ends an open tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClosingToken {
    /// `>`
    #[serde(rename = ">")]
    Normal,
    /// `/>`
    #[serde(rename = "/>")]
    SelfClosing,
    /// `?>`, ends an XML prolog
    #[serde(rename = "?>")]
    XmlDecl,
}

impl ClosingToken {
    /// The token as written in markup
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => ">",
            Self::SelfClosing => "/>",
            Self::XmlDecl => "?>",
        }
    }

    /// True for `/>` and `?>`, which close the element they end.
    pub fn closes_element(self) -> bool {
        self.as_str().len() == 2
    }
}

impl fmt::Display for ClosingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `name[=value]` pair from an open tag or XML prolog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` when the attribute had no `=` at all (`disabled`)
    pub value: Option<String>,
}

/// A markup event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Event {
    /// Start of an open tag (`<name`)
    OpenElement(String),
    /// Attribute inside the most recent open tag or prolog
    Attribute {
        name: String,
        value: Option<String>,
    },
    /// End of an open tag
    CloseOpenedElement {
        name: String,
        token: ClosingToken,
        is_void: bool,
    },
    /// Closing tag (`</name>`)
    CloseElement(String),
    /// Character data between tags
    Text(String),
    /// Comment body
    Comment(String),
    /// CDATA section or raw text element body
    CData(String),
    /// Document type declaration body
    DocType(String),
    /// Start of `<?xml ... ?>`
    XmlProlog,
}

impl Event {
    /// Forward this event to the matching handler method.
    pub fn dispatch<H: Handler + ?Sized>(&self, handler: &mut H) {
        match self {
            Event::OpenElement(name) => handler.open_element(name),
            Event::Attribute { name, value } => handler.attribute(name, value.as_deref()),
            Event::CloseOpenedElement { name, token, is_void } => {
                handler.close_opened_element(name, *token, *is_void)
            }
            Event::CloseElement(name) => handler.close_element(name),
            Event::Text(value) => handler.text(value),
            Event::Comment(value) => handler.comment(value),
            Event::CData(value) => handler.cdata(value),
            Event::DocType(value) => handler.doc_type(value),
            Event::XmlProlog => handler.xml_prolog(),
        }
    }
}

/// Callback set for [`crate::parse`]. Every method defaults to a no-op, so
/// implementors only override the events they care about.
pub trait Handler {
    fn open_element(&mut self, _name: &str) {}

    fn attribute(&mut self, _name: &str, _value: Option<&str>) {}

    fn close_opened_element(&mut self, _name: &str, _token: ClosingToken, _is_void: bool) {}

    fn close_element(&mut self, _name: &str) {}

    fn text(&mut self, _value: &str) {}

    fn comment(&mut self, _value: &str) {}

    fn cdata(&mut self, _value: &str) {}

    fn doc_type(&mut self, _value: &str) {}

    fn xml_prolog(&mut self) {}
}
