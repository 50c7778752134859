//! Sanitizer
//!
//! Rebuilds markup from tokenizer events, leaving out whatever the removal
//! policy matches. Two stacks drive it: the open elements, and the entries
//! of that stack whose element is being removed. While any removal is in
//! progress nothing but doctypes reaches the output.

use smallvec::SmallVec;

use scour_markup::{is_raw_text_element, ClosingToken, Handler};

use crate::policy::RemovalPolicy;

/// Elements assumed to be left unclosed. One sitting on top of the stack is
/// popped as soon as any content or other element follows it.
fn is_unclosed_void(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "br" | "col" | "command" | "embed" | "hr" | "img"
        | "input" | "link" | "meta" | "param" | "source"
    )
}

/// Counts of what a sanitizer left out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    /// Removed elements, counting each removed subtree once
    pub elements: usize,
    pub attributes: usize,
    pub comments: usize,
    pub doctypes: usize,
}

/// Event handler that writes sanitized markup
pub struct Sanitizer<'p> {
    policy: &'p RemovalPolicy,
    /// Lowercase names of open elements, outermost first
    open_elements: SmallVec<[String; 16]>,
    /// Indices into `open_elements` of the elements being removed
    ignore_stack: SmallVec<[usize; 4]>,
    output: String,
    stats: RemovalStats,
}

impl<'p> Sanitizer<'p> {
    /// Create a sanitizer applying `policy`
    pub fn new(policy: &'p RemovalPolicy) -> Self {
        Self {
            policy,
            open_elements: SmallVec::new(),
            ignore_stack: SmallVec::new(),
            output: String::new(),
            stats: RemovalStats::default(),
        }
    }

    /// What has been removed so far
    pub fn stats(&self) -> RemovalStats {
        self.stats
    }

    /// Consume the sanitizer, returning the markup
    pub fn into_output(self) -> String {
        self.output
    }

    /// Check if output is currently suppressed by a removed ancestor
    fn is_suppressed(&self) -> bool {
        !self.ignore_stack.is_empty()
    }

    /// Pop the innermost open element, ending its removal if it was the
    /// element being removed.
    fn pop_element(&mut self) -> Option<String> {
        let name = self.open_elements.pop()?;
        if self.ignore_stack.last() == Some(&self.open_elements.len()) {
            self.ignore_stack.pop();
        }
        Some(name)
    }

    fn top_element(&self) -> Option<&str> {
        self.open_elements.last().map(String::as_str)
    }

    /// Pop an unclosed void element left on top of the stack
    fn close_dangling_void(&mut self) {
        if self.top_element().is_some_and(is_unclosed_void) {
            self.pop_element();
        }
    }

    /// Push an element and decide whether it starts a removal
    fn open(&mut self, name: String) {
        self.close_dangling_void();

        let suppressed = self.is_suppressed();
        let index = self.open_elements.len();
        self.open_elements.push(name);
        let name = &self.open_elements[index];

        if suppressed {
            return;
        }
        if self.policy.removes_element(name) {
            log::debug!("Removing <{}>", name);
            self.ignore_stack.push(index);
            self.stats.elements += 1;
            return;
        }
        self.output.push('<');
        self.output.push_str(name);
    }
}

impl Handler for Sanitizer<'_> {
    fn open_element(&mut self, name: &str) {
        self.open(name.to_ascii_lowercase());
    }

    fn xml_prolog(&mut self) {
        self.open("?xml".to_string());
    }

    fn attribute(&mut self, name: &str, value: Option<&str>) {
        if self.is_suppressed() {
            return;
        }

        let name = name.to_ascii_lowercase();
        if self.policy.removes_attribute(&name, value) {
            self.stats.attributes += 1;
            return;
        }

        self.output.push(' ');
        self.output.push_str(&name);
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.output.push_str("=\"");
            self.output.push_str(&value.replace('"', "&quot;"));
            self.output.push('"');
        }
    }

    fn close_opened_element(&mut self, name: &str, token: ClosingToken, _is_void: bool) {
        let name = name.to_ascii_lowercase();
        if token.closes_element() {
            self.pop_element();
        }

        if self.is_suppressed() || self.policy.removes_element(&name) {
            return;
        }
        self.output.push_str(token.as_str());
    }

    fn close_element(&mut self, name: &str) {
        let name = name.to_ascii_lowercase();

        // A void element left open must not swallow its parent's close
        while self
            .top_element()
            .is_some_and(|top| top != name && is_unclosed_void(top))
        {
            self.pop_element();
        }
        if self.top_element() == Some(name.as_str()) {
            self.pop_element();
        }

        if self.is_suppressed() || self.policy.removes_element(&name) {
            return;
        }
        self.output.push_str("</");
        self.output.push_str(&name);
        self.output.push('>');
    }

    fn text(&mut self, value: &str) {
        self.close_dangling_void();
        if !self.is_suppressed() {
            self.output.push_str(value);
        }
    }

    fn comment(&mut self, value: &str) {
        self.close_dangling_void();
        if self.is_suppressed() {
            return;
        }
        if self.policy.removes_comment(value) {
            self.stats.comments += 1;
            return;
        }
        self.output.push_str("<!--");
        self.output.push_str(value);
        self.output.push_str("-->");
    }

    fn doc_type(&mut self, value: &str) {
        if self.policy.removes_doctype(value) {
            self.stats.doctypes += 1;
            return;
        }
        self.output.push_str("<!doctype ");
        self.output.push_str(value);
        self.output.push('>');
    }

    fn cdata(&mut self, value: &str) {
        self.close_dangling_void();
        if self.is_suppressed() {
            return;
        }

        // Raw text bodies go back out unwrapped
        if self.open_elements.iter().any(|name| is_raw_text_element(name)) {
            self.output.push_str(value);
        } else {
            self.output.push_str("<![CDATA[");
            self.output.push_str(value);
            self.output.push_str("]]>");
        }
    }
}
