//! Generative checks for the sanitizer
//!
//! Arbitrary input must never break the tokenizer or sanitizer. Generated
//! well-formed documents must round-trip unchanged with the default policy,
//! and removal must be complete and idempotent.

use proptest::prelude::*;

use scour_markup::{tokenize, Event};
use scour_sanitize::{sanitize, RemovalPolicy};

const CONTAINERS: &[&str] = &["div", "p", "span", "b", "font", "section", "style"];
const VOIDS: &[&str] = &["br", "img", "hr", "input"];
const ATTRIBUTES: &[&str] = &["id", "class", "style", "title", "data-x"];

const REMOVED_ELEMENTS: &[&str] = &["font", "style", "img"];
const REMOVED_ATTRIBUTES: &[&str] = &["style", "data-x"];

/// A well-formed document node, written in canonical form
#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Comment(String),
    Void(&'static str, Vec<(&'static str, String)>),
    Element(&'static str, Vec<(&'static str, String)>, Vec<Node>),
}

fn render(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::Void(name, attrs) => {
                render_open(name, attrs, out);
            }
            Node::Element(name, attrs, children) => {
                render_open(name, attrs, out);
                render(children, out);
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

fn render_open(name: &str, attrs: &[(&'static str, String)], out: &mut String) {
    out.push('<');
    out.push_str(name);
    for (attr, value) in attrs {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');
}

fn arb_attrs() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    prop::collection::vec(
        (prop::sample::select(ATTRIBUTES), "[a-z0-9:; ]{1,8}"),
        0..3,
    )
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-z ]{0,12}".prop_map(Node::Text),
        "[a-z ]{0,8}".prop_map(Node::Comment),
        (prop::sample::select(VOIDS), arb_attrs()).prop_map(|(name, attrs)| Node::Void(name, attrs)),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::sample::select(CONTAINERS),
            arb_attrs(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attrs, children)| Node::Element(name, attrs, children))
    })
}

fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_node(), 0..5).prop_map(|nodes| {
        let mut out = String::new();
        render(&nodes, &mut out);
        out
    })
}

fn removal_policy() -> RemovalPolicy {
    RemovalPolicy::new()
        .remove_elements(REMOVED_ELEMENTS)
        .remove_attributes(REMOVED_ATTRIBUTES)
        .remove_comments(true)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any input tokenizes and sanitizes without panicking, and the text
    /// of a tag-free input survives untouched.
    #[test]
    fn arbitrary_input_terminates(input in "\\PC{0,64}") {
        let events = tokenize(&input);
        let _ = sanitize(&input, &removal_policy());

        if !input.contains('<') {
            let expected: Vec<Event> = if input.is_empty() {
                Vec::new()
            } else {
                vec![Event::Text(input.clone())]
            };
            prop_assert_eq!(events, expected);
        }
    }

    /// Markup-heavy noise exercises every recovery path.
    #[test]
    fn markup_noise_terminates(input in "[<>/!?=\"' a-z\\-\\[\\]]{0,64}") {
        let _ = tokenize(&input);
        let _ = sanitize(&input, &removal_policy());
    }

    /// Canonical markup round-trips through the default policy.
    #[test]
    fn default_policy_round_trips(document in arb_document()) {
        prop_assert_eq!(sanitize(&document, &RemovalPolicy::default()), document);
    }

    /// Removed elements and attributes are gone at every depth.
    #[test]
    fn removal_is_complete(document in arb_document()) {
        let output = sanitize(&document, &removal_policy());

        for event in tokenize(&output) {
            match event {
                Event::OpenElement(name) | Event::CloseElement(name) => {
                    prop_assert!(!REMOVED_ELEMENTS.contains(&name.as_str()), "{} in {}", name, output);
                }
                Event::Attribute { name, .. } => {
                    prop_assert!(!REMOVED_ATTRIBUTES.contains(&name.as_str()), "{} in {}", name, output);
                }
                Event::Comment(_) => prop_assert!(false, "comment left in {}", output),
                _ => {}
            }
        }
    }

    /// A second pass finds nothing left to remove.
    #[test]
    fn sanitizing_is_idempotent(document in arb_document()) {
        let policy = removal_policy();
        let once = sanitize(&document, &policy);
        prop_assert_eq!(sanitize(&once, &policy), once);
    }
}
