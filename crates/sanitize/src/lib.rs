//! Scour Sanitizer
//!
//! Strips elements, attributes, comments and doctypes from markup by
//! replaying the tokenizer's events and rebuilding the markup without them.
//! Removing an element removes everything inside it.

mod config;
mod error;
mod policy;
mod sanitizer;

pub use config::RemovalConfig;
pub use error::{SanitizeError, SanitizeResult};
pub use policy::RemovalPolicy;
pub use sanitizer::{RemovalStats, Sanitizer};

/// Sanitize `input` according to `policy`.
///
/// With the default policy this only reformats: element and attribute
/// names are lowercased and attribute values are double-quoted.
///
/// ```
/// use scour_sanitize::{sanitize, RemovalPolicy};
///
/// let policy = RemovalPolicy::new().remove_comments(true);
/// assert_eq!(sanitize("<!-- secret --><p>ok</p>", &policy), "<p>ok</p>");
/// ```
pub fn sanitize(input: &str, policy: &RemovalPolicy) -> String {
    let mut sanitizer = Sanitizer::new(policy);
    scour_markup::parse(input, &mut sanitizer);

    let stats = sanitizer.stats();
    let output = sanitizer.into_output();
    log::debug!(
        "Sanitized {} bytes into {} bytes (removed {} elements, {} attributes, {} comments, {} doctypes)",
        input.len(),
        output.len(),
        stats.elements,
        stats.attributes,
        stats.comments,
        stats.doctypes
    );
    output
}
