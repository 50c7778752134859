//! Declarative removal configuration
//!
//! A JSON-friendly description of a [`RemovalPolicy`] for callers that keep
//! their rules in a file rather than in code:
//!
//! ```json
//! { "elements": ["style", "font"], "attributes": ["style"], "comments": true }
//! ```

use serde::{Deserialize, Serialize};

use scour_markup::is_tag_name;

use crate::error::{SanitizeError, SanitizeResult};
use crate::policy::RemovalPolicy;

/// Element name the sanitizer gives the XML prolog
const XML_PROLOG: &str = "?xml";

/// Removal rules as plain data. Missing fields remove nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct RemovalConfig {
    /// Element names to remove together with their content
    pub elements: Vec<String>,
    /// Attribute names to remove
    pub attributes: Vec<String>,
    /// Remove all comments
    pub comments: bool,
    /// Remove all doctype declarations
    pub doc_types: bool,
}

impl RemovalConfig {
    /// Parse and validate a JSON configuration. Names are lowercased.
    pub fn from_json(json: &str) -> SanitizeResult<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        config.normalize()?;
        Ok(config)
    }

    /// Lowercase all names and reject ones that could never match a tag.
    /// `?xml` is accepted as an element name and stands for the XML prolog.
    pub fn normalize(&mut self) -> SanitizeResult<()> {
        normalize_names(&mut self.elements, "element", |name| {
            is_tag_name(name) || name.eq_ignore_ascii_case(XML_PROLOG)
        })?;
        normalize_names(&mut self.attributes, "attribute", is_tag_name)
    }

    /// Fold `other` into this configuration. Name lists are unioned and
    /// flags are or-ed.
    pub fn merge(&mut self, other: RemovalConfig) {
        for name in other.elements {
            if !self.elements.contains(&name) {
                self.elements.push(name);
            }
        }
        for name in other.attributes {
            if !self.attributes.contains(&name) {
                self.attributes.push(name);
            }
        }
        self.comments |= other.comments;
        self.doc_types |= other.doc_types;
    }

    /// Build the policy these rules describe
    pub fn to_policy(&self) -> RemovalPolicy {
        RemovalPolicy::new()
            .remove_elements(&self.elements)
            .remove_attributes(&self.attributes)
            .remove_comments(self.comments)
            .remove_doctypes(self.doc_types)
    }
}

impl From<&RemovalConfig> for RemovalPolicy {
    fn from(config: &RemovalConfig) -> Self {
        config.to_policy()
    }
}

fn normalize_names(
    names: &mut [String],
    kind: &'static str,
    is_valid: impl Fn(&str) -> bool,
) -> SanitizeResult<()> {
    for name in names.iter_mut() {
        let trimmed = name.trim();
        if !is_valid(trimmed) {
            return Err(SanitizeError::InvalidName {
                kind,
                name: name.clone(),
            });
        }
        *name = trimmed.to_ascii_lowercase();
    }
    Ok(())
}
