//! Removal policy
//!
//! Decides which elements, attributes, comments and doctypes the sanitizer
//! drops. Every rule is either a fixed answer (a name set or a boolean) or
//! a caller-supplied predicate. The default policy removes nothing.

use std::fmt;

use rustc_hash::FxHashSet;

type ElementPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type AttributePredicate = Box<dyn Fn(&str, Option<&str>) -> bool + Send + Sync>;
type ContentPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Rule keyed on a lowercase element name
enum ElementRule {
    Names(FxHashSet<String>),
    Predicate(ElementPredicate),
}

/// Rule keyed on a lowercase attribute name and its value
enum AttributeRule {
    Names(FxHashSet<String>),
    Predicate(AttributePredicate),
}

/// Rule keyed on comment or doctype content
enum ContentRule {
    Always(bool),
    Predicate(ContentPredicate),
}

impl Default for ElementRule {
    fn default() -> Self {
        Self::Names(FxHashSet::default())
    }
}

impl Default for AttributeRule {
    fn default() -> Self {
        Self::Names(FxHashSet::default())
    }
}

impl Default for ContentRule {
    fn default() -> Self {
        Self::Always(false)
    }
}

impl ContentRule {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Always(remove) => *remove,
            Self::Predicate(predicate) => predicate(value),
        }
    }
}

/// What to strip while sanitizing
///
/// ```
/// use scour_sanitize::RemovalPolicy;
///
/// let policy = RemovalPolicy::new()
///     .remove_elements(["script", "style"])
///     .remove_attributes_where(|name, _| name.starts_with("on"))
///     .remove_comments(true);
///
/// assert!(policy.removes_element("script"));
/// assert!(policy.removes_attribute("onclick", Some("go()")));
/// assert!(!policy.removes_doctype("html"));
/// ```
#[derive(Default)]
pub struct RemovalPolicy {
    elements: ElementRule,
    attributes: AttributeRule,
    comments: ContentRule,
    doctypes: ContentRule,
}

impl RemovalPolicy {
    /// A policy that removes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove elements with any of these names, along with their content.
    /// Names are compared lowercase.
    pub fn remove_elements<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.elements = ElementRule::Names(lowercase_set(names));
        self
    }

    /// Remove elements for which `predicate(name)` holds. `name` is lowercase.
    pub fn remove_elements_where<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.elements = ElementRule::Predicate(Box::new(predicate));
        self
    }

    /// Remove attributes with any of these names. Names are compared
    /// lowercase.
    pub fn remove_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes = AttributeRule::Names(lowercase_set(names));
        self
    }

    /// Remove attributes for which `predicate(name, value)` holds
    pub fn remove_attributes_where<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.attributes = AttributeRule::Predicate(Box::new(predicate));
        self
    }

    pub fn remove_comments(mut self, remove: bool) -> Self {
        self.comments = ContentRule::Always(remove);
        self
    }

    /// Remove comments whose content satisfies `predicate`
    pub fn remove_comments_where<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.comments = ContentRule::Predicate(Box::new(predicate));
        self
    }

    pub fn remove_doctypes(mut self, remove: bool) -> Self {
        self.doctypes = ContentRule::Always(remove);
        self
    }

    /// Remove doctypes whose content satisfies `predicate`
    pub fn remove_doctypes_where<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.doctypes = ContentRule::Predicate(Box::new(predicate));
        self
    }

    /// Check if the element `name` (lowercase) is removed
    pub fn removes_element(&self, name: &str) -> bool {
        match &self.elements {
            ElementRule::Names(names) => names.contains(name),
            ElementRule::Predicate(predicate) => predicate(name),
        }
    }

    /// Check if the attribute `name` (lowercase) with `value` is removed
    pub fn removes_attribute(&self, name: &str, value: Option<&str>) -> bool {
        match &self.attributes {
            AttributeRule::Names(names) => names.contains(name),
            AttributeRule::Predicate(predicate) => predicate(name, value),
        }
    }

    pub fn removes_comment(&self, value: &str) -> bool {
        self.comments.matches(value)
    }

    pub fn removes_doctype(&self, value: &str) -> bool {
        self.doctypes.matches(value)
    }
}

fn lowercase_set<I, S>(names: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().to_ascii_lowercase())
        .collect()
}

impl fmt::Debug for ElementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names(names) => f.debug_set().entries(sorted(names)).finish(),
            Self::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Names(names) => f.debug_set().entries(sorted(names)).finish(),
            Self::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for ContentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always(remove) => write!(f, "{}", remove),
            Self::Predicate(_) => f.write_str("<predicate>"),
        }
    }
}

impl fmt::Debug for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemovalPolicy")
            .field("elements", &self.elements)
            .field("attributes", &self.attributes)
            .field("comments", &self.comments)
            .field("doctypes", &self.doctypes)
            .finish()
    }
}

/// Set entries in a stable order for debug output
fn sorted(names: &FxHashSet<String>) -> Vec<&String> {
    let mut names: Vec<_> = names.iter().collect();
    names.sort();
    names
}
