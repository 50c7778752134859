//! Element classes the tokenizer treats specially

/// Check if an element never needs a closing tag.
///
/// Compared as written; `BR` is not void here.
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "basefont" | "br" | "col" | "frame" | "hr" | "img"
        | "input" | "isindex" | "link" | "meta" | "param" | "embed"
    )
}

/// Check if an element's body is raw text up to its closing tag
pub fn is_raw_text_element(name: &str) -> bool {
    name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("xmp")
}
