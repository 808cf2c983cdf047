//! Name rules for values written into markup as element or attribute names.

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase, hyphenated custom element name, e.g. `my-widget`.
pub const CUSTOM_ELEMENT_NAME_PATTERN: &str = r"^[a-z][a-z0-9]*-[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Attribute name without whitespace, quotes, `=`, `<`, `>` or `/`.
pub const ATTRIBUTE_NAME_PATTERN: &str = r"^[a-zA-Z_:][a-zA-Z0-9_.:-]*$";

static CUSTOM_ELEMENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(CUSTOM_ELEMENT_NAME_PATTERN).expect("Invalid custom element name regex")
});

static ATTRIBUTE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ATTRIBUTE_NAME_PATTERN).expect("Invalid attribute name regex"));

pub fn is_custom_element_name(name: &str) -> bool {
    CUSTOM_ELEMENT_NAME.is_match(name)
}

pub fn is_attribute_name(name: &str) -> bool {
    ATTRIBUTE_NAME.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_element_names() {
        assert!(is_custom_element_name("my-widget"));
        assert!(is_custom_element_name("x-a"));
        assert!(is_custom_element_name("mfe-card-2"));

        assert!(!is_custom_element_name("widget"));
        assert!(!is_custom_element_name("My-Widget"));
        assert!(!is_custom_element_name("x-"));
        assert!(!is_custom_element_name("x-a onmouseover=alert(1)"));
        assert!(!is_custom_element_name("x-a>"));
    }

    #[test]
    fn attribute_names() {
        assert!(is_attribute_name("label"));
        assert!(is_attribute_name("data-id"));
        assert!(is_attribute_name("aria-label"));
        assert!(is_attribute_name("xlink:href"));

        assert!(!is_attribute_name(""));
        assert!(!is_attribute_name("b onclick=alert(2)"));
        assert!(!is_attribute_name("a\"b"));
        assert!(!is_attribute_name("x>"));
        assert!(!is_attribute_name("1st"));
    }
}
