//! Go keyword escaping.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The reserved words of Go.
static GO_KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ])
});

/// Whether `name` is a Go keyword.
pub fn is_keyword(name: &str) -> bool {
    GO_KEYWORDS.contains(name)
}

/// Escape `name` if it collides with a Go keyword by prefixing `_`;
/// anything else is returned unchanged.
pub fn bless_name(name: &str) -> String {
    if is_keyword(name) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_prefixed() {
        assert_eq!(bless_name("type"), "_type");
        assert_eq!(bless_name("func"), "_func");
        assert_eq!(bless_name("range"), "_range");
    }

    #[test]
    fn other_names_are_fixed_points() {
        for name in ["count", "Type", "paint", "", "_type", "int"] {
            assert_eq!(bless_name(name), name);
            assert_eq!(bless_name(&bless_name(name)), name);
        }
    }

    #[test]
    fn every_keyword_escapes_to_a_non_keyword() {
        assert_eq!(GO_KEYWORDS.len(), 25);
        for keyword in GO_KEYWORDS.iter() {
            let blessed = bless_name(keyword);
            assert_ne!(&blessed, keyword);
            assert!(!is_keyword(&blessed));
        }
    }
}
