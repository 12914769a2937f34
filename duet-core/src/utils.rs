//! Shared utility functions for code generation.

/// Split a raw key into words on every character that is not ASCII alphanumeric
/// (e.g., "primary tint-color" -> ["primary", "tint", "color"])
pub fn split_words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Uppercase the first character, leaving the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character, leaving the rest untouched
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase (e.g., "primary tint" -> "PrimaryTint")
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).map(upper_first).collect()
}

/// Convert a string to camelCase (e.g., "primary tint" -> "primaryTint")
pub fn to_camel_case(s: &str) -> String {
    lower_first(&to_pascal_case(s))
}

/// Check whether `s` is a C-family identifier: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        let words: Vec<_> = split_words("  primary tint-color~2x ").collect();
        assert_eq!(words, vec!["primary", "tint", "color", "2x"]);
        assert_eq!(split_words("").count(), 0);
        assert_eq!(split_words("~~").count(), 0);
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("hello"), "Hello");
        assert_eq!(to_pascal_case("hello_world"), "HelloWorld");
        assert_eq!(to_pascal_case("primary tint"), "PrimaryTint");
        assert_eq!(to_pascal_case("hElLo"), "HElLo");
        assert_eq!(to_pascal_case("widget-2x"), "Widget2x");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("Primary Tint"), "primaryTint");
        assert_eq!(to_camel_case("cell identifier"), "cellIdentifier");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_first_char_helpers() {
        assert_eq!(upper_first("widget"), "Widget");
        assert_eq!(lower_first("URLCache"), "uRLCache");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("ACMEWidget"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("a1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1a"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("caf\u{e9}"));
    }
}
