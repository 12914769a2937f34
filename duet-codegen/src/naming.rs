//! Naming conventions for generated identifiers.
//!
//! Raw input keys are free-form ("primary tint", "cell-identifier"). A
//! [`NamingPolicy`] turns them into identifiers of the target language, or
//! rejects them with a [`Rejection`] instead of emitting a malformed name.

use std::fmt;

use duet_core::{is_identifier, split_words, to_camel_case, to_pascal_case};

/// Why a key (or prefix) cannot become an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The key is empty or whitespace only.
    Empty,
    /// The key has no letters or digits left once illegal characters are stripped.
    NoIdentifierCharacters,
    /// The key, or the identifier derived from it, is a reserved word.
    Reserved(String),
    /// The derived identifier would start with a digit.
    LeadingDigit(String),
    /// The value is not an identifier as written.
    NotAnIdentifier,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "key is empty"),
            Rejection::NoIdentifierCharacters => {
                write!(f, "key contains no letters or digits")
            }
            Rejection::Reserved(word) => write!(f, "'{}' is a reserved word", word),
            Rejection::LeadingDigit(name) => {
                write!(f, "'{}' would start with a digit", name)
            }
            Rejection::NotAnIdentifier => write!(f, "not a valid identifier"),
        }
    }
}

/// Language-specific naming rules.
///
/// Defines how raw keys become type names and member names, and which words
/// can never be emitted.
#[derive(Debug, Clone, Copy)]
pub struct NamingPolicy {
    /// Transform a unit key to a type name (e.g., "widget" -> "Widget")
    pub key_to_type: fn(&str) -> String,
    /// Transform a member key to a member name (e.g., "Primary Tint" -> "primaryTint")
    pub key_to_member: fn(&str) -> String,
    /// List of reserved words in the language
    pub reserved_words: &'static [&'static str],
}

impl NamingPolicy {
    /// Check if a name is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name)
    }

    /// Derive the canonical type name for `key`, prepending `prefix` when non-empty.
    ///
    /// Pure and deterministic: the same key and prefix always give the same name.
    pub fn type_name(&self, key: &str, prefix: &str) -> Result<String, Rejection> {
        self.check_prefix(prefix)?;
        let name = self.derive(key, self.key_to_type)?;
        let full = format!("{}{}", prefix, name);
        self.check_derived(&full)?;
        Ok(full)
    }

    /// Derive a member (method or constant) name for `key`.
    pub fn member_name(&self, key: &str) -> Result<String, Rejection> {
        let name = self.derive(key, self.key_to_member)?;
        self.check_derived(&name)?;
        Ok(name)
    }

    /// Validate an identifier prefix. The empty prefix is always accepted.
    pub fn check_prefix(&self, prefix: &str) -> Result<(), Rejection> {
        if prefix.is_empty() {
            return Ok(());
        }
        if !is_identifier(prefix) {
            return Err(Rejection::NotAnIdentifier);
        }
        if self.is_reserved(prefix) {
            return Err(Rejection::Reserved(prefix.to_string()));
        }
        Ok(())
    }

    fn derive(&self, key: &str, transform: fn(&str) -> String) -> Result<String, Rejection> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(Rejection::Empty);
        }
        if self.is_reserved(trimmed) {
            return Err(Rejection::Reserved(trimmed.to_string()));
        }
        if split_words(trimmed).next().is_none() {
            return Err(Rejection::NoIdentifierCharacters);
        }
        Ok(transform(trimmed))
    }

    fn check_derived(&self, name: &str) -> Result<(), Rejection> {
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Rejection::LeadingDigit(name.to_string()));
        }
        if self.is_reserved(name) {
            return Err(Rejection::Reserved(name.to_string()));
        }
        Ok(())
    }
}

/// Member names in the Objective-C tradition: a key written entirely in
/// upper case is an abbreviation and is lower-cased whole; anything else
/// becomes camelCase.
fn objc_member_name(key: &str) -> String {
    let has_upper = key.chars().any(char::is_uppercase);
    let has_lower = key.chars().any(char::is_lowercase);
    if has_upper && !has_lower {
        split_words(key).map(str::to_lowercase).collect()
    } else {
        to_camel_case(key)
    }
}

/// Objective-C naming conventions.
pub const OBJC_NAMING: NamingPolicy = NamingPolicy {
    key_to_type: to_pascal_case,
    key_to_member: objc_member_name,
    reserved_words: &[
        // C
        "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
        "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
        "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch",
        "typedef", "union", "unsigned", "void", "volatile", "while", "_Bool", "_Complex",
        "_Imaginary",
        // Objective-C
        "id", "self", "super", "nil", "Nil", "YES", "NO", "BOOL", "SEL", "IMP", "Class",
        "Protocol", "NSObject", "instancetype", "in", "out", "inout", "bycopy", "byref",
        "oneway", "nonatomic", "atomic", "readonly", "readwrite", "strong", "weak", "assign",
        // NSObject members that generated class methods must not shadow
        "alloc", "class", "copy", "dealloc", "description", "hash", "init", "new", "superclass",
    ],
};
