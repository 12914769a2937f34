//! Target language syntax used during assembly.

use crate::{Indent, NamingPolicy, naming::OBJC_NAMING};

/// Syntax the engine needs to know about a generated language.
///
/// The engine owns only the outer shape of each artifact (banner, import
/// block, type markers); everything between the markers comes from fragments.
#[derive(Debug, Clone, Copy)]
pub struct TargetLanguage {
    /// Language identifier (e.g., "objc")
    pub name: &'static str,
    /// Suffix of the declaration artifact, without the dot
    pub declaration_extension: &'static str,
    /// Suffix of the definition artifact, without the dot
    pub definition_extension: &'static str,
    /// Leader for single-line comments
    pub line_comment: &'static str,
    /// Indentation used inside generated bodies
    pub indent: Indent,
    /// Wrap an import directive (e.g., `<UIKit/UIKit.h>` -> `#import <UIKit/UIKit.h>`)
    pub include: fn(&str) -> String,
    /// Reference the declaration artifact from the definition artifact
    pub include_local: fn(&str) -> String,
    /// Opening type marker of a declaration body
    pub open_declaration: fn(&str) -> String,
    /// Closing marker of a declaration body
    pub close_declaration: fn(&str) -> String,
    /// Opening type marker of a definition body
    pub open_definition: fn(&str) -> String,
    /// Closing marker of a definition body
    pub close_definition: fn(&str) -> String,
    /// How raw keys become identifiers
    pub naming: NamingPolicy,
}

impl TargetLanguage {
    /// File name of the declaration artifact for `stem`.
    pub fn declaration_file(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.declaration_extension)
    }

    /// File name of the definition artifact for `stem`.
    pub fn definition_file(&self, stem: &str) -> String {
        format!("{}.{}", stem, self.definition_extension)
    }
}

fn objc_import(directive: &str) -> String {
    format!("#import {}", directive)
}

fn objc_import_local(file: &str) -> String {
    format!("#import \"{}\"", file)
}

fn objc_interface(name: &str) -> String {
    format!("@interface {} : NSObject", name)
}

fn objc_implementation(name: &str) -> String {
    format!("@implementation {}", name)
}

fn objc_end(_: &str) -> String {
    "@end".to_string()
}

/// Objective-C: `.h` / `.m` pairs with one `NSObject` subclass per unit.
pub const OBJECTIVE_C: TargetLanguage = TargetLanguage {
    name: "objc",
    declaration_extension: "h",
    definition_extension: "m",
    line_comment: "//",
    indent: Indent::OBJC,
    include: objc_import,
    include_local: objc_import_local,
    open_declaration: objc_interface,
    close_declaration: objc_end,
    open_definition: objc_implementation,
    close_definition: objc_end,
    naming: OBJC_NAMING,
};
