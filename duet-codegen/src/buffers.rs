//! Content buffers for one generation unit.
//!
//! A [`GenerationUnit`] owns three append-only sequences: declaration
//! fragments, import directives and definition fragments. Fragments are
//! stored verbatim; only the engine interprets them.

use indexmap::IndexSet;

use crate::Construct;

/// Tracks import directives and deduplicates them.
///
/// Maintains insertion order for deterministic output.
///
/// # Example
///
/// ```
/// use duet_codegen::ImportSet;
///
/// let mut imports = ImportSet::new();
/// assert!(imports.insert("<UIKit/UIKit.h>"));
/// assert!(imports.insert("<Foundation/Foundation.h>"));
/// assert!(!imports.insert("<UIKit/UIKit.h>"));
///
/// let directives: Vec<&str> = imports.iter().collect();
/// assert_eq!(directives, ["<UIKit/UIKit.h>", "<Foundation/Foundation.h>"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    directives: IndexSet<String>,
}

impl ImportSet {
    /// Create a new empty import set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directive. Returns `false` if it was already present.
    pub fn insert(&mut self, directive: impl Into<String>) -> bool {
        self.directives.insert(directive.into())
    }

    /// Merge another set into this one, appending unseen directives in order.
    pub fn merge(&mut self, other: &ImportSet) {
        for directive in &other.directives {
            if !self.directives.contains(directive) {
                self.directives.insert(directive.clone());
            }
        }
    }

    /// Check if a directive is present.
    pub fn contains(&self, directive: &str) -> bool {
        self.directives.contains(directive)
    }

    /// Iterate over directives in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.directives.iter().map(String::as_str)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Get the number of directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }
}

/// One piece of declaration or definition content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Emitted as written.
    Text(String),
    /// Rendered through the substitution table for the active target mode.
    Construct(Construct),
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Text(text)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Text(text.to_string())
    }
}

impl From<Construct> for Fragment {
    fn from(construct: Construct) -> Self {
        Fragment::Construct(construct)
    }
}

/// One logical generated type and its accumulated content.
///
/// The unit stores its raw key; the canonical name is derived from the key
/// by the engine's naming policy under the run's prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnit {
    key: String,
    declarations: Vec<Fragment>,
    imports: ImportSet,
    definitions: Vec<Fragment>,
    symbols: IndexSet<String>,
}

impl GenerationUnit {
    /// Create an empty unit for a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            declarations: Vec::new(),
            imports: ImportSet::new(),
            definitions: Vec::new(),
            symbols: IndexSet::new(),
        }
    }

    /// Get the raw key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add an import directive (e.g., `<UIKit/UIKit.h>`). Re-adding is a no-op.
    pub fn add_import(&mut self, directive: impl Into<String>) -> &mut Self {
        self.imports.insert(directive);
        self
    }

    /// Append a declaration fragment.
    pub fn add_declaration_fragment(&mut self, fragment: impl Into<Fragment>) -> &mut Self {
        self.declarations.push(fragment.into());
        self
    }

    /// Append a definition fragment.
    pub fn add_definition_fragment(&mut self, fragment: impl Into<Fragment>) -> &mut Self {
        self.definitions.push(fragment.into());
        self
    }

    /// Record a global symbol the unit's definitions introduce.
    ///
    /// The engine rejects a run in which two units (or a unit and a type
    /// name) claim the same symbol.
    pub fn add_symbol(&mut self, symbol: impl Into<String>) -> &mut Self {
        self.symbols.insert(symbol.into());
        self
    }

    /// Get the declared global symbols in the order added.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Get declaration fragments in the order added.
    pub fn declarations(&self) -> &[Fragment] {
        &self.declarations
    }

    /// Get the import directives.
    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Get definition fragments in the order added.
    pub fn definitions(&self) -> &[Fragment] {
        &self.definitions
    }
}
