//! Target-mode substitution rules.
//!
//! Fragments whose syntax depends on the target are emitted as a
//! [`Construct`]: a kind plus ordered arguments. At assembly time the engine
//! looks the kind up once in a [`SubstitutionTable`] and renders it with the
//! rule registered for the active [`TargetMode`].
//!
//! # Example
//!
//! ```
//! use duet_codegen::{Construct, SubstitutionTable, TargetMode};
//!
//! let table = SubstitutionTable::new()
//!     .rule("array-type", TargetMode::Modern, |c| format!("NSArray<{} *> *", c.arg_at(0)))
//!     .rule("array-type", TargetMode::Legacy, |_| "NSArray *".to_string());
//!
//! let construct = Construct::new("array-type").arg("UIColor");
//! assert_eq!(table.resolve(&construct, TargetMode::Modern).unwrap(), "NSArray<UIColor *> *");
//! assert_eq!(table.resolve(&construct, TargetMode::Legacy).unwrap(), "NSArray *");
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Syntax level the generated code must compile against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetMode {
    /// Current toolchains; every construct is available.
    Modern,
    /// The oldest supported target; newer syntax must be substituted.
    Legacy,
}

impl TargetMode {
    /// Map the legacy-target flag of a run to a mode.
    pub fn from_legacy_flag(legacy: bool) -> Self {
        if legacy {
            TargetMode::Legacy
        } else {
            TargetMode::Modern
        }
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetMode::Modern => write!(f, "modern"),
            TargetMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Name of a construct family (e.g., "color-accessor").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConstructKind(String);

impl ConstructKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConstructKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for ConstructKind {
    fn from(kind: String) -> Self {
        Self(kind)
    }
}

/// A target-dependent fragment: a kind and the arguments its rules render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construct {
    pub kind: ConstructKind,
    pub args: Vec<String>,
}

impl Construct {
    /// Create a construct with no arguments.
    pub fn new(kind: impl Into<ConstructKind>) -> Self {
        Self {
            kind: kind.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append several arguments.
    pub fn args(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(values.into_iter().map(Into::into));
        self
    }

    /// Get an argument by position, or "" when absent.
    pub fn arg_at(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }
}

/// A rendering rule for one construct kind under one target mode.
pub type Rule = Box<dyn Fn(&Construct) -> String + Send + Sync>;

/// Rules keyed by construct kind, then by target mode.
#[derive(Default)]
pub struct SubstitutionTable {
    rules: IndexMap<ConstructKind, IndexMap<TargetMode, Rule>>,
}

impl SubstitutionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule and return the table (builder style).
    pub fn rule<F>(mut self, kind: impl Into<ConstructKind>, mode: TargetMode, rule: F) -> Self
    where
        F: Fn(&Construct) -> String + Send + Sync + 'static,
    {
        self.insert(kind, mode, rule);
        self
    }

    /// Register a rule, replacing any previous rule for the same kind and mode.
    pub fn insert<F>(&mut self, kind: impl Into<ConstructKind>, mode: TargetMode, rule: F)
    where
        F: Fn(&Construct) -> String + Send + Sync + 'static,
    {
        self.rules
            .entry(kind.into())
            .or_default()
            .insert(mode, Box::new(rule));
    }

    /// Merge another table into this one; rules in `other` win.
    pub fn extend(&mut self, other: SubstitutionTable) {
        for (kind, modes) in other.rules {
            self.rules.entry(kind).or_default().extend(modes);
        }
    }

    /// Check if any rule exists for a kind.
    pub fn contains(&self, kind: &ConstructKind) -> bool {
        self.rules.contains_key(kind)
    }

    /// Render `construct` for `mode`.
    ///
    /// A mode without its own rule falls back to the modern rule, since a
    /// construct that needs no substitution is valid on every target.
    /// Returns `None` when the kind has no applicable rule at all.
    pub fn resolve(&self, construct: &Construct, mode: TargetMode) -> Option<String> {
        let modes = self.rules.get(&construct.kind)?;
        let rule = modes
            .get(&mode)
            .or_else(|| modes.get(&TargetMode::Modern))?;
        Some(rule(construct))
    }

    /// Get the number of registered kinds.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for SubstitutionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.rules
                    .iter()
                    .map(|(kind, modes)| (kind.as_str(), modes.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}
