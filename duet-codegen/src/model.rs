//! The two seams a front end plugs into.
//!
//! A [`ModelBuilder`] parses an input file into [`UnitModel`]s. A
//! [`FragmentRenderer`] turns each member of a unit into fragments on a
//! [`GenerationUnit`]. The engine drives both; neither needs to know about
//! naming, target modes or files.

use std::path::{Path, PathBuf};

use crate::{Error, GenerationConfig, GenerationUnit, Result};

/// The raw content of an input file.
#[derive(Debug, Clone)]
pub struct InputSource {
    path: PathBuf,
    content: String,
}

impl InputSource {
    /// Wrap already-loaded content.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Read an input file, failing with `InputUnreadable`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            Box::new(Error::InputUnreadable {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Ok(Self::new(path, content))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// One member of a unit: a raw key and the front end's payload for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<M> {
    pub key: String,
    pub value: M,
}

impl<M> Member<M> {
    pub fn new(key: impl Into<String>, value: M) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// A parsed unit, before any naming has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitModel<M> {
    /// Raw unit key
    pub key: String,
    /// Import directives every artifact containing this unit needs
    pub imports: Vec<String>,
    /// Members in declaration order
    pub members: Vec<Member<M>>,
}

impl<M> UnitModel<M> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            imports: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_import(mut self, directive: impl Into<String>) -> Self {
        self.imports.push(directive.into());
        self
    }

    pub fn with_member(mut self, key: impl Into<String>, value: M) -> Self {
        self.members.push(Member::new(key, value));
        self
    }
}

/// Produces unit models from one input file.
pub trait ModelBuilder {
    /// Per-member payload handed back to the renderer.
    type Member;

    /// Parse `input` into units, in the order they should be generated.
    ///
    /// `config.search_path` is available for resolving cross-referenced inputs.
    fn build(
        &self,
        input: &InputSource,
        config: &GenerationConfig,
    ) -> Result<Vec<UnitModel<Self::Member>>>;
}

/// A unit as seen by the renderer, with its canonical name resolved.
#[derive(Debug)]
pub struct UnitContext<'a, M> {
    /// Raw unit key
    pub key: &'a str,
    /// Canonical (prefixed) type name
    pub name: &'a str,
    pub config: &'a GenerationConfig,
    pub members: &'a [Member<M>],
    /// Policy-derived member names, parallel to `members`
    pub member_names: &'a [String],
}

impl<'a, M> UnitContext<'a, M> {
    /// Iterate over members with their derived names.
    pub fn named_members(&self) -> impl Iterator<Item = (&'a str, &'a Member<M>)> {
        self.member_names
            .iter()
            .map(String::as_str)
            .zip(self.members.iter())
    }
}

/// One member as seen by the renderer.
#[derive(Debug)]
pub struct MemberContext<'a, M> {
    /// Position within the unit
    pub index: usize,
    /// Raw member key
    pub key: &'a str,
    /// Policy-derived member name
    pub name: &'a str,
    pub value: &'a M,
}

/// Renders members into a unit's content buffers.
pub trait FragmentRenderer<M> {
    /// Called once per unit before any member.
    fn begin_unit(&self, _unit: &UnitContext<'_, M>, _out: &mut GenerationUnit) -> Result<()> {
        Ok(())
    }

    /// Called once per member, in order.
    fn render_member(
        &self,
        unit: &UnitContext<'_, M>,
        member: &MemberContext<'_, M>,
        out: &mut GenerationUnit,
    ) -> Result<()>;

    /// Called once per unit after every member.
    fn finish_unit(&self, _unit: &UnitContext<'_, M>, _out: &mut GenerationUnit) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_input() {
        let err = InputSource::read("/nonexistent/duet/units.toml").unwrap_err();
        assert_eq!(err.kind(), "input-unreadable");
    }

    #[test]
    fn test_read_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("units.toml");
        std::fs::write(&path, "[units]\n").unwrap();

        let input = InputSource::read(&path).unwrap();
        assert_eq!(input.path(), path);
        assert_eq!(input.content(), "[units]\n");
    }

    #[test]
    fn test_named_members() {
        let model = UnitModel::new("widget")
            .with_member("primary tint", 1)
            .with_member("URL", 2);
        let names = vec!["primaryTint".to_string(), "url".to_string()];
        let config = GenerationConfig::new("units.toml");
        let ctx = UnitContext {
            key: &model.key,
            name: "Widget",
            config: &config,
            members: &model.members,
            member_names: &names,
        };

        let pairs: Vec<_> = ctx.named_members().map(|(n, m)| (n, m.value)).collect();
        assert_eq!(pairs, vec![("primaryTint", 1), ("url", 2)]);
    }
}
