use indexmap::IndexMap;
use serde::Deserialize;

use crate::{Color, SourceContext, color::ParseColorError};
use duet_codegen::{Result, UnitModel};

/// Root of a unit manifest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Other manifests whose units are generated along with this one's
    #[serde(default)]
    pub include: Vec<String>,

    /// Units in declaration order
    #[serde(default)]
    pub units: IndexMap<String, UnitSpec>,
}

/// One `[units.<key>]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSpec {
    /// Extra import directives, e.g. `"<QuartzCore/QuartzCore.h>"`
    #[serde(default)]
    pub imports: Vec<String>,

    /// String constants: key -> value
    #[serde(default)]
    pub identifiers: IndexMap<String, String>,

    /// Colour accessors: key -> `#RRGGBB[AA]`
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

/// Payload of one unit member.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A string constant
    Identifier(String),
    /// A colour accessor
    Color(Color),
}

impl Manifest {
    /// Parse manifest text.
    pub fn parse(ctx: &SourceContext<'_>) -> Result<Self> {
        toml::from_str(ctx.src()).map_err(|e| ctx.parse_error(e))
    }

    /// Convert to unit models, validating member values.
    ///
    /// Identifiers come before colours within a unit.
    pub fn to_models(&self, ctx: &SourceContext<'_>) -> Result<Vec<UnitModel<Entry>>> {
        let mut models = Vec::with_capacity(self.units.len());

        for (key, spec) in &self.units {
            let mut model = spec
                .imports
                .iter()
                .fold(UnitModel::new(key), |model, directive| model.with_import(directive));

            for (member, value) in &spec.identifiers {
                model = model.with_member(member, Entry::Identifier(value.clone()));
            }
            for (member, value) in &spec.colors {
                let color = value.parse::<Color>().map_err(|e: ParseColorError| {
                    ctx.error_at(format!("{} in unit '{}'", e, key), value)
                })?;
                model = model.with_member(member, Entry::Color(color));
            }

            models.push(model);
        }

        Ok(models)
    }
}
