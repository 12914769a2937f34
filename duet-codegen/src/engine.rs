//! Assembly of generation units into artifact text.
//!
//! The engine runs in two steps:
//!
//! 1. [`Engine::populate`] walks the unit models a front end built and lets
//!    its renderer fill one [`GenerationUnit`] per model.
//! 2. [`Engine::generate`] resolves canonical names, rejects collisions and
//!    assembles each unit (or all units, in aggregate mode) into a
//!    declaration/definition pair.
//!
//! Nothing is written here; see [`crate::OutputWriter`].

use std::fmt;

use duet_core::is_identifier;
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    CodeBuilder, Error, Fragment, FragmentRenderer, GenerationConfig, GenerationUnit, ImportSet,
    MemberContext, Rejection, Result, SubstitutionTable, TargetLanguage, TargetMode, UnitContext,
    UnitModel,
};

/// Which half of a pair an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Public surface (e.g., `.h`)
    Declaration,
    /// Implementations (e.g., `.m`)
    Definition,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Declaration => write!(f, "declaration"),
            ArtifactKind::Definition => write!(f, "definition"),
        }
    }
}

/// One finished file body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// File name relative to the output directory
    pub file_name: String,
    pub content: String,
}

/// A declaration/definition pair sharing one file stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactPair {
    /// File stem: the unit's canonical name, or the aggregate name
    pub name: String,
    /// Canonical names of the units in this pair, in order
    pub units: Vec<String>,
    /// Absent in skip-declaration mode
    pub declaration: Option<Artifact>,
    pub definition: Artifact,
}

impl ArtifactPair {
    /// Iterate over the artifacts of this pair, declaration first.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.declaration
            .iter()
            .chain(std::iter::once(&self.definition))
    }
}

/// Everything one run produces, ready for the writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub aggregate: bool,
    pub pairs: Vec<ArtifactPair>,
}

impl GenerationResult {
    /// Iterate over all artifacts in write order.
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.pairs.iter().flat_map(ArtifactPair::artifacts)
    }

    /// Canonical names of every unit, in generation order.
    pub fn unit_names(&self) -> impl Iterator<Item = &str> {
        self.pairs
            .iter()
            .flat_map(|pair| pair.units.iter().map(String::as_str))
    }

    /// Find an artifact by file name.
    pub fn artifact(&self, file_name: &str) -> Option<&Artifact> {
        self.artifacts().find(|a| a.file_name == file_name)
    }
}

/// A unit whose name is resolved and whose fragments are rendered to text.
struct AssembledUnit {
    name: String,
    imports: ImportSet,
    declaration: String,
    definition: String,
}

/// The generation engine for one target language.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    language: &'a TargetLanguage,
    substitutions: &'a SubstitutionTable,
}

impl<'a> Engine<'a> {
    pub fn new(language: &'a TargetLanguage, substitutions: &'a SubstitutionTable) -> Self {
        Self {
            language,
            substitutions,
        }
    }

    pub fn language(&self) -> &TargetLanguage {
        self.language
    }

    /// Fill one unit per model through `renderer`, in model order.
    ///
    /// Member names are derived here so the renderer never sees a raw key it
    /// would have to validate itself. Fails on the first rejected key.
    pub fn populate<M, R>(
        &self,
        models: &[UnitModel<M>],
        renderer: &R,
        config: &GenerationConfig,
    ) -> Result<Vec<GenerationUnit>>
    where
        R: FragmentRenderer<M> + ?Sized,
    {
        self.check_prefix(config)?;
        let naming = &self.language.naming;
        let mut units = Vec::with_capacity(models.len());

        for model in models {
            let name = naming
                .type_name(&model.key, &config.prefix)
                .map_err(|reason| Error::invalid_key(&model.key, &model.key, reason))?;

            let mut member_names = Vec::with_capacity(model.members.len());
            let mut seen: IndexMap<String, &str> = IndexMap::new();
            for member in &model.members {
                let member_name = naming
                    .member_name(&member.key)
                    .map_err(|reason| Error::invalid_key(&model.key, &member.key, reason))?;
                if let Some(first) = seen.get(&member_name) {
                    return Err(Box::new(Error::DuplicateMemberName {
                        unit: model.key.clone(),
                        name: member_name,
                        first: first.to_string(),
                        second: member.key.clone(),
                    }));
                }
                seen.insert(member_name.clone(), &member.key);
                member_names.push(member_name);
            }

            let ctx = UnitContext {
                key: &model.key,
                name: &name,
                config,
                members: &model.members,
                member_names: &member_names,
            };

            let mut unit = GenerationUnit::new(&model.key);
            for directive in &model.imports {
                unit.add_import(directive.as_str());
            }

            renderer.begin_unit(&ctx, &mut unit)?;
            for (index, (member, member_name)) in
                model.members.iter().zip(&member_names).enumerate()
            {
                let member_ctx = MemberContext {
                    index,
                    key: &member.key,
                    name: member_name,
                    value: &member.value,
                };
                renderer.render_member(&ctx, &member_ctx, &mut unit)?;
            }
            renderer.finish_unit(&ctx, &mut unit)?;

            tracing::debug!(
                unit = %name,
                members = model.members.len(),
                imports = unit.imports().len(),
                "populated unit"
            );
            units.push(unit);
        }

        Ok(units)
    }

    /// Assemble `units` into artifact text.
    ///
    /// All names are resolved and checked before any text is produced, so a
    /// collision leaves nothing behind.
    pub fn generate(
        &self,
        units: &[GenerationUnit],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        self.check_prefix(config)?;
        let names = self.resolve_names(units, config)?;
        check_symbols(units, &names)?;
        let mode = config.target_mode();

        let assembled = units
            .iter()
            .zip(names)
            .map(|(unit, name)| self.assemble_unit(unit, name, mode))
            .collect::<Result<Vec<_>>>()?;

        let pairs = if config.aggregate {
            if !is_identifier(&config.aggregate_name) {
                return Err(Error::invalid_key(
                    &config.aggregate_name,
                    &config.aggregate_name,
                    Rejection::NotAnIdentifier,
                ));
            }
            vec![self.pair(&config.aggregate_name, &assembled, config)]
        } else {
            assembled
                .iter()
                .map(|unit| self.pair(&unit.name, std::slice::from_ref(unit), config))
                .collect()
        };

        tracing::debug!(
            units = units.len(),
            pairs = pairs.len(),
            mode = %mode,
            aggregate = config.aggregate,
            "assembled artifacts"
        );

        Ok(GenerationResult {
            aggregate: config.aggregate,
            pairs,
        })
    }

    fn check_prefix(&self, config: &GenerationConfig) -> Result<()> {
        self.language
            .naming
            .check_prefix(&config.prefix)
            .map_err(|reason| {
                Box::new(Error::InvalidPrefix {
                    prefix: config.prefix.clone(),
                    reason,
                })
            })
    }

    fn resolve_names(
        &self,
        units: &[GenerationUnit],
        config: &GenerationConfig,
    ) -> Result<Vec<String>> {
        let mut seen: IndexMap<String, &str> = IndexMap::new();
        let mut names = Vec::with_capacity(units.len());

        for unit in units {
            let name = self
                .language
                .naming
                .type_name(unit.key(), &config.prefix)
                .map_err(|reason| Error::invalid_key(unit.key(), unit.key(), reason))?;
            if let Some(first) = seen.get(&name) {
                return Err(Box::new(Error::DuplicateUnitName {
                    name,
                    first: first.to_string(),
                    second: unit.key().to_string(),
                }));
            }
            seen.insert(name.clone(), unit.key());
            names.push(name);
        }

        Ok(names)
    }

    fn resolve(&self, fragment: &Fragment, unit: &str, mode: TargetMode) -> Result<String> {
        match fragment {
            Fragment::Text(text) => Ok(text.clone()),
            Fragment::Construct(construct) => self
                .substitutions
                .resolve(construct, mode)
                .ok_or_else(|| {
                    Box::new(Error::MissingSubstitution {
                        unit: unit.to_string(),
                        kind: construct.kind.to_string(),
                    })
                }),
        }
    }

    fn assemble_unit(
        &self,
        unit: &GenerationUnit,
        name: String,
        mode: TargetMode,
    ) -> Result<AssembledUnit> {
        let lang = self.language;

        let declarations = unit
            .declarations()
            .iter()
            .map(|f| self.resolve(f, &name, mode))
            .collect::<Result<Vec<_>>>()?;
        let mut declaration = CodeBuilder::new(lang.indent).line(&(lang.open_declaration)(&name));
        declaration.push_blank();
        for fragment in &declarations {
            declaration.push_text(fragment);
        }
        let declaration = declaration
            .when(!declarations.is_empty(), CodeBuilder::blank)
            .line(&(lang.close_declaration)(&name))
            .build();

        let definitions = unit
            .definitions()
            .iter()
            .map(|f| self.resolve(f, &name, mode))
            .collect::<Result<Vec<_>>>()?;
        let mut definition = CodeBuilder::new(lang.indent).line(&(lang.open_definition)(&name));
        definition.push_blank();
        for fragment in &definitions {
            definition.push_text(fragment).push_blank();
        }
        let definition = definition
            .line(&(lang.close_definition)(&name))
            .build();

        Ok(AssembledUnit {
            name,
            imports: unit.imports().clone(),
            declaration,
            definition,
        })
    }

    fn pair(
        &self,
        stem: &str,
        units: &[AssembledUnit],
        config: &GenerationConfig,
    ) -> ArtifactPair {
        let lang = self.language;

        let mut imports = ImportSet::new();
        for unit in units {
            imports.merge(&unit.imports);
        }

        let banner = self.banner(config);
        let import_block = CodeBuilder::new(lang.indent)
            .each(imports.iter(), |b, directive| b.line(&(lang.include)(directive)))
            .when(!imports.is_empty(), CodeBuilder::blank)
            .build();

        let declaration_file = lang.declaration_file(stem);
        let declaration = (!config.skip_declaration).then(|| Artifact {
            kind: ArtifactKind::Declaration,
            file_name: declaration_file.clone(),
            content: join_bodies(
                format!("{}{}", banner, import_block),
                units.iter().map(|u| u.declaration.as_str()),
            ),
        });

        let header = if config.skip_declaration {
            import_block
        } else {
            CodeBuilder::new(lang.indent)
                .line(&(lang.include_local)(&declaration_file))
                .blank()
                .build()
        };
        let definition = Artifact {
            kind: ArtifactKind::Definition,
            file_name: lang.definition_file(stem),
            content: join_bodies(
                format!("{}{}", banner, header),
                units.iter().map(|u| u.definition.as_str()),
            ),
        };

        ArtifactPair {
            name: stem.to_string(),
            units: units.iter().map(|u| u.name.clone()).collect(),
            declaration,
            definition,
        }
    }

    fn banner(&self, config: &GenerationConfig) -> String {
        let leader = self.language.line_comment;
        CodeBuilder::new(self.language.indent)
            .comment(leader, "")
            .comment(
                leader,
                &format!(
                    "This file is generated from {} by {}.",
                    config.input_file_name(),
                    config.tool_name
                ),
            )
            .comment(leader, "Please do not edit.")
            .comment(leader, "")
            .blank()
            .build()
    }
}

/// Append bodies to `head`, separated by blank lines.
fn join_bodies<'b>(mut head: String, bodies: impl Iterator<Item = &'b str>) -> String {
    for (i, body) in bodies.enumerate() {
        if i > 0 {
            head.push('\n');
        }
        head.push_str(body);
    }
    head
}

/// Type names and unit symbols share one global namespace for the whole run,
/// whether or not the units end up in the same artifact.
fn check_symbols(units: &[GenerationUnit], names: &[String]) -> Result<()> {
    let mut owners: IndexMap<&str, &str> = IndexMap::new();
    for (unit, name) in units.iter().zip(names) {
        owners.insert(name.as_str(), unit.key());
    }

    for unit in units {
        for symbol in unit.symbols() {
            if let Some(first) = owners.get(symbol) {
                return Err(Box::new(Error::DuplicateSymbol {
                    symbol: symbol.to_string(),
                    first: first.to_string(),
                    second: unit.key().to_string(),
                }));
            }
            owners.insert(symbol, unit.key());
        }
    }
    Ok(())
}
