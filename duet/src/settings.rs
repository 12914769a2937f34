//! Layered run settings: defaults, then `duet.toml`, then command-line flags.

use std::path::{Path, PathBuf};

use duet_codegen::{GenerationConfig, InputSource, Result};
use duet_manifest::SourceContext;
use serde::Deserialize;

/// Settings file picked up from the working directory when `-c` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "duet.toml";

/// Every option a run can take from the settings file or the command line.
///
/// `None` means "not set at this layer"; [`Settings::merge`] lets the later
/// layer win field by field.
///
/// ```toml
/// output-dir = "Generated"
/// prefix = "ACME"
/// legacy-target = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    pub output_dir: Option<PathBuf>,
    pub search_path: Option<PathBuf>,
    pub prefix: Option<String>,
    pub legacy_target: Option<bool>,
    pub skip_declaration: Option<bool>,
    pub aggregate: Option<bool>,
    pub aggregate_name: Option<String>,
}

impl Settings {
    /// Load a settings file.
    ///
    /// A missing file is only an error when it was asked for explicitly.
    /// Relative paths inside the file resolve against its directory.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file");
            return Ok(Self::default());
        }

        let input = InputSource::read(path)?;
        let ctx = SourceContext::new(input.content(), input.path());
        let settings: Settings =
            toml::from_str(input.content()).map_err(|e| ctx.parse_error(e))?;
        tracing::debug!(path = %path.display(), "loaded settings");

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(settings.relative_to(base))
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.output_dir = self.output_dir.map(|p| base.join(p));
        self.search_path = self.search_path.map(|p| base.join(p));
        self
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(self, other: Settings) -> Self {
        Self {
            output_dir: other.output_dir.or(self.output_dir),
            search_path: other.search_path.or(self.search_path),
            prefix: other.prefix.or(self.prefix),
            legacy_target: other.legacy_target.or(self.legacy_target),
            skip_declaration: other.skip_declaration.or(self.skip_declaration),
            aggregate: other.aggregate.or(self.aggregate),
            aggregate_name: other.aggregate_name.or(self.aggregate_name),
        }
    }

    /// The run configuration for one input file.
    pub fn config_for(&self, input: impl Into<PathBuf>) -> GenerationConfig {
        let mut config = GenerationConfig::new(input)
            .with_legacy_target(self.legacy_target.unwrap_or(false))
            .with_skip_declaration(self.skip_declaration.unwrap_or(false))
            .with_aggregate(self.aggregate.unwrap_or(false));

        if let Some(prefix) = &self.prefix {
            config = config.with_prefix(prefix);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(path) = &self.search_path {
            config = config.with_search_path(path);
        }
        if let Some(name) = &self.aggregate_name {
            config = config.with_aggregate_name(name);
        }
        config
    }
}
