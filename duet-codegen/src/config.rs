//! Resolved configuration for one generation run.

use std::path::PathBuf;

use serde::Serialize;

use crate::TargetMode;

/// File stem used for the single artifact pair in aggregate mode.
pub const DEFAULT_AGGREGATE_NAME: &str = "Generated";

/// Tool name written into the banner of every generated file.
pub const DEFAULT_TOOL_NAME: &str = "duet";

/// Configuration of one run. Built once by the caller and never mutated
/// while the run is in progress.
///
/// # Example
///
/// ```
/// use duet_codegen::GenerationConfig;
///
/// let config = GenerationConfig::new("units.toml")
///     .with_prefix("ACME")
///     .with_aggregate(true);
///
/// assert_eq!(config.prefix, "ACME");
/// assert_eq!(config.aggregate_name, "Generated");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GenerationConfig {
    /// Input description file
    pub input: PathBuf,
    /// Identifier prefix prepended to every unit name (may be empty)
    pub prefix: String,
    /// Extra directory for cross-referenced inputs; only the model builder reads it
    pub search_path: Option<PathBuf>,
    /// Restrict output to syntax the oldest supported target accepts
    pub legacy_target: bool,
    /// Produce only definition artifacts
    pub skip_declaration: bool,
    /// Merge all units into one artifact pair
    pub aggregate: bool,
    /// Directory artifacts are written to
    pub output_dir: PathBuf,
    /// File stem of the aggregated pair
    pub aggregate_name: String,
    /// Tool named in the generated-file banner
    pub tool_name: String,
}

impl GenerationConfig {
    /// Create a config for `input` with every option at its default.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            prefix: String::new(),
            search_path: None,
            legacy_target: false,
            skip_declaration: false,
            aggregate: false,
            output_dir: PathBuf::from("."),
            aggregate_name: DEFAULT_AGGREGATE_NAME.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_search_path(mut self, search_path: impl Into<PathBuf>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn with_legacy_target(mut self, legacy: bool) -> Self {
        self.legacy_target = legacy;
        self
    }

    pub fn with_skip_declaration(mut self, skip: bool) -> Self {
        self.skip_declaration = skip;
        self
    }

    pub fn with_aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_aggregate_name(mut self, name: impl Into<String>) -> Self {
        self.aggregate_name = name.into();
        self
    }

    /// Target mode selected by the legacy flag.
    pub fn target_mode(&self) -> TargetMode {
        TargetMode::from_legacy_flag(self.legacy_target)
    }

    /// File name of the input, as shown in generated banners.
    pub fn input_file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }
}
