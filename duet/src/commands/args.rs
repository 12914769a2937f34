use std::path::PathBuf;

use clap::Args;
use duet_codegen::GenerationConfig;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    settings::{DEFAULT_SETTINGS_FILE, Settings},
};

/// Options shared by every command that runs generation.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Manifest files, or directories of manifests
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Settings file (defaults to ./duet.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extra directory searched for included manifests
    #[arg(short = 'f', long)]
    pub search_path: Option<PathBuf>,

    /// Prefix prepended to every generated type name
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Only emit syntax the legacy target accepts
    #[arg(short = '6', long, overrides_with = "no_legacy")]
    pub legacy: bool,

    /// Emit modern syntax even if the settings file asks for legacy
    #[arg(long, overrides_with = "legacy")]
    pub no_legacy: bool,

    /// Write implementation files only
    #[arg(short, long, overrides_with = "no_skip_declaration")]
    pub skip_declaration: bool,

    /// Write header files even if the settings file skips them
    #[arg(long, overrides_with = "skip_declaration")]
    pub no_skip_declaration: bool,

    /// Merge all units of an input into one header and implementation
    #[arg(short = 'u', long, overrides_with = "no_aggregate")]
    pub aggregate: bool,

    /// Write one pair per unit even if the settings file aggregates
    #[arg(long, overrides_with = "aggregate")]
    pub no_aggregate: bool,

    /// File name of the merged pair (with --aggregate)
    #[arg(long)]
    pub aggregate_name: Option<String>,
}

impl RunArgs {
    /// Settings given on the command line.
    fn flags(&self) -> Settings {
        Settings {
            output_dir: self.output.clone(),
            search_path: self.search_path.clone(),
            prefix: self.prefix.clone(),
            legacy_target: switch(self.legacy, self.no_legacy),
            skip_declaration: switch(self.skip_declaration, self.no_skip_declaration),
            aggregate: switch(self.aggregate, self.no_aggregate),
            aggregate_name: self.aggregate_name.clone(),
        }
    }

    /// One run configuration per input manifest.
    pub fn configs(&self) -> Result<Vec<GenerationConfig>> {
        let (path, explicit) = match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };
        let settings = Settings::load(&path, explicit)
            .unwrap_or_exit()
            .merge(self.flags());

        let inputs = ops::expand_inputs(&self.inputs)?;
        Ok(inputs.into_iter().map(|i| settings.config_for(i)).collect())
    }
}

/// A switch and its `--no-` form; neither leaves the lower layer in charge.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
