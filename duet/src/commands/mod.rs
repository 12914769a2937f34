mod args;
mod check;
mod completions;
mod generate;

use check::CheckCommand;
use clap::{ArgAction, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;

/// Extension trait for exiting on duet errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for duet_codegen::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                print_diagnostic(e);
                std::process::exit(1);
            }
        }
    }
}

/// Print a duet error with its source snippet and help text.
pub(crate) fn print_diagnostic(err: Box<duet_codegen::Error>) {
    eprintln!("{:?}", miette::Report::new(*err));
}

#[derive(Parser)]
#[command(name = "duet")]
#[command(version)]
#[command(about = "Generate paired Objective-C headers and implementations from TOML manifests")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts from unit manifests
    Generate(GenerateCommand),

    /// Validate manifests and list what would be generated
    Check(CheckCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
