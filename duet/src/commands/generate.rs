use clap::Args;
use duet_codegen::GenerationConfig;
use eyre::Result;

use super::{args::RunArgs, print_diagnostic};
use crate::{
    ops,
    reports::{GenerateReport, Generated, PreviewFile, Report, RunSummary, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub args: RunArgs,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let configs = self.args.configs()?;
        tracing::info!(inputs = configs.len(), dry_run = self.dry_run, "generating");

        let report = if self.dry_run {
            Self::preview(configs)
        } else {
            Self::generate(configs)
        };

        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn generate(configs: Vec<GenerationConfig>) -> GenerateReport {
        let mut runs = Vec::new();
        let mut failed = Vec::new();

        for outcome in ops::generate(configs) {
            match outcome.result {
                Ok(report) => runs.push(RunSummary::from(report)),
                Err(err) => {
                    print_diagnostic(err);
                    failed.push(outcome.input);
                }
            }
        }

        GenerateReport {
            result: Generated::Written(runs),
            failed,
        }
    }

    fn preview(configs: Vec<GenerationConfig>) -> GenerateReport {
        let output_dirs: Vec<_> = configs.iter().map(|c| c.output_dir.clone()).collect();
        let mut files = Vec::new();
        let mut failed = Vec::new();

        for (outcome, dir) in ops::preview(configs).into_iter().zip(output_dirs) {
            match outcome.result {
                Ok(result) => files.extend(PreviewFile::from_result(&result, &dir)),
                Err(err) => {
                    print_diagnostic(err);
                    failed.push(outcome.input);
                }
            }
        }

        GenerateReport {
            result: Generated::Preview(files),
            failed,
        }
    }
}
