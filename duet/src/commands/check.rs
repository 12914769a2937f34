use clap::Args;
use eyre::{Context, Result};

use super::args::RunArgs;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: RunArgs,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let report = ops::check(self.args.configs()?);

        if self.json {
            let json = serde_json::to_string_pretty(&report).wrap_err("Failed to encode report")?;
            println!("{}", json);
        } else {
            report.render(&mut TerminalOutput::new());
        }

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
