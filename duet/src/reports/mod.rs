//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod generate;
mod output;

pub use check::{CheckEntry, CheckFailure, CheckReport};
pub use generate::{GenerateReport, Generated, PreviewFile, RunSummary};
pub use output::{Report, TerminalOutput};
