//! Generate command report data structures.

use std::path::PathBuf;

use duet_codegen::{GenerationResult, RunReport};

use super::output::{Output, Report};

/// Report data from a generate command.
#[derive(Debug)]
pub struct GenerateReport {
    /// What was generated.
    pub result: Generated,
    /// Inputs whose run failed.
    pub failed: Vec<PathBuf>,
}

/// Files written or previewed.
#[derive(Debug)]
pub enum Generated {
    /// Files were written to disk.
    Written(Vec<RunSummary>),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// One successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub input: PathBuf,
    pub units: Vec<String>,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl From<RunReport> for RunSummary {
    fn from(report: RunReport) -> Self {
        Self {
            input: report.input,
            units: report.units,
            written: report.outcome.written,
            unchanged: report.outcome.unchanged,
        }
    }
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// Path the file would be written to.
    pub path: PathBuf,
    pub content: String,
}

impl PreviewFile {
    /// Every artifact of `result`, placed under `output_dir`.
    pub fn from_result(result: &GenerationResult, output_dir: &std::path::Path) -> Vec<Self> {
        result
            .artifacts()
            .map(|a| PreviewFile {
                path: output_dir.join(&a.file_name),
                content: a.content.clone(),
            })
            .collect()
    }
}

impl GenerateReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn render_written(&self, out: &mut dyn Output, runs: &[RunSummary]) {
        for run in runs {
            out.section(&run.input.display().to_string());
            out.key_value_indented("Units", &run.units.join(", "));
            for path in &run.written {
                out.added_item(&path.display().to_string());
            }
            if !run.unchanged.is_empty() {
                out.key_value_indented("Unchanged", &format!("{} files", run.unchanged.len()));
            }
            out.newline();
        }

        let written: usize = runs.iter().map(|r| r.written.len()).sum();
        let unchanged: usize = runs.iter().map(|r| r.unchanged.len()).sum();
        out.key_value(
            "Generated",
            &format!("{} written, {} unchanged", written, unchanged),
        );
    }

    fn render_preview(&self, out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path.display().to_string());
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            Generated::Written(runs) => self.render_written(out, runs),
            Generated::Preview(files) => self.render_preview(out, files),
        }

        for input in &self.failed {
            out.error(&format!("generation failed for '{}'", input.display()));
        }
    }
}
