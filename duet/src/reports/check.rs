//! Check command report data structures.

use std::path::PathBuf;

use serde::Serialize;

use super::output::{Output, Report};

/// Report data from checking inputs without writing.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub entries: Vec<CheckEntry>,
}

/// What one input would generate, or why it cannot.
#[derive(Debug, Serialize)]
pub struct CheckEntry {
    pub input: PathBuf,
    pub units: Vec<String>,
    /// File names of the artifacts that would be written
    pub artifacts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CheckFailure>,
}

#[derive(Debug, Serialize)]
pub struct CheckFailure {
    pub kind: &'static str,
    pub message: String,
}

impl CheckReport {
    /// Whether every input generated cleanly.
    pub fn is_valid(&self) -> bool {
        self.entries.iter().all(|e| e.error.is_none())
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for entry in &self.entries {
            let input = entry.input.display();
            match &entry.error {
                Some(failure) => out.error(&format!("{}: {}", input, failure.message)),
                None => {
                    out.preformatted(&format!("✓ {} is valid", input));
                    let count = entry.units.len();
                    out.key_value_indented(
                        if count == 1 { "Unit" } else { "Units" },
                        &entry.units.join(", "),
                    );
                    out.key_value_indented("Artifacts", &entry.artifacts.join(", "));
                }
            }
        }
    }
}
