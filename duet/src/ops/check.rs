//! Check operation - generation without writing.

use duet_codegen::GenerationConfig;

use super::preview;
use crate::reports::{CheckEntry, CheckFailure, CheckReport};

/// Generate every config in memory and summarise what would be written.
pub fn check(configs: Vec<GenerationConfig>) -> CheckReport {
    let entries = preview(configs)
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(result) => CheckEntry {
                input: outcome.input,
                units: result.unit_names().map(str::to_string).collect(),
                artifacts: result.artifacts().map(|a| a.file_name.clone()).collect(),
                error: None,
            },
            Err(err) => CheckEntry {
                input: outcome.input,
                units: Vec::new(),
                artifacts: Vec::new(),
                error: Some(CheckFailure {
                    kind: err.kind(),
                    message: err.to_string(),
                }),
            },
        })
        .collect();

    CheckReport { entries }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_check_reports_units_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.toml");
        fs::write(&good, "[units.widget]\n").unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[units.widget.colors]\ntint = \"orange\"\n").unwrap();
        let out = dir.path().join("out");

        let report = check(vec![
            GenerationConfig::new(&good).with_output_dir(&out),
            GenerationConfig::new(&bad).with_output_dir(&out),
        ]);

        assert!(!report.is_valid());
        assert_eq!(report.entries[0].units, vec!["Widget"]);
        assert_eq!(report.entries[0].artifacts, vec!["Widget.h", "Widget.m"]);
        let failure = report.entries[1].error.as_ref().unwrap();
        assert_eq!(failure.kind, "invalid-input");
        assert!(failure.message.contains("orange"));
        assert!(!out.exists());
    }

    #[test]
    fn test_check_reports_shared_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut configs = Vec::new();
        for name in ["alpha", "beta"] {
            let input = dir.path().join(format!("{name}.toml"));
            fs::write(&input, format!("[units.{name}]\n")).unwrap();
            configs.push(
                GenerationConfig::new(input)
                    .with_output_dir(&out)
                    .with_aggregate(true),
            );
        }

        let report = check(configs);

        assert!(!report.is_valid());
        for entry in &report.entries {
            let failure = entry.error.as_ref().unwrap();
            assert_eq!(failure.kind, "shared-output");
            assert!(failure.message.contains("alpha.toml"));
            assert!(failure.message.contains("beta.toml"));
        }
    }
}
