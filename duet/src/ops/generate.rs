//! Generate operation - one driver run per input.

use std::{collections::HashMap, path::PathBuf, sync::mpsc};

use duet_codegen::{
    Driver, Error, GenerationConfig, GenerationResult, OBJECTIVE_C, Result, RunReport,
};
use duet_manifest::{ManifestFrontend, substitutions};

/// The outcome of one input's run.
#[derive(Debug)]
pub struct RunOutcome<T> {
    pub input: PathBuf,
    pub result: Result<T>,
}

fn driver(config: GenerationConfig) -> Driver {
    Driver::new(config, &OBJECTIVE_C, substitutions())
}

/// Run every config on its own thread and wait for all of them.
///
/// Every input is previewed first; an input whose preview fails (including
/// one that would overwrite another input's artifact) is not run at all.
/// Outcomes come back in the order of `configs`, whatever order the runs
/// finish in.
pub fn generate(configs: Vec<GenerationConfig>) -> Vec<RunOutcome<RunReport>> {
    let previews = preview(configs.clone());
    let (tx, rx) = mpsc::channel();
    let mut outcomes = Vec::new();
    let mut handles = Vec::new();

    for (index, (config, checked)) in configs.into_iter().zip(previews).enumerate() {
        if let Err(err) = checked.result {
            outcomes.push((index, RunOutcome { input: checked.input, result: Err(err) }));
            continue;
        }

        let tx = tx.clone();
        let input = config.input.clone();
        handles.push(driver(config).spawn(ManifestFrontend::new(), move |result| {
            // The receiver outlives every run
            let _ = tx.send((index, RunOutcome { input, result }));
        }));
    }
    drop(tx);

    outcomes.extend(rx.iter());
    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("run thread panicked after reporting");
        }
    }

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Generate every config without writing anything.
pub fn preview(configs: Vec<GenerationConfig>) -> Vec<RunOutcome<GenerationResult>> {
    let runs = configs
        .into_iter()
        .map(|config| {
            let output_dir = config.output_dir.clone();
            let input = config.input.clone();
            let result = driver(config).generate(&ManifestFrontend::new());
            (output_dir, RunOutcome { input, result })
        })
        .collect();

    reject_shared_outputs(runs)
}

/// Fail both inputs of every pair that would write the same artifact path.
fn reject_shared_outputs(
    runs: Vec<(PathBuf, RunOutcome<GenerationResult>)>,
) -> Vec<RunOutcome<GenerationResult>> {
    let mut owners: HashMap<PathBuf, usize> = HashMap::new();
    let mut clashes = Vec::new();
    for (index, (dir, outcome)) in runs.iter().enumerate() {
        let Ok(result) = &outcome.result else {
            continue;
        };
        for artifact in result.artifacts() {
            let path = dir.join(&artifact.file_name);
            match owners.get(&path) {
                Some(&first) if first != index => clashes.push((first, index, path)),
                Some(_) => {}
                None => {
                    owners.insert(path, index);
                }
            }
        }
    }

    let mut outcomes: Vec<_> = runs.into_iter().map(|(_, outcome)| outcome).collect();
    for (first, second, path) in clashes {
        let first_input = outcomes[first].input.clone();
        let second_input = outcomes[second].input.clone();
        tracing::debug!(
            path = %path.display(),
            first = %first_input.display(),
            second = %second_input.display(),
            "shared output"
        );
        for index in [first, second] {
            // Keep the first clash reported for an input
            if outcomes[index].result.is_ok() {
                outcomes[index].result = Err(Box::new(Error::SharedOutput {
                    path: path.clone(),
                    first: first_input.clone(),
                    second: second_input.clone(),
                }));
            }
        }
    }
    outcomes
}
