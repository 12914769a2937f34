//! Input discovery.

use std::{
    fs,
    path::{Path, PathBuf},
};

use duet_manifest::INPUT_EXTENSION;
use eyre::{Context, Result, bail};

use crate::settings::DEFAULT_SETTINGS_FILE;

/// Expand the command-line inputs into manifest files.
///
/// Files are taken as given. A directory contributes every manifest directly
/// inside it, sorted by name; a settings file found there is skipped. The
/// result keeps first-seen order without repeats.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let found = manifests_in(input)?;
            if found.is_empty() {
                bail!(
                    "no .{} manifests found in '{}'",
                    INPUT_EXTENSION,
                    input.display()
                );
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|f| seen.insert(f.clone()));
    Ok(files)
}

fn manifests_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).wrap_err_with(|| format!("Failed to read '{}'", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_manifest = path.is_file()
            && path.extension().is_some_and(|ext| ext == INPUT_EXTENSION)
            && path.file_name().is_some_and(|name| name != DEFAULT_SETTINGS_FILE);
        if is_manifest {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
