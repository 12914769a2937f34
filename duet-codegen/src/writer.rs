//! Persisting generated artifacts.

use std::path::PathBuf;

use duet_core::{File, Overwrite, WriteResult};
use serde::Serialize;

use crate::{Error, GenerationResult, Result};

/// What a write call did to each artifact path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    /// Paths whose content was (re)written
    pub written: Vec<PathBuf>,
    /// Paths that already held identical content
    pub unchanged: Vec<PathBuf>,
}

impl WriteOutcome {
    /// Number of artifacts handled, written or not.
    pub fn len(&self) -> usize {
        self.written.len() + self.unchanged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.unchanged.is_empty()
    }
}

/// Writes a [`GenerationResult`] under one output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Absolute or relative path an artifact would be written to.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write every artifact in result order, creating directories as needed.
    ///
    /// Each file is replaced atomically and only when its content changed.
    /// On failure, files written earlier in this call stay on disk and are
    /// listed in the returned `WriteFailure`.
    pub fn write(&self, result: &GenerationResult) -> Result<WriteOutcome> {
        let mut outcome = WriteOutcome::default();

        for artifact in result.artifacts() {
            let path = self.path_for(&artifact.file_name);
            let file = File::new(&path, artifact.content.as_str()).with_overwrite(Overwrite::IfChanged);

            match file.write() {
                Ok(WriteResult::Written) => {
                    tracing::info!(path = %path.display(), kind = %artifact.kind, "wrote artifact");
                    outcome.written.push(path);
                }
                Ok(WriteResult::Unchanged) => {
                    tracing::debug!(path = %path.display(), "artifact unchanged");
                    outcome.unchanged.push(path);
                }
                Err(source) => {
                    tracing::warn!(
                        path = %path.display(),
                        written = outcome.written.len(),
                        "artifact write failed"
                    );
                    return Err(Box::new(Error::WriteFailure {
                        path,
                        artifact: artifact.kind,
                        written: outcome.written,
                        source,
                    }));
                }
            }
        }

        Ok(outcome)
    }
}
