//! Loading a manifest together with the manifests it includes.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use duet_codegen::{GenerationConfig, InputSource, Result, UnitModel};

use crate::{Entry, Manifest, SourceContext};

/// Walks `include` lists depth first, in declaration order.
///
/// Each file's units come before the units of the files it includes. A file
/// reached twice through different includes is loaded once.
pub(crate) struct Loader<'a> {
    config: &'a GenerationConfig,
    /// Files currently being loaded, outermost first
    stack: Vec<PathBuf>,
    loaded: HashSet<PathBuf>,
}

impl<'a> Loader<'a> {
    pub(crate) fn new(config: &'a GenerationConfig) -> Self {
        Self {
            config,
            stack: Vec::new(),
            loaded: HashSet::new(),
        }
    }

    /// Load the run's input and everything it includes.
    pub(crate) fn load(&mut self, input: &InputSource) -> Result<Vec<UnitModel<Entry>>> {
        self.load_source(input.path(), input.content())
    }

    fn load_source(&mut self, path: &Path, src: &str) -> Result<Vec<UnitModel<Entry>>> {
        let ctx = SourceContext::new(src, path);
        let manifest = Manifest::parse(&ctx)?;
        let mut models = manifest.to_models(&ctx)?;

        let id = identity(path);
        self.loaded.insert(id.clone());
        self.stack.push(id);

        for include in &manifest.include {
            let resolved = self.resolve(&ctx, include)?;
            let id = identity(&resolved);

            if self.stack.contains(&id) {
                return Err(ctx.error_at(
                    format!(
                        "include cycle: '{}' is already being loaded",
                        resolved.display()
                    ),
                    include,
                ));
            }
            if self.loaded.contains(&id) {
                tracing::debug!(include = %resolved.display(), "include already loaded");
                continue;
            }

            tracing::debug!(include = %resolved.display(), "loading include");
            let source = InputSource::read(&resolved)?;
            models.extend(self.load_source(&resolved, source.content())?);
        }

        self.stack.pop();
        Ok(models)
    }

    /// Look next to the including file first, then in the search path.
    fn resolve(&self, ctx: &SourceContext<'_>, include: &str) -> Result<PathBuf> {
        let local = ctx.relative(include);
        if local.is_file() {
            return Ok(local);
        }

        if let Some(search_path) = &self.config.search_path {
            let candidate = search_path.join(include);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(ctx.error_at(
            match &self.config.search_path {
                Some(search_path) => format!(
                    "cannot find include '{}' next to '{}' or in '{}'",
                    include,
                    ctx.path().display(),
                    search_path.display()
                ),
                None => format!(
                    "cannot find include '{}' next to '{}'",
                    include,
                    ctx.path().display()
                ),
            },
            include,
        ))
    }
}

fn identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn load(path: &Path, config: &GenerationConfig) -> Result<Vec<UnitModel<Entry>>> {
        Loader::new(config).load(&InputSource::read(path)?)
    }

    fn keys(models: &[UnitModel<Entry>]) -> Vec<&str> {
        models.iter().map(|m| m.key.as_str()).collect()
    }

    #[test]
    fn test_includes_follow_including_units() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shared/palette.toml", "[units.palette]\n");
        let root = write(
            dir.path(),
            "units.toml",
            "include = [\"shared/palette.toml\"]\n[units.widget]\n",
        );

        let config = GenerationConfig::new(&root);
        let models = load(&root, &config).unwrap();

        assert_eq!(keys(&models), vec!["widget", "palette"]);
    }

    #[test]
    fn test_search_path_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/brand.toml", "[units.brand]\n");
        let root = write(
            dir.path(),
            "app/units.toml",
            "include = [\"brand.toml\"]\n[units.widget]\n",
        );

        let without = GenerationConfig::new(&root);
        let err = load(&root, &without).unwrap_err();
        assert!(err.to_string().contains("cannot find include 'brand.toml'"));

        let with = GenerationConfig::new(&root).with_search_path(dir.path().join("lib"));
        let models = load(&root, &with).unwrap();
        assert_eq!(keys(&models), vec!["widget", "brand"]);
    }

    #[test]
    fn test_include_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.toml", "include = [\"a.toml\"]\n[units.b]\n");
        let a = write(dir.path(), "a.toml", "include = [\"b.toml\"]\n[units.a]\n");

        let err = load(&a, &GenerationConfig::new(&a)).unwrap_err();
        assert_eq!(err.kind(), "invalid-input");
        assert!(err.to_string().starts_with("include cycle"));
    }

    #[test]
    fn test_diamond_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "base.toml", "[units.base]\n");
        write(dir.path(), "left.toml", "include = [\"base.toml\"]\n[units.left]\n");
        write(dir.path(), "right.toml", "include = [\"base.toml\"]\n[units.right]\n");
        let root = write(
            dir.path(),
            "root.toml",
            "include = [\"left.toml\", \"right.toml\"]\n",
        );

        let models = load(&root, &GenerationConfig::new(&root)).unwrap();
        assert_eq!(keys(&models), vec!["left", "base", "right"]);
    }
}
