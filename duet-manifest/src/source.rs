use std::path::{Path, PathBuf};

use duet_codegen::Error;
use miette::SourceSpan;

/// Source context for error reporting.
///
/// Carries the manifest text and its path so every error can point back at
/// the offending part of the file.
#[derive(Debug, Clone)]
pub struct SourceContext<'a> {
    src: &'a str,
    path: &'a Path,
}

impl<'a> SourceContext<'a> {
    pub fn new(src: &'a str, path: &'a Path) -> Self {
        Self { src, path }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Error::invalid_input(
            self.path,
            self.src,
            format!(
                "failed to parse '{}': {}",
                self.path.display(),
                source.message().trim_end()
            ),
            span,
        )
    }

    /// Create a validation error, pointing at `needle` when it occurs in the source.
    pub fn error_at(&self, message: impl Into<String>, needle: &str) -> Box<Error> {
        Error::invalid_input(self.path, self.src, message, find_span(self.src, needle))
    }

    /// Resolve a path written in this file relative to its directory.
    pub fn relative(&self, path: &str) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(path)
    }
}

/// Locate a value in the source, preferring its quoted form.
pub(crate) fn find_span(src: &str, needle: &str) -> Option<SourceSpan> {
    let quoted = [format!("\"{}\"", needle), format!("'{}'", needle)];

    for pattern in &quoted {
        if let Some(pos) = src.find(pattern.as_str()) {
            // +1 to skip the opening quote
            return Some(SourceSpan::from((pos + 1, needle.len())));
        }
    }

    // Fallback: just find the text anywhere (less precise)
    src.find(needle)
        .map(|pos| SourceSpan::from((pos, needle.len())))
}
