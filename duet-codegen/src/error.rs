use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::{ArtifactKind, naming::Rejection};

/// Result type for duet operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Terminal errors of a generation run.
///
/// Every variant is fatal: a run either writes all of its artifacts or stops
/// with exactly one of these.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read input '{path}'")]
    #[diagnostic(
        code(duet::input_unreadable),
        help("check that the input file exists and is readable")
    )]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(duet::invalid_input))]
    InvalidInput {
        path: PathBuf,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("invalid key '{key}' in unit '{unit}': {reason}")]
    #[diagnostic(
        code(duet::invalid_key),
        help("keys need at least one letter or digit and must not be a reserved word")
    )]
    InvalidKey {
        unit: String,
        key: String,
        reason: Rejection,
    },

    #[error("invalid identifier prefix '{prefix}': {reason}")]
    #[diagnostic(
        code(duet::invalid_prefix),
        help("a prefix must start with a letter or underscore and contain only letters, digits and underscores")
    )]
    InvalidPrefix { prefix: String, reason: Rejection },

    #[error("units '{first}' and '{second}' both resolve to '{name}'")]
    #[diagnostic(
        code(duet::duplicate_unit),
        help("rename one of the units; names are compared after prefixing and case conversion")
    )]
    DuplicateUnitName {
        name: String,
        first: String,
        second: String,
    },

    #[error("members '{first}' and '{second}' of unit '{unit}' both resolve to '{name}'")]
    #[diagnostic(code(duet::duplicate_member))]
    DuplicateMemberName {
        unit: String,
        name: String,
        first: String,
        second: String,
    },

    #[error("units '{first}' and '{second}' both define the global symbol '{symbol}'")]
    #[diagnostic(
        code(duet::duplicate_symbol),
        help("generated constants are named after their unit and member; rename a unit or member")
    )]
    DuplicateSymbol {
        symbol: String,
        first: String,
        second: String,
    },

    #[error("inputs '{first}' and '{second}' both write '{path}'")]
    #[diagnostic(
        code(duet::shared_output),
        help("give each input its own output directory, or rename the clashing units or aggregate name")
    )]
    SharedOutput {
        path: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no substitution rule for construct '{kind}' in unit '{unit}'")]
    #[diagnostic(
        code(duet::missing_substitution),
        help("register a rule for '{kind}' in the substitution table")
    )]
    MissingSubstitution { unit: String, kind: String },

    #[error("failed to write {artifact} artifact '{path}'")]
    #[diagnostic(
        code(duet::write_failure),
        help("output may be partially written; re-run to repair")
    )]
    WriteFailure {
        path: PathBuf,
        artifact: ArtifactKind,
        written: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} stage panicked: {message}")]
    #[diagnostic(code(duet::panicked))]
    Panicked { stage: &'static str, message: String },
}

impl Error {
    /// Create an input error, optionally pointing at a span of the input.
    pub fn invalid_input(
        path: impl Into<PathBuf>,
        src: &str,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Self> {
        let path = path.into();
        Box::new(Error::InvalidInput {
            src: NamedSource::new(path.display().to_string(), src.to_string()),
            path,
            span,
            message: message.into(),
        })
    }

    /// Create an invalid key error.
    pub fn invalid_key(
        unit: impl Into<String>,
        key: impl Into<String>,
        reason: Rejection,
    ) -> Box<Self> {
        Box::new(Error::InvalidKey {
            unit: unit.into(),
            key: key.into(),
            reason,
        })
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InputUnreadable { .. } => "input-unreadable",
            Error::InvalidInput { .. } => "invalid-input",
            Error::InvalidKey { .. } => "invalid-key",
            Error::InvalidPrefix { .. } => "invalid-prefix",
            Error::DuplicateUnitName { .. } => "duplicate-unit-name",
            Error::DuplicateMemberName { .. } => "duplicate-member-name",
            Error::DuplicateSymbol { .. } => "duplicate-symbol",
            Error::SharedOutput { .. } => "shared-output",
            Error::MissingSubstitution { .. } => "missing-substitution",
            Error::WriteFailure { .. } => "write-failure",
            Error::Panicked { .. } => "panicked",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_duplicate_unit_names_both_units() {
        let err = Error::DuplicateUnitName {
            name: "ACMEWidget".to_string(),
            first: "widget".to_string(),
            second: "Widget".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'widget'"));
        assert!(message.contains("'Widget'"));
        assert!(message.contains("ACMEWidget"));
        assert_eq!(err.kind(), "duplicate-unit-name");
    }

    #[test]
    fn test_invalid_key_names_unit_and_key() {
        let err = Error::invalid_key("Widget", "class", Rejection::Reserved("class".into()));
        assert_eq!(
            err.to_string(),
            "invalid key 'class' in unit 'Widget': 'class' is a reserved word"
        );
    }

    #[test]
    fn test_write_failure_names_artifact() {
        let err = Error::WriteFailure {
            path: PathBuf::from("out/Widget.m"),
            artifact: ArtifactKind::Definition,
            written: vec![PathBuf::from("out/Widget.h")],
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "failed to write definition artifact 'out/Widget.m'"
        );
        assert_eq!(err.kind(), "write-failure");
    }

    #[test]
    fn test_shared_output_names_both_inputs() {
        let err = Error::SharedOutput {
            path: PathBuf::from("out/Generated.h"),
            first: PathBuf::from("a.toml"),
            second: PathBuf::from("b.toml"),
        };
        assert_eq!(
            err.to_string(),
            "inputs 'a.toml' and 'b.toml' both write 'out/Generated.h'"
        );
        assert_eq!(err.kind(), "shared-output");
    }

    #[test]
    fn test_input_unreadable_keeps_source() {
        let err = Error::InputUnreadable {
            path: PathBuf::from("missing.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let source = std::error::Error::source(&err).expect("io source");
        assert_eq!(source.to_string(), "not found");
    }

    #[test]
    fn test_invalid_input_carries_span() {
        let err = Error::invalid_input("units.toml", "[units]\n", "bad", Some((1, 5).into()));
        match *err {
            Error::InvalidInput { span, .. } => assert_eq!(span, Some((1, 5).into())),
            other => panic!("unexpected error: {other}"),
        }
    }
}
