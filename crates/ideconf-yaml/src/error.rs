//! Errors raised while composing a document.

use crate::Mark;
use thiserror::Error;

/// Result type alias for ideconf-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural errors of a document parse.
///
/// All of them are fatal to the document being composed. Callers that read
/// user configuration should log them and behave as if no file was present.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The low-level scanner rejected the text.
    #[error("{message} at {mark}")]
    Scan { message: String, mark: Mark },

    /// The event stream stopped in the middle of a node or document.
    #[error("unexpected end of event stream at {mark}")]
    UnexpectedEnd { mark: Mark },

    /// An alias refers to an anchor that was not defined earlier in the document.
    #[error("found undefined alias '{name}' at {mark}")]
    UndefinedAlias { name: String, mark: Mark },

    /// A second document started while exactly one was expected.
    #[error("expected a single document in the stream, but found another document: first at {first}, second at {second}")]
    MultipleDocuments { first: Mark, second: Mark },

    /// An event arrived where the grammar does not allow it.
    #[error("expected {expected}, but found {found} at {mark}")]
    UnexpectedEvent {
        expected: &'static str,
        found: &'static str,
        mark: Mark,
    },

    /// Re-serializing a document failed.
    #[error("failed to emit YAML: {0}")]
    Emit(String),
}

impl Error {
    /// Position the error refers to, if it has one.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Error::Scan { mark, .. }
            | Error::UnexpectedEnd { mark }
            | Error::UndefinedAlias { mark, .. }
            | Error::UnexpectedEvent { mark, .. } => Some(*mark),
            Error::MultipleDocuments { second, .. } => Some(*second),
            Error::Emit(_) => None,
        }
    }
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Scan {
            message: err.info().to_string(),
            mark: Mark::from_marker(err.marker()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_alias_names_alias_and_position() {
        let err = Error::UndefinedAlias {
            name: "base".into(),
            mark: Mark::new(20, 4, 9),
        };
        let msg = err.to_string();
        assert!(msg.contains("'base'"));
        assert!(msg.contains("line 4, column 9"));
    }

    #[test]
    fn test_multiple_documents_names_both_positions() {
        let err = Error::MultipleDocuments {
            first: Mark::new(0, 1, 1),
            second: Mark::new(10, 3, 1),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 1, column 1"));
        assert!(msg.contains("line 3, column 1"));
        assert_eq!(err.mark(), Some(Mark::new(10, 3, 1)));
    }
}
