//! Error kinds for parsing, locating and fixing movie directories.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing a release name into a title and year.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The movie regex did not match, or matched without a usable title or year.
    #[error("Name '{name}' does not match pattern '{pattern}'")]
    PatternMismatch { name: String, pattern: String },

    /// The year capture could not be turned into a number.
    #[error("Invalid year '{year}' in name '{name}'")]
    InvalidYear { name: String, year: String },
}

/// Errors from searching a directory tree for the movie file.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("No movie file found in {}", .0.display())]
    NoMovieFound(PathBuf),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Terminal failure of a single directory fix.
#[derive(Debug, Error)]
pub enum FixError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No movie file found in {}", .0.display())]
    NoMovieFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Directory has no parent: {}", .0.display())]
    NoParentDirectory(PathBuf),

    #[error("Target directory already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("Failed to {operation} {}: {source}", path.display())]
    FilesystemOperationFailed {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flat error kind used for matching outcomes without inspecting payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixErrorKind {
    PatternMismatch,
    InvalidYear,
    NoMovieFound,
    DirectoryNotFound,
    NoParentDirectory,
    TargetExists,
    FilesystemOperationFailed,
}

impl FixError {
    pub(crate) fn filesystem(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FilesystemOperationFailed {
            operation,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FixErrorKind {
        match self {
            Self::Parse(ParseError::PatternMismatch { .. }) => FixErrorKind::PatternMismatch,
            Self::Parse(ParseError::InvalidYear { .. }) => FixErrorKind::InvalidYear,
            Self::NoMovieFound(_) => FixErrorKind::NoMovieFound,
            Self::DirectoryNotFound(_) => FixErrorKind::DirectoryNotFound,
            Self::NoParentDirectory(_) => FixErrorKind::NoParentDirectory,
            Self::TargetExists(_) => FixErrorKind::TargetExists,
            Self::FilesystemOperationFailed { .. } => FixErrorKind::FilesystemOperationFailed,
        }
    }
}

impl From<LocateError> for FixError {
    fn from(error: LocateError) -> Self {
        match error {
            LocateError::NoMovieFound(path) => Self::NoMovieFound(path),
            LocateError::Parse(error) => Self::Parse(error),
            LocateError::Io { path, source } => Self::filesystem("read", path, source),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn locate_errors_convert_to_matching_fix_kinds() {
        let missing: FixError = LocateError::NoMovieFound(PathBuf::from("/movies/Empty")).into();
        assert_eq!(missing.kind(), FixErrorKind::NoMovieFound);

        let parse: FixError = LocateError::Parse(ParseError::InvalidYear {
            name: "Movie.abcd".to_string(),
            year: "abcd".to_string(),
        })
        .into();
        assert_eq!(parse.kind(), FixErrorKind::InvalidYear);

        let io: FixError = LocateError::Io {
            path: PathBuf::from("/movies/Locked"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
        .into();
        assert_eq!(io.kind(), FixErrorKind::FilesystemOperationFailed);
    }

    #[test]
    fn pattern_mismatch_message_names_the_input() {
        let error = ParseError::PatternMismatch {
            name: "No Year Here".to_string(),
            pattern: "(?<title>.*)(?<year>20\\d{2})".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("No Year Here"));
        assert!(message.contains("(?<title>.*)"));
    }
}
