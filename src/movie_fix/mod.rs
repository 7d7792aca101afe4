//! Movie directory fixing.
//!
//! Parses `Title (Year)` from scene release directory names,
//! picks the largest movie file inside the directory,
//! and moves it into a cleanly named sibling directory.

mod batch;
mod config;
mod error;
mod fix;
pub mod fs;
mod locate;
mod parse;
mod plan;
mod report;

pub use batch::{BatchSummary, MovieFix, fix_directories};
pub use config::{DEFAULT_MOVIE_REGEX, DEFAULT_YEAR_REGEX, MovieConfig, MovieFixConfig};
pub use error::{FixError, FixErrorKind, LocateError, ParseError};
pub use fix::{FixOutcome, MovieFixer, STEPS};
pub use fs::{DirectoryInfo, FileInfo, FileSystem, LocalFileSystem};
pub use locate::{CandidateFile, MovieLocator};
pub use parse::{MovieParser, ParseResult, title_case};
pub use plan::RenamePlan;
pub use report::{ConsoleReporter, FileLogger, Level, RecordingReporter, Reporter};
