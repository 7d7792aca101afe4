//! Batch fixing of every release directory under a root directory.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use walkdir::WalkDir;

use crate::movie_fix::MovieConfig;
use crate::movie_fix::error::FixErrorKind;
use crate::movie_fix::fix::{FixOutcome, MovieFixer};
use crate::movie_fix::fs::{FileSystem, LocalFileSystem};
use crate::movie_fix::report::{ConsoleReporter, FileLogger, Reporter};
use crate::{print_bold, print_warning};

/// Fixes every release directory directly under a root directory.
#[derive(Debug)]
pub struct MovieFix {
    root: PathBuf,
    config: MovieConfig,
}

/// Counts of directory outcomes for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub fixed: usize,
    pub already_fixed: usize,
    pub planned: usize,
    pub failed: Vec<(PathBuf, FixErrorKind)>,
}

impl MovieFix {
    #[must_use]
    pub const fn new(root: PathBuf, config: MovieConfig) -> Self {
        Self { root, config }
    }

    /// Fix all subdirectories of the root and print a summary.
    ///
    /// Failures of single directories are reported and counted, they do not stop the run.
    ///
    /// # Errors
    /// Returns an error if the root directory can not be read.
    pub fn run(&self) -> anyhow::Result<BatchSummary> {
        if self.config.debug {
            eprint!("{}", self.config);
            eprintln!("Root: {}", self.root.display());
        }

        let logger = if self.config.log {
            match FileLogger::new() {
                Ok(logger) => Some(logger),
                Err(error) => {
                    print_warning!("Logging disabled: {error:#}");
                    None
                }
            }
        } else {
            None
        };
        let mut reporter = ConsoleReporter::new(logger);
        if self.config.verbose
            && let Some(path) = reporter.log_path()
        {
            println!("Logging to {}", path.display());
        }

        let directories = self.collect_directories()?;
        if directories.is_empty() {
            println!("No directories found in {}", self.root.display());
            return Ok(BatchSummary::default());
        }

        let summary = fix_directories(&LocalFileSystem, &self.config, &directories, &mut reporter);

        println!();
        print_bold!("{summary}");
        for (path, kind) in &summary.failed {
            println!("  {} {}", format!("{kind:?}:").red(), path.display());
        }
        if self.config.dryrun && summary.planned > 0 {
            println!("Dryrun: would have fixed {}", summary.planned);
        }

        Ok(summary)
    }

    /// Non-hidden subdirectories of the root, sorted by name.
    fn collect_directories(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut directories = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !crate::is_hidden(e))
        {
            let entry = entry.with_context(|| format!("Failed to read directory {}", self.root.display()))?;
            if entry.file_type().is_dir() {
                directories.push(entry.into_path());
            }
        }
        Ok(directories)
    }
}

/// Fix the given directories one at a time in order.
pub fn fix_directories<F: FileSystem>(
    fs: &F,
    config: &MovieConfig,
    directories: &[PathBuf],
    reporter: &mut impl Reporter,
) -> BatchSummary {
    let fixer = MovieFixer::new(fs, config);
    let mut summary = BatchSummary::default();
    for directory in directories {
        let outcome = fixer.fix(directory, reporter);
        if config.verbose
            && let Some(plan) = outcome.plan()
        {
            crate::show_diff(&plan.source_directory_name, &plan.target_directory_name);
        }
        summary.record(directory, &outcome);
    }
    summary
}

impl BatchSummary {
    pub fn record(&mut self, directory: &Path, outcome: &FixOutcome) {
        match outcome {
            FixOutcome::Fixed(_) => self.fixed += 1,
            FixOutcome::AlreadyFixed => self.already_fixed += 1,
            FixOutcome::Planned(_) => self.planned += 1,
            FixOutcome::Failed(error) => self.failed.push((directory.to_path_buf(), error.kind())),
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.fixed + self.already_fixed + self.planned + self.failed.len()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}: {} fixed, {} already fixed, {} planned, {} failed",
            self.total(),
            self.fixed,
            self.already_fixed,
            self.planned,
            self.failed.len()
        )
    }
}
