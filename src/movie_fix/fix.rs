//! Rename a single release directory into the `Title (Year)` layout.

use std::path::Path;

use crate::movie_fix::MovieConfig;
use crate::movie_fix::error::FixError;
use crate::movie_fix::fs::FileSystem;
use crate::movie_fix::locate::MovieLocator;
use crate::movie_fix::parse::MovieParser;
use crate::movie_fix::plan::RenamePlan;
use crate::movie_fix::report::Reporter;

pub const STEP_FIND: &str = "1. Finding movie file";
pub const STEP_COMPUTE: &str = "2. Computing new name";
pub const STEP_CREATE: &str = "3. Creating directory";
pub const STEP_MOVE: &str = "4. Moving file";
pub const STEP_REMOVE: &str = "5. Removing old directory";
pub const DONE: &str = "DONE";
pub const ALREADY_FIXED: &str = "ALREADY FIXED";

/// Numbered steps in the order they are reported.
pub const STEPS: [&str; 5] = [STEP_FIND, STEP_COMPUTE, STEP_CREATE, STEP_MOVE, STEP_REMOVE];

/// Terminal result of fixing one directory.
#[derive(Debug)]
pub enum FixOutcome {
    /// Directory and file were renamed.
    Fixed(RenamePlan),
    /// Directory already has the canonical name, nothing was changed.
    AlreadyFixed,
    /// Dryrun: the plan was computed but not executed.
    Planned(RenamePlan),
    Failed(FixError),
}

/// Fixes release directories one at a time.
#[derive(Debug)]
pub struct MovieFixer<'a, F: FileSystem> {
    fs: &'a F,
    config: &'a MovieConfig,
    parser: MovieParser,
}

impl FixOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub const fn plan(&self) -> Option<&RenamePlan> {
        match self {
            Self::Fixed(plan) | Self::Planned(plan) => Some(plan),
            Self::AlreadyFixed | Self::Failed(_) => None,
        }
    }
}

impl<'a, F: FileSystem> MovieFixer<'a, F> {
    #[must_use]
    pub fn new(fs: &'a F, config: &'a MovieConfig) -> Self {
        Self {
            fs,
            config,
            parser: MovieParser::new(config),
        }
    }

    /// Fix the given release directory.
    ///
    /// Never fails: every error ends up in `FixOutcome::Failed` and is reported.
    pub fn fix(&self, directory: &Path, reporter: &mut impl Reporter) -> FixOutcome {
        reporter.highlight(&crate::path_to_string(directory));
        match self.try_fix(directory, reporter) {
            Ok(outcome) => outcome,
            Err(error) => {
                reporter.error(&error.to_string());
                FixOutcome::Failed(error)
            }
        }
    }

    fn try_fix(&self, directory: &Path, reporter: &mut impl Reporter) -> Result<FixOutcome, FixError> {
        if !self.fs.exists(directory) {
            return Err(FixError::DirectoryNotFound(directory.to_path_buf()));
        }

        reporter.info(STEP_FIND);
        let candidate = MovieLocator::new(self.fs, self.config, &self.parser).find_best_candidate(directory)?;
        reporter.info(&format!(
            "   Found: {} ({})",
            crate::get_relative_path_or_filename(&candidate.path, directory),
            crate::format_size(candidate.size_bytes)
        ));

        reporter.info(STEP_COMPUTE);
        let directory_info = self
            .fs
            .directory_info(directory)
            .map_err(|e| FixError::filesystem("read", directory, e))?;
        let plan = RenamePlan::new(self.fs, &directory_info, &candidate)?;

        if plan.is_noop() {
            reporter.highlight(ALREADY_FIXED);
            return Ok(FixOutcome::AlreadyFixed);
        }
        reporter.info(&format!("   New name: {}", plan.target_directory_name));

        // On case-insensitive filesystems a case-only rename finds the source itself
        let target_is_source = if self.fs.exists(&plan.target_directory_path) {
            if !self
                .fs
                .is_same_directory(&plan.source_directory_path, &plan.target_directory_path)
            {
                return Err(FixError::TargetExists(plan.target_directory_path));
            }
            true
        } else {
            false
        };

        if self.config.dryrun {
            reporter.info(&format!(
                "   Dryrun: would move to {}",
                crate::path_to_string(&plan.target_file_path)
            ));
            return Ok(FixOutcome::Planned(plan));
        }

        self.execute(&plan, target_is_source, reporter)?;
        reporter.highlight(DONE);
        Ok(FixOutcome::Fixed(plan))
    }

    /// Create the target directory, move the file, then remove the source directory.
    /// A failed step leaves the earlier steps in place.
    ///
    /// When the target only differs from the source in case on a case-insensitive filesystem,
    /// the source is first renamed to a temporary name so the target can be created.
    fn execute(&self, plan: &RenamePlan, target_is_source: bool, reporter: &mut impl Reporter) -> Result<(), FixError> {
        reporter.info(STEP_CREATE);
        let (source_directory, source_file) = if target_is_source {
            let temp_directory = plan
                .target_directory_path
                .with_file_name(format!("{}.tmp", plan.target_directory_name));
            self.fs
                .rename_directory(&plan.source_directory_path, &temp_directory)
                .map_err(|e| FixError::filesystem("rename directory", &plan.source_directory_path, e))?;
            let source_file = plan
                .source_file_path
                .strip_prefix(&plan.source_directory_path)
                .map_or_else(|_| plan.source_file_path.clone(), |relative| temp_directory.join(relative));
            (temp_directory, source_file)
        } else {
            (plan.source_directory_path.clone(), plan.source_file_path.clone())
        };

        self.fs
            .create_directory(&plan.target_directory_path)
            .map_err(|e| FixError::filesystem("create directory", &plan.target_directory_path, e))?;

        reporter.info(STEP_MOVE);
        self.fs
            .move_file(&source_file, &plan.target_file_path)
            .map_err(|e| FixError::filesystem("move file", &source_file, e))?;

        reporter.info(STEP_REMOVE);
        self.fs
            .delete_directory(&source_directory, true)
            .map_err(|e| FixError::filesystem("remove directory", &source_directory, e))?;

        Ok(())
    }
}
