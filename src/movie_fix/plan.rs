//! Target paths for moving a movie into its `Title (Year)` directory.

use std::path::PathBuf;

use crate::movie_fix::error::FixError;
use crate::movie_fix::fs::{DirectoryInfo, FileSystem};
use crate::movie_fix::locate::CandidateFile;

/// Where the movie file and its directory should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source_file_path: PathBuf,
    pub source_directory_path: PathBuf,
    /// Current name of the source directory.
    pub source_directory_name: String,
    /// `Title (Year)`
    pub target_directory_name: String,
    /// `Title (Year).ext`
    pub target_file_name: String,
    /// Sibling of the source directory.
    pub target_directory_path: PathBuf,
    pub target_file_path: PathBuf,
}

impl RenamePlan {
    /// Build the plan for moving the candidate into a `Title (Year)` directory next to the source.
    ///
    /// # Errors
    /// Returns `NoParentDirectory` if the source directory has no parent.
    pub fn new<F: FileSystem>(fs: &F, directory: &DirectoryInfo, candidate: &CandidateFile) -> Result<Self, FixError> {
        let parent = directory
            .parent
            .as_deref()
            .ok_or_else(|| FixError::NoParentDirectory(directory.path.clone()))?;

        let target_directory_name = candidate.parsed.canonical_name();
        let target_file_name = if candidate.extension.is_empty() {
            target_directory_name.clone()
        } else {
            format!("{target_directory_name}.{}", candidate.extension)
        };
        let target_directory_path = fs.combine(parent, &target_directory_name);
        let target_file_path = fs.combine(&target_directory_path, &target_file_name);

        Ok(Self {
            source_file_path: candidate.path.clone(),
            source_directory_path: directory.path.clone(),
            source_directory_name: directory.name.clone(),
            target_directory_name,
            target_file_name,
            target_directory_path,
            target_file_path,
        })
    }

    /// The directory already has the canonical name.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source_directory_name == self.target_directory_name
    }
}
