//! Filesystem access used by the locator and fixer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File metadata needed for choosing the movie file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    /// Extension without the leading dot, original casing.
    pub extension: String,
    pub size_bytes: u64,
}

/// Directory metadata needed for renaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryInfo {
    pub name: String,
    pub path: PathBuf,
    pub parent: Option<PathBuf>,
}

/// Filesystem operations the fixer depends on.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Files directly inside the directory.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Directories directly inside the directory.
    fn list_subdirectories(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    fn file_info(&self, path: &Path) -> io::Result<FileInfo>;

    fn directory_info(&self, path: &Path) -> io::Result<DirectoryInfo>;

    fn create_directory(&self, path: &Path) -> io::Result<()>;

    fn move_file(&self, source: &Path, destination: &Path) -> io::Result<()>;

    fn delete_directory(&self, path: &Path, recursive: bool) -> io::Result<()>;

    fn rename_directory(&self, source: &Path, destination: &Path) -> io::Result<()>;

    /// Both paths point to the same existing directory,
    /// for example when they only differ in case on a case-insensitive filesystem.
    fn is_same_directory(&self, first: &Path, second: &Path) -> bool;

    fn combine(&self, base: &Path, name: &str) -> PathBuf {
        base.join(name)
    }
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    fn list_entries(dir: &Path, want_dirs: bool) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(io::Error::other)?;
            if entry.file_type().is_dir() == want_dirs {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Parent directory, with a relative single-component path resolved against the working directory.
    fn resolve_parent(path: &Path) -> io::Result<Option<PathBuf>> {
        match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => dunce::canonicalize(Path::new(".")).map(Some),
            Some(parent) => Ok(Some(parent.to_path_buf())),
            None => Ok(None),
        }
    }

    #[cfg(unix)]
    fn is_same_inode(first: &Path, second: &Path) -> bool {
        use std::os::unix::fs::MetadataExt;

        match (fs::metadata(first), fs::metadata(second)) {
            (Ok(first), Ok(second)) => first.dev() == second.dev() && first.ino() == second.ino(),
            _ => false,
        }
    }

    #[cfg(not(unix))]
    const fn is_same_inode(_first: &Path, _second: &Path) -> bool {
        false
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(dir, false)
    }

    fn list_subdirectories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Self::list_entries(dir, true)
    }

    fn file_info(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        Ok(FileInfo {
            name: crate::path_to_filename_string(path),
            extension: crate::path_to_file_extension_string(path),
            size_bytes: metadata.len(),
        })
    }

    fn directory_info(&self, path: &Path) -> io::Result<DirectoryInfo> {
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Not a directory: {}", path.display()),
            ));
        }
        Ok(DirectoryInfo {
            name: crate::get_normalized_dir_name(path).unwrap_or_default(),
            path: path.to_path_buf(),
            parent: Self::resolve_parent(path)?,
        })
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn move_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
        fs::rename(source, destination)
    }

    fn delete_directory(&self, path: &Path, recursive: bool) -> io::Result<()> {
        if recursive {
            fs::remove_dir_all(path)
        } else {
            fs::remove_dir(path)
        }
    }

    fn rename_directory(&self, source: &Path, destination: &Path) -> io::Result<()> {
        fs::rename(source, destination)
    }

    fn is_same_directory(&self, first: &Path, second: &Path) -> bool {
        match (dunce::canonicalize(first), dunce::canonicalize(second)) {
            (Ok(first), Ok(second)) => first.is_dir() && (first == second || Self::is_same_inode(&first, &second)),
            _ => false,
        }
    }
}
