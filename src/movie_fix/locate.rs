//! Find the main movie file inside a release directory.

use std::path::{Path, PathBuf};

use crate::movie_fix::MovieConfig;
use crate::movie_fix::error::LocateError;
use crate::movie_fix::fs::FileSystem;
use crate::movie_fix::parse::{MovieParser, ParseResult};

/// A movie file eligible for renaming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Extension without the leading dot, original casing.
    pub extension: String,
    /// Title and year parsed from the release directory name.
    pub parsed: ParseResult,
}

/// Searches a release directory tree and picks the largest movie file.
///
/// The title and year come from the release directory name since release groups
/// often shorten or obfuscate the file names themselves.
/// Multi-part rips are not joined: the largest part wins.
#[derive(Debug)]
pub struct MovieLocator<'a, F: FileSystem> {
    fs: &'a F,
    config: &'a MovieConfig,
    parser: &'a MovieParser,
}

/// File that passed the extension and disqualification filters.
struct MovieFile {
    path: PathBuf,
    size_bytes: u64,
    extension: String,
}

impl<'a, F: FileSystem> MovieLocator<'a, F> {
    pub const fn new(fs: &'a F, config: &'a MovieConfig, parser: &'a MovieParser) -> Self {
        Self { fs, config, parser }
    }

    /// Find the largest movie file under `root`.
    ///
    /// # Errors
    /// Returns `NoMovieFound` if no file passes the filters,
    /// a parse error if the root directory name can not be parsed,
    /// or an I/O error if listing the tree fails.
    pub fn find_best_candidate(&self, root: &Path) -> Result<CandidateFile, LocateError> {
        let mut files = Vec::new();
        self.collect_movie_files(root, &mut files)?;

        let best = files
            .into_iter()
            .reduce(|best, file| if file.size_bytes > best.size_bytes { file } else { best })
            .ok_or_else(|| LocateError::NoMovieFound(root.to_path_buf()))?;

        let root_info = self.fs.directory_info(root).map_err(|source| LocateError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let parsed = self.parser.parse(&root_info.name)?;

        Ok(CandidateFile {
            path: best.path,
            size_bytes: best.size_bytes,
            extension: best.extension,
            parsed,
        })
    }

    /// Depth-first walk collecting every file that passes the filters.
    fn collect_movie_files(&self, dir: &Path, files: &mut Vec<MovieFile>) -> Result<(), LocateError> {
        let io_error = |source| LocateError::Io {
            path: dir.to_path_buf(),
            source,
        };

        for path in self.fs.list_files(dir).map_err(io_error)? {
            let info = self.fs.file_info(&path).map_err(|source| LocateError::Io {
                path: path.clone(),
                source,
            })?;
            if !self.config.is_movie_extension(&info.extension) || self.config.is_disqualified(&info.name) {
                continue;
            }
            files.push(MovieFile {
                path,
                size_bytes: info.size_bytes,
                extension: info.extension,
            });
        }

        for subdirectory in self.fs.list_subdirectories(dir).map_err(io_error)? {
            self.collect_movie_files(&subdirectory, files)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod locate_tests {
    use super::*;

    use crate::movie_fix::error::ParseError;
    use crate::movie_fix::fs::memory::MemoryFileSystem;

    const MB: u64 = 1024 * 1024;

    fn locate(fs: &MemoryFileSystem, root: &str) -> Result<CandidateFile, LocateError> {
        let config = MovieConfig::with_defaults().unwrap();
        let parser = MovieParser::new(&config);
        MovieLocator::new(fs, &config, &parser).find_best_candidate(Path::new(root))
    }

    #[test]
    fn picks_movie_over_sample() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Movie.Title.2020.1080p/movie.mkv", 500 * MB)
            .add_file("/movies/Movie.Title.2020.1080p/sample.mkv", 15 * MB);

        let candidate = locate(&fs, "/movies/Movie.Title.2020.1080p").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Movie.Title.2020.1080p/movie.mkv"));
        assert_eq!(candidate.extension, "mkv");
        assert_eq!(candidate.size_bytes, 500 * MB);
        assert_eq!(candidate.parsed.title, "Movie Title");
        assert_eq!(candidate.parsed.year, 2020);
    }

    #[test]
    fn disqualified_file_is_skipped_even_when_largest() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Kansas.1995.DVDRip/kansas.avi", 700 * MB)
            .add_file("/movies/Kansas.1995.DVDRip/kansas-sample.avi", 900 * MB);

        let candidate = locate(&fs, "/movies/Kansas.1995.DVDRip").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Kansas.1995.DVDRip/kansas.avi"));
    }

    #[test]
    fn disqualification_is_case_sensitive() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Kansas.1995/kansas.avi", 700 * MB)
            .add_file("/movies/Kansas.1995/kansas-sAmPlE.avi", 900 * MB);

        let candidate = locate(&fs, "/movies/Kansas.1995").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Kansas.1995/kansas-sAmPlE.avi"));
    }

    #[test]
    fn ignores_non_movie_extensions() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Clueless.1995/clueless.nfo", 900 * MB)
            .add_file("/movies/Clueless.1995/clueless.MP4", 10 * MB);

        let candidate = locate(&fs, "/movies/Clueless.1995").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Clueless.1995/clueless.MP4"));
        assert_eq!(candidate.extension, "MP4");
    }

    #[test]
    fn searches_subdirectories_but_parses_root_name() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Beatbox.2015.1080p/Extras/featurette.mkv", 200 * MB)
            .add_file("/movies/Beatbox.2015.1080p/CD1/Other.Name.1999.mkv", 700 * MB)
            .add_file("/movies/Beatbox.2015.1080p/CD2/Other.Name.1999.mkv", 650 * MB);

        let candidate = locate(&fs, "/movies/Beatbox.2015.1080p").unwrap();
        assert_eq!(
            candidate.path,
            Path::new("/movies/Beatbox.2015.1080p/CD1/Other.Name.1999.mkv")
        );
        assert_eq!(candidate.parsed.title, "Beatbox");
        assert_eq!(candidate.parsed.year, 2015);
    }

    #[test]
    fn selection_does_not_depend_on_listing_order() {
        for reverse_listing in [false, true] {
            let fs = if reverse_listing {
                MemoryFileSystem::with_reverse_listing()
            } else {
                MemoryFileSystem::new()
            };
            fs.add_file("/movies/Pepermint.2018/a.mkv", 100)
                .add_file("/movies/Pepermint.2018/b.mkv", 300)
                .add_file("/movies/Pepermint.2018/c.mkv", 200)
                .add_file("/movies/Pepermint.2018/sub/d.mkv", 250);

            let candidate = locate(&fs, "/movies/Pepermint.2018").unwrap();
            assert_eq!(candidate.path, Path::new("/movies/Pepermint.2018/b.mkv"));
        }
    }

    #[test]
    fn equal_sizes_keep_first_encountered() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Kodachrome.2018/a.mkv", 100)
            .add_file("/movies/Kodachrome.2018/b.mkv", 100);
        let candidate = locate(&fs, "/movies/Kodachrome.2018").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Kodachrome.2018/a.mkv"));

        let fs = MemoryFileSystem::with_reverse_listing();
        fs.add_file("/movies/Kodachrome.2018/a.mkv", 100)
            .add_file("/movies/Kodachrome.2018/b.mkv", 100);
        let candidate = locate(&fs, "/movies/Kodachrome.2018").unwrap();
        assert_eq!(candidate.path, Path::new("/movies/Kodachrome.2018/b.mkv"));
    }

    #[test]
    fn no_movie_files_is_no_movie_found() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Clueless.1995/clueless.srt", 10)
            .add_file("/movies/Clueless.1995/sample.mkv", 10);

        let error = locate(&fs, "/movies/Clueless.1995").unwrap_err();
        assert!(matches!(error, LocateError::NoMovieFound(ref path) if path == Path::new("/movies/Clueless.1995")));
    }

    #[test]
    fn unparseable_root_name_is_parse_error() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/movies/Home Videos/birthday.mp4", 10);

        let error = locate(&fs, "/movies/Home Videos").unwrap_err();
        assert!(matches!(error, LocateError::Parse(ParseError::PatternMismatch { .. })));
    }

    #[test]
    fn missing_root_is_io_error() {
        let fs = MemoryFileSystem::new();
        fs.add_dir("/movies");

        let error = locate(&fs, "/movies/Missing.2001").unwrap_err();
        assert!(matches!(error, LocateError::Io { .. }));
    }
}
