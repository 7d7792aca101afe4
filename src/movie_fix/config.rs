//! Configuration for movie directory fixing.

use std::{fmt, fs};

use anyhow::Context;
use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;

pub const DEFAULT_MOVIE_REGEX: &str = r"(?<title>.*)(?<year>19\d{2}|20\d{2})";
pub const DEFAULT_YEAR_REGEX: &str = r"(19|20)\d{2}";

/// Config from the user config file.
#[derive(Debug, Deserialize)]
pub struct MovieFixConfig {
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_disqualifying")]
    pub disqualifying: Vec<String>,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub log: bool,
    #[serde(default = "default_movie_regex")]
    pub movie_regex: String,
    #[serde(default = "default_replace_characters")]
    pub replace_characters: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_year_regex")]
    pub year_regex: String,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    moviefix: MovieFixConfig,
}

/// Final config with compiled patterns, created from the user config and CLI arguments.
#[derive(Debug, Clone)]
pub struct MovieConfig {
    pub auto: bool,
    pub debug: bool,
    pub disqualifying: Vec<String>,
    pub dryrun: bool,
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<String>,
    pub log: bool,
    pub movie_regex: Regex,
    pub replace_characters: Vec<String>,
    pub verbose: bool,
    pub year_regex: Regex,
}

impl Default for MovieFixConfig {
    fn default() -> Self {
        Self {
            auto: false,
            debug: false,
            disqualifying: default_disqualifying(),
            dryrun: false,
            extensions: default_extensions(),
            log: false,
            movie_regex: default_movie_regex(),
            replace_characters: default_replace_characters(),
            verbose: false,
            year_regex: default_year_regex(),
        }
    }
}

impl MovieFixConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.moviefix)
            .with_context(|| "Failed to parse config TOML")
    }
}

impl MovieConfig {
    /// Compile and validate the user config.
    ///
    /// # Errors
    /// Returns an error if a regex is invalid,
    /// or if the movie regex is missing the `title` or `year` group.
    pub fn from_user_config(user_config: MovieFixConfig) -> anyhow::Result<Self> {
        let movie_regex = Regex::new(&user_config.movie_regex)
            .with_context(|| format!("Invalid movie_regex: '{}'", user_config.movie_regex))?;
        let year_regex = Regex::new(&user_config.year_regex)
            .with_context(|| format!("Invalid year_regex: '{}'", user_config.year_regex))?;

        for group in ["title", "year"] {
            if !movie_regex.capture_names().flatten().any(|name| name == group) {
                anyhow::bail!(
                    "movie_regex '{}' is missing the named group '{group}'",
                    user_config.movie_regex
                );
            }
        }

        let extensions = user_config
            .extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unique()
            .collect();

        let disqualifying = user_config
            .disqualifying
            .into_iter()
            .filter(|token| !token.is_empty())
            .unique()
            .collect();

        Ok(Self {
            auto: user_config.auto,
            debug: user_config.debug,
            disqualifying,
            dryrun: user_config.dryrun,
            extensions,
            log: user_config.log,
            movie_regex,
            replace_characters: user_config.replace_characters,
            verbose: user_config.verbose,
            year_regex,
        })
    }

    /// Config with the built-in defaults.
    ///
    /// # Errors
    /// Never fails in practice since the default patterns are valid.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::from_user_config(MovieFixConfig::default())
    }

    /// Check if the lowercase extension is one of the movie extensions.
    #[must_use]
    pub fn is_movie_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extensions.iter().any(|ext| *ext == extension)
    }

    /// Check if the file name contains a disqualifying token.
    #[must_use]
    pub fn is_disqualified(&self, file_name: &str) -> bool {
        self.disqualifying.iter().any(|token| file_name.contains(token.as_str()))
    }
}

impl fmt::Display for MovieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  auto:          {}", crate::colorize_bool(self.auto))?;
        writeln!(f, "  debug:         {}", crate::colorize_bool(self.debug))?;
        writeln!(f, "  dryrun:        {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  log:           {}", crate::colorize_bool(self.log))?;
        writeln!(f, "  verbose:       {}", crate::colorize_bool(self.verbose))?;
        writeln!(f, "  movie regex:   {}", self.movie_regex.as_str())?;
        writeln!(f, "  year regex:    {}", self.year_regex.as_str())?;
        writeln!(f, "  replace:       [{}]", self.replace_characters.iter().join(" "))?;
        writeln!(f, "  extensions:    [{}]", self.extensions.join(", "))?;
        writeln!(f, "  disqualifying: [{}]", self.disqualifying.join(", "))
    }
}

fn default_movie_regex() -> String {
    DEFAULT_MOVIE_REGEX.to_string()
}

fn default_year_regex() -> String {
    DEFAULT_YEAR_REGEX.to_string()
}

fn default_replace_characters() -> Vec<String> {
    ["[", "]", "{", "}", "(", ")", "~", "`", "."]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extensions() -> Vec<String> {
    ["mkv", "mp4", "avi", "m4v", "mov", "wmv", "mpg", "mpeg", "ts", "divx"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_disqualifying() -> Vec<String> {
    ["sample", "Sample", "SAMPLE", "trailer", "Trailer"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod movie_fix_config_tests {
    use super::*;

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = MovieFixConfig::from_toml_str("").unwrap();
        assert!(!config.dryrun);
        assert!(!config.verbose);
        assert_eq!(config.movie_regex, DEFAULT_MOVIE_REGEX);
        assert_eq!(config.year_regex, DEFAULT_YEAR_REGEX);
        assert_eq!(config.replace_characters.len(), 9);
        assert!(config.extensions.contains(&"mkv".to_string()));
        assert!(config.disqualifying.contains(&"sample".to_string()));
    }

    #[test]
    fn from_toml_str_parses_moviefix_section() {
        let toml = r#"
[moviefix]
auto = true
dryrun = true
verbose = true
log = true
extensions = [".MKV", "mp4"]
disqualifying = ["sample", "extras"]
replace_characters = [".", "_"]
"#;
        let config = MovieFixConfig::from_toml_str(toml).unwrap();
        assert!(config.auto);
        assert!(config.dryrun);
        assert!(config.verbose);
        assert!(config.log);
        assert_eq!(config.extensions, vec![".MKV", "mp4"]);
        assert_eq!(config.disqualifying, vec!["sample", "extras"]);
        assert_eq!(config.replace_characters, vec![".", "_"]);
    }

    #[test]
    fn from_toml_str_keeps_defaults_for_missing_keys() {
        let toml = r"
[moviefix]
verbose = true
";
        let config = MovieFixConfig::from_toml_str(toml).unwrap();
        assert!(config.verbose);
        assert_eq!(config.movie_regex, DEFAULT_MOVIE_REGEX);
        assert_eq!(config.extensions, default_extensions());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[dots]
recurse = true

[moviefix]
debug = true
";
        let config = MovieFixConfig::from_toml_str(toml).unwrap();
        assert!(config.debug);
        assert!(!config.dryrun);
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        assert!(MovieFixConfig::from_toml_str("this is not valid toml {{{").is_err());
    }

    #[test]
    fn extensions_are_normalized() {
        let user_config = MovieFixConfig {
            extensions: vec![".MKV".to_string(), "mkv".to_string(), " Mp4 ".to_string(), String::new()],
            ..Default::default()
        };
        let config = MovieConfig::from_user_config(user_config).unwrap();
        assert_eq!(config.extensions, vec!["mkv", "mp4"]);
        assert!(config.is_movie_extension("MKV"));
        assert!(!config.is_movie_extension("srt"));
    }

    #[test]
    fn disqualifying_tokens_are_case_sensitive() {
        let user_config = MovieFixConfig {
            disqualifying: vec!["sample".to_string()],
            ..Default::default()
        };
        let config = MovieConfig::from_user_config(user_config).unwrap();
        assert!(config.is_disqualified("movie-sample.mkv"));
        assert!(!config.is_disqualified("movie-SAMPLE.mkv"));
    }

    #[test]
    fn invalid_movie_regex_fails_fast() {
        let user_config = MovieFixConfig {
            movie_regex: "(?<title>.*(".to_string(),
            ..Default::default()
        };
        let error = MovieConfig::from_user_config(user_config).unwrap_err();
        assert!(error.to_string().contains("movie_regex"));
    }

    #[test]
    fn movie_regex_without_year_group_is_rejected() {
        let user_config = MovieFixConfig {
            movie_regex: r"(?<title>.*)\d{4}".to_string(),
            ..Default::default()
        };
        let error = MovieConfig::from_user_config(user_config).unwrap_err();
        assert!(error.to_string().contains("year"));
    }

    #[test]
    fn invalid_year_regex_fails_fast() {
        let user_config = MovieFixConfig {
            year_regex: "[0-9".to_string(),
            ..Default::default()
        };
        let error = MovieConfig::from_user_config(user_config).unwrap_err();
        assert!(error.to_string().contains("year_regex"));
    }

    #[test]
    fn display_formats_config() {
        colored::control::set_override(false);
        let config = MovieConfig::from_user_config(MovieFixConfig {
            dryrun: true,
            extensions: vec!["mkv".to_string(), "avi".to_string()],
            ..Default::default()
        })
        .unwrap();

        let display = format!("{config}");
        assert!(display.starts_with("Config:"));
        assert!(display.contains("dryrun:        true"));
        assert!(display.contains("verbose:       false"));
        assert!(display.contains("extensions:    [mkv, avi]"));
        assert!(display.contains(DEFAULT_MOVIE_REGEX));
    }
}
