//! Release name parsing.

use std::fmt;

use regex::Regex;

use crate::movie_fix::MovieConfig;
use crate::movie_fix::error::ParseError;

/// Title and year parsed from a release name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub title: String,
    pub year: i32,
}

/// Parses noisy release names like `Skate.Kitchen.(2018).1080p.WEB-DL` into a title and year.
///
/// Patterns are compiled once by the config and only read here,
/// so a single parser can be shared freely.
#[derive(Debug, Clone)]
pub struct MovieParser {
    movie_regex: Regex,
    year_regex: Regex,
    replace_characters: Vec<String>,
}

impl ParseResult {
    /// The canonical `Title (Year)` name.
    #[must_use]
    pub fn canonical_name(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

impl MovieParser {
    #[must_use]
    pub fn new(config: &MovieConfig) -> Self {
        Self {
            movie_regex: config.movie_regex.clone(),
            year_regex: config.year_regex.clone(),
            replace_characters: config.replace_characters.clone(),
        }
    }

    /// Parse title and year from the given release name.
    ///
    /// # Errors
    /// Returns `PatternMismatch` if the movie regex does not match or the title ends up empty,
    /// and `InvalidYear` if no numeric year can be read from the year capture.
    pub fn parse(&self, name: &str) -> Result<ParseResult, ParseError> {
        let captures = self.movie_regex.captures(name).ok_or_else(|| self.mismatch(name))?;

        let raw_title = captures
            .name("title")
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.mismatch(name))?;

        let raw_year = captures
            .name("year")
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| self.mismatch(name))?;

        let year = self.parse_year(name, raw_year)?;

        let title = self.clean_title(raw_title);
        if title.is_empty() {
            return Err(self.mismatch(name));
        }

        Ok(ParseResult { title, year })
    }

    /// Replace junk characters with spaces, collapse double spaces, title case and trim.
    #[must_use]
    pub fn clean_title(&self, raw_title: &str) -> String {
        let mut title = raw_title.to_string();
        for junk in self.replace_characters.iter().filter(|s| !s.is_empty()) {
            title = title.replace(junk.as_str(), " ");
        }
        // Single pass: three or more adjacent separators can leave one extra space
        let title = title.replace("  ", " ");
        title_case(&title).trim().to_string()
    }

    fn parse_year(&self, name: &str, raw_year: &str) -> Result<i32, ParseError> {
        let invalid = || ParseError::InvalidYear {
            name: name.to_string(),
            year: raw_year.to_string(),
        };
        let year = self.year_regex.find(raw_year).ok_or_else(invalid)?;
        year.as_str().parse::<i32>().map_err(|_| invalid())
    }

    fn mismatch(&self, name: &str) -> ParseError {
        ParseError::PatternMismatch {
            name: name.to_string(),
            pattern: self.movie_regex.as_str().to_string(),
        }
    }
}

/// Uppercase the first character and every character following whitespace,
/// lowercase everything else.
///
/// ```rust
/// use movie_fixer::movie_fix::title_case;
///
/// assert_eq!(title_case("the PREDATOR"), "The Predator");
/// assert_eq!(title_case("live at bimbos"), "Live At Bimbos");
/// ```
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_is_whitespace = true;
    for c in text.chars() {
        if previous_is_whitespace {
            output.extend(c.to_uppercase());
        } else {
            output.extend(c.to_lowercase());
        }
        previous_is_whitespace = c.is_whitespace();
    }
    output
}
