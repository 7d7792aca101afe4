//! Progress reporting to the console and an optional log file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;

/// Emphasis for a progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
    Highlight,
}

/// Receives progress messages from the fixer.
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);

    fn info(&mut self, message: &str) {
        self.report(Level::Info, message);
    }

    fn error(&mut self, message: &str) {
        self.report(Level::Error, message);
    }

    fn highlight(&mut self, message: &str) {
        self.report(Level::Highlight, message);
    }
}

/// Simple file logger with buffered writes.
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

/// Prints progress with colours and optionally mirrors it to a log file.
#[derive(Default)]
pub struct ConsoleReporter {
    logger: Option<FileLogger>,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/movie-fixer/moviefix_<timestamp>.log
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        let log_dir = home_dir.join("logs").join(env!("CARGO_PKG_NAME"));
        Self::in_directory(&log_dir)
    }

    /// Create a new file logger in the given directory.
    pub fn in_directory(log_dir: &Path) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let path = log_dir.join(format!("moviefix_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S")));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn log(&mut self, level: Level, message: &str) {
        let tag = match level {
            Level::Info => "INFO",
            Level::Error => "ERROR",
            Level::Highlight => "-----",
        };
        let _ = writeln!(self.writer, "[{}] {tag} {message}", Self::timestamp());
    }

    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl std::fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLogger").field("path", &self.path).finish()
    }
}

impl Drop for FileLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

impl ConsoleReporter {
    #[must_use]
    pub const fn new(logger: Option<FileLogger>) -> Self {
        Self { logger }
    }

    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.logger.as_ref().map(FileLogger::path)
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter").field("logger", &self.logger).finish()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Highlight => println!("{}", message.cyan().bold()),
            Level::Error => crate::print_error!("{message}"),
        }
        if let Some(logger) = self.logger.as_mut() {
            logger.log(level, message);
        }
    }
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub messages: Vec<(Level, String)>,
}

impl RecordingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Message texts without levels.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|(_, message)| message.as_str()).collect()
    }

    /// Messages with the given level.
    #[must_use]
    pub fn with_level(&self, level: Level) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn report(&mut self, level: Level, message: &str) {
        self.messages.push((level, message.to_string()));
    }
}
