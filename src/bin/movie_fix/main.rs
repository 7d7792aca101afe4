use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use itertools::Itertools;

use movie_fixer::movie_fix::{MovieConfig, MovieFix, MovieFixConfig};
use movie_fixer::print_error;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Rename movie release directories to 'Title (Year)'"
)]
struct Args {
    /// Optional root directory containing the release directories
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Exit without waiting for Enter
    #[arg(short, long)]
    auto: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Additional movie file extension
    #[arg(short = 'x', long, num_args = 1, action = clap::ArgAction::Append, name = "EXTENSION")]
    extension: Vec<String>,

    /// Skip files whose name contains the given text
    #[arg(short, long, num_args = 1, action = clap::ArgAction::Append, name = "SKIP")]
    skip: Vec<String>,

    /// Write a log file to ~/logs
    #[arg(short = 'L', long)]
    log: bool,

    /// Only print changes without renaming
    #[arg(short, long)]
    print: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Combine CLI arguments with the user config file.
    fn into_config(self) -> Result<MovieConfig> {
        let user_config = MovieFixConfig::get_user_config().unwrap_or_else(|error| {
            print_error!("{error:#}");
            MovieFixConfig::default()
        });

        let extensions = user_config.extensions.into_iter().chain(self.extension).unique().collect();
        let disqualifying = user_config.disqualifying.into_iter().chain(self.skip).unique().collect();

        MovieConfig::from_user_config(MovieFixConfig {
            auto: self.auto || user_config.auto,
            debug: self.debug || user_config.debug,
            disqualifying,
            dryrun: self.print || user_config.dryrun,
            extensions,
            log: self.log || user_config.log,
            verbose: self.verbose || user_config.verbose,
            ..user_config
        })
    }
}

/// Wait for the user to press Enter.
fn wait_for_enter() {
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let mut input = String::new();
    let _ = io::stdin().read_line(&mut input);
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return movie_fixer::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    let root = movie_fixer::resolve_input_path(args.path.as_deref())?;
    let config = args.into_config()?;
    let auto = config.auto;

    MovieFix::new(root, config).run()?;

    if !auto {
        wait_for_enter();
    }
    Ok(())
}
