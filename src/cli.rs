// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// craurl takes exactly one positional argument: the file with the URLs to
// check, one per line. The results are written next to that file.
//
// Rust concepts:
// - Derive macros: clap generates the parsing code from the struct below
// - PathBuf: an owned file system path
// =============================================================================

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use craurl::crawler::{CrawlerConfig, DEFAULT_MAX_CONCURRENCY};

/// Name of the table output file, created next to the input file.
pub const TABLE_OUTPUT: &str = "out.txt";

/// Name of the JSON Lines output file (--json).
pub const JSON_OUTPUT: &str = "out.jsonl";

#[derive(Parser, Debug)]
#[command(
    name = "craurl",
    version,
    about = "Checks the HTTP status of every URL listed in a file",
    long_about = "craurl reads a file of newline-separated URLs, calls each of them with a GET \
                  request (up to --max-concurrency at a time) and writes the status code and \
                  timestamp of every response to out.txt, next to the input file."
)]
pub struct Cli {
    /// Path of the file containing the URLs to crawl, one per line
    pub file: PathBuf,

    /// How many URLs are fetched at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Write JSON Lines (out.jsonl) instead of a text table (out.txt)
    #[arg(long)]
    pub json: bool,

    /// Log every call and stored result
    #[arg(short, long)]
    pub verbose: bool,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Crawl the given file
    Crawl(Cli),
    /// Help was requested or the arguments were wrong: print usage, exit 0
    Usage,
    /// --version
    Version,
    /// A flag had an unusable value (e.g. --max-concurrency abc)
    Invalid(clap::Error),
}

impl Cli {
    /// Parses arguments, turning "wrong number of arguments" into a usage request.
    pub fn invocation<I, T>(args: I) -> Invocation
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Invocation::Crawl(cli),
            Err(e) => match e.kind() {
                ErrorKind::DisplayVersion => Invocation::Version,
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | ErrorKind::MissingRequiredArgument
                | ErrorKind::UnknownArgument
                | ErrorKind::TooManyValues => Invocation::Usage,
                _ => Invocation::Invalid(e),
            },
        }
    }

    /// Prints the full help text to stdout.
    pub fn print_usage() -> std::io::Result<()> {
        Cli::command().print_help()
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::default().with_max_concurrency(self.max_concurrency)
    }

    /// Where the results go: a fixed file name in the input file's directory.
    pub fn output_path(&self) -> PathBuf {
        let name = if self.json { JSON_OUTPUT } else { TABLE_OUTPUT };
        self.file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawl(args: &[&str]) -> Cli {
        match Cli::invocation(args) {
            Invocation::Crawl(cli) => cli,
            other => panic!("expected a crawl, got {other:?}"),
        }
    }

    #[test]
    fn test_single_file_argument() {
        let cli = crawl(&["craurl", "urls.txt"]);
        assert_eq!(cli.file, PathBuf::from("urls.txt"));
        assert_eq!(cli.max_concurrency, 100);
        assert!(!cli.json);
    }

    #[test]
    fn test_help_is_usage() {
        assert!(matches!(Cli::invocation(["craurl", "--help"]), Invocation::Usage));
        assert!(matches!(Cli::invocation(["craurl", "-h"]), Invocation::Usage));
    }

    #[test]
    fn test_wrong_argument_count_is_usage() {
        assert!(matches!(Cli::invocation(["craurl"]), Invocation::Usage));
        assert!(matches!(
            Cli::invocation(["craurl", "a.txt", "b.txt"]),
            Invocation::Usage
        ));
    }

    #[test]
    fn test_bad_flag_value_is_invalid() {
        assert!(matches!(
            Cli::invocation(["craurl", "urls.txt", "--max-concurrency", "lots"]),
            Invocation::Invalid(_)
        ));
    }

    #[test]
    fn test_output_next_to_input() {
        let cli = crawl(&["craurl", "data/urls.txt"]);
        assert_eq!(cli.output_path(), PathBuf::from("data/out.txt"));

        let cli = crawl(&["craurl", "urls.txt", "--json"]);
        assert_eq!(cli.output_path(), PathBuf::from("out.jsonl"));
    }

    #[test]
    fn test_crawler_config() {
        let cli = crawl(&["craurl", "urls.txt", "--max-concurrency", "7"]);
        let config = cli.crawler_config();
        assert_eq!(config.max_concurrency, 7);
        assert_eq!(config.method, "GET");
    }
}
