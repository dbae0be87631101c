//! Command line interface for generating collaboration author lists.
//!
//! Reads a CSV roster (one row per author and affiliation) plus two name lists and writes the
//! AASTeX author blocks and the journal submission table:
//!
//! ```bash
//! authorlist authors.csv authors.tex authors_aas.csv \
//!   --first-tier first_tier.txt \
//!   --infrastructure infrastructure.txt
//!
//! # Also write the numbered-affiliation variant, without prompting for fuzzy matches
//! authorlist authors.csv authors.tex authors_aas.csv \
//!   --first-tier first_tier.txt \
//!   --infrastructure infrastructure.txt \
//!   --alt-authors-tex authors_numbered.tex \
//!   --alt-affiliations-tex affiliations_numbered.tex \
//!   --no-fuzzy-matching
//! ```
//!
//! Infrastructure names without an exact roster match are offered as an interactive choice
//! between the closest roster entries. Problems that do not stop the run (unmatched names,
//! missing emails) are summarized at the end; the exit code is nonzero only when no output was
//! written.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, process::ExitCode};

use authorlist::{AuthorList, Config, Destinations, Sources};
use clap::{builder::ArgAction, Parser};
use tracing::{debug, trace, warn};
use tracing_subscriber::EnvFilter;

pub mod error;
pub mod interaction;

use crate::{error::*, interaction::*};

/// Prefix for information messages
static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for warning messages
static WARNING_PREFIX: &str = "⚠️ ";
/// Prefix for error messages
static ERROR_PREFIX: &str = "✗ ";
/// Prefix for user prompts
static PROMPT_PREFIX: &str = "❯ ";
/// Vertical line for tree structure
static TREE_VERT: &str = "│";
/// Branch character for tree structure
static TREE_BRANCH: &str = "├";
/// Leaf character for tree structure (end of branch)
static TREE_LEAF: &str = "└";

/// Command line interface configuration and argument parsing
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate author lists for academic papers")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Input CSV file with author information
  input_csv: PathBuf,

  /// Output TeX file for the author list
  output_tex: PathBuf,

  /// Output CSV file for the AAS journal submission
  output_csv: PathBuf,

  /// File containing first-tier authors (one per line)
  #[arg(long, value_name = "FILE")]
  first_tier: PathBuf,

  /// File containing infrastructure authors (one per line)
  #[arg(long, value_name = "FILE")]
  infrastructure: PathBuf,

  /// CSV file with user emails [default: Users.csv]
  #[arg(long, value_name = "FILE")]
  users_csv: Option<PathBuf>,

  /// Alternative output: authors with numbered affiliations
  #[arg(long, value_name = "FILE", requires = "alt_affiliations_tex")]
  alt_authors_tex: Option<PathBuf>,

  /// Alternative output: numbered affiliations list
  #[arg(long, value_name = "FILE", requires = "alt_authors_tex")]
  alt_affiliations_tex: Option<PathBuf>,

  /// Disable interactive fuzzy matching for infrastructure authors
  #[arg(long)]
  no_fuzzy_matching: bool,

  /// Disable ORCID links in author output
  #[arg(long)]
  no_orcid_links: bool,

  /// TOML file with default settings; command line flags take precedence
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Maximum number of fuzzy candidates offered per name
  #[arg(long, value_name = "N")]
  fuzzy_limit: Option<usize>,

  /// Minimum confidence (percent) for a fuzzy candidate to be offered
  #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(0..=100))]
  fuzzy_floor: Option<u8>,

  /// Skip all prompts and decline every fuzzy match (mostly for testing)
  #[arg(long, hide = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Builds the run configuration: the `--config` file (or defaults), overridden by flags.
  fn config(&self) -> Result<Config> {
    let mut config = match &self.config {
      Some(path) => Config::from_path(path)?,
      None => Config::default(),
    };
    if let Some(path) = &self.users_csv {
      config = config.with_users_csv(path);
    }
    if self.no_fuzzy_matching {
      config = config.with_fuzzy_matching(false);
    }
    if self.no_orcid_links {
      config = config.with_orcid_links(false);
    }
    if let Some(limit) = self.fuzzy_limit {
      config = config.with_fuzzy_limit(limit);
    }
    if let Some(floor) = self.fuzzy_floor {
      config = config.with_fuzzy_floor(floor);
    }
    config.validate()?;
    debug!("Using configuration {config:?}");
    Ok(config)
  }

  /// Input files named on the command line.
  fn sources(&self) -> Sources { Sources::new(&self.input_csv, &self.first_tier, &self.infrastructure) }

  /// Output files named on the command line.
  fn destinations(&self) -> Destinations {
    let destinations = Destinations::new(&self.output_tex, &self.output_csv);
    match (&self.alt_authors_tex, &self.alt_affiliations_tex) {
      (Some(authors), Some(affiliations)) => destinations.with_numbered(authors, affiliations),
      _ => destinations,
    }
  }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used (0-4)
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Runs one generation: assemble the list, write every artifact, then summarize.
fn run(cli: &Cli, terminal: &mut Terminal) -> Result<()> {
  let config = cli.config()?;
  let sources = cli.sources();
  let destinations = cli.destinations();
  trace!("Sources {sources:?}, destinations {destinations:?}");

  let list = AuthorList::assemble(&sources, &config, terminal)?;
  list.write(&destinations)?;

  terminal.reply(ResponseContent::Success(&format!(
    "Successfully generated {} and {}",
    destinations.aastex.display(),
    destinations.submission_csv.display()
  )))?;
  terminal.reply(ResponseContent::Info(&format!("Total authors: {}", list.authors().len())))?;
  if let Some((authors, affiliations)) = &destinations.numbered {
    terminal.reply(ResponseContent::Success(&format!(
      "Also generated alternative format: {} and {}",
      authors.display(),
      affiliations.display()
    )))?;
  }
  terminal.reply(ResponseContent::Report(list.report()))
}

/// Entry point for the authorlist CLI
///
/// Exits with a failure code when the run stopped before writing output: a missing input file,
/// a malformed roster, or a first-tier author that is not in the roster.
fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let mut terminal = Terminal::new(cli.accept_defaults);
  match run(&cli, &mut terminal) {
    Ok(()) => ExitCode::SUCCESS,
    Err(error) => {
      let _ = terminal.reply(ResponseContent::Error(&error));
      ExitCode::FAILURE
    },
  }
}
