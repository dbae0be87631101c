//! Error types for the authorlist library.
//!
//! Only failures that must stop a run live here. Problems the run can continue past (an
//! unmatched infrastructure author, a missing email database) are collected as
//! [`Finding`](crate::report::Finding)s instead.
//!
//! # Examples
//!
//! ```no_run
//! use authorlist::{error::AuthorListError, matcher::Decline, AuthorList, Config, Sources};
//!
//! let sources = Sources::new("authors.csv", "first_tier.txt", "infrastructure.txt");
//! match AuthorList::assemble(&sources, &Config::default(), &mut Decline) {
//!   Err(AuthorListError::MissingAuthor(name)) => println!("First-tier author {name} is missing"),
//!   Err(AuthorListError::MissingFile(path)) => println!("No such file: {}", path.display()),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(list) => println!("{} authors", list.authors().len()),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Error type alias used for the [`authorlist`](crate) crate.
pub type Result<T> = core::result::Result<T, AuthorListError>;

/// Errors that abort an authorlist run.
#[derive(Error, Debug)]
pub enum AuthorListError {
  /// A required input file does not exist.
  ///
  /// Raised for the roster CSV and both category files. The email database is optional and
  /// never produces this error from [`AuthorList`](crate::AuthorList).
  #[error("Could not find file {}", .0.display())]
  MissingFile(PathBuf),

  /// The roster is missing a required column or contains an unusable row.
  ///
  /// `line` is the 1-based line in the file, `0` when the problem is in the header itself.
  #[error("Malformed row in {} (line {line}): {reason}", path.display())]
  MalformedRow {
    /// File containing the row
    path:   PathBuf,
    /// 1-based line number, `0` for the header
    line:   u64,
    /// What is wrong with it
    reason: String,
  },

  /// A first-tier author has no matching record in the roster.
  #[error("First-tier author '{0}' not found in author list")]
  MissingAuthor(String),

  /// A CSV file could not be read or written.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// Inconsistent configuration.
  #[error("{0}")]
  Config(String),

  /// A [`Resolver`](crate::matcher::Resolver) failed or answered with an invalid choice.
  #[error("Prompt failed: {0}")]
  Prompt(String),
}
