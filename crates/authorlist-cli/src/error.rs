//! Error types for the authorlist command line tool.

use thiserror::Error;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, CliError>;

/// Errors that end a CLI run with a nonzero exit code.
#[derive(Error, Debug)]
pub enum CliError {
  /// Anything the library reports as fatal.
  #[error(transparent)]
  AuthorList(#[from] authorlist::error::AuthorListError),
}
