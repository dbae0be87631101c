//! Ordered, deduplicated author lists for collaboration papers.
//!
//! `authorlist` turns a CSV roster of paper authors (one row per author and affiliation) into the
//! artifacts a large collaboration needs when submitting a paper:
//!
//! - AASTeX `\author` / `\affiliation` blocks, with optional `\orcidlink` commands
//! - A numbered-affiliation variant (`Name,$^{1,2}$` plus a numbered affiliation list)
//! - A submission table (`Order,Firstname,Lastname,Email`) for the journal's upload form
//!
//! # Author ordering
//!
//! Authors are placed in three consecutive groups:
//!
//! 1. First-tier authors, exactly in the order of the first-tier file
//! 2. Infrastructure authors, alphabetically by last name
//! 3. Everyone else, alphabetically by last name
//!
//! A first-tier author that cannot be found in the roster aborts the run. Infrastructure names
//! that cannot be found are reported and skipped, optionally after asking a [`Resolver`] to pick
//! among fuzzy candidates.
//!
//! # Getting Started
//!
//! ```no_run
//! use authorlist::{matcher::Decline, AuthorList, Config, Destinations, Sources};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let sources = Sources::new("authors.csv", "first_tier.txt", "infrastructure.txt");
//!   let config = Config::default().with_fuzzy_matching(false);
//!
//!   let list = AuthorList::assemble(&sources, &config, &mut Decline)?;
//!   list.write(&Destinations::new("authors.tex", "authors_aas.csv"))?;
//!
//!   for finding in list.report().iter() {
//!     println!("{finding}");
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`author`]: author records, identities and name normalization
//! - [`loader`]: roster CSV and category file parsing
//! - [`matcher`]: exact and fuzzy name resolution
//! - [`merge`]: collapsing duplicate author records
//! - [`order`]: the three-tier author ordering
//! - [`email`]: attaching emails from the member database
//! - [`render`]: LaTeX and CSV output
//! - [`report`]: recoverable findings collected during a run

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashMap,
  fmt::Display,
  fs::File,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod author;
pub mod config;
pub mod email;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod merge;
pub mod order;
pub mod pipeline;
pub mod render;
pub mod report;

pub use crate::{
  config::Config,
  pipeline::{Artifacts, AuthorList, Destinations, Sources},
};
use crate::{
  author::{AuthorRecord, Identity},
  error::*,
  matcher::Resolver,
  report::{Finding, Report},
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use authorlist::prelude::*;
///
/// fn pick_first(_query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>, AuthorListError> {
///   Ok((!candidates.is_empty()).then_some(0))
/// }
/// ```
pub mod prelude {
  pub use crate::{
    author::{AuthorRecord, Identity},
    error::AuthorListError,
    matcher::{Candidate, Resolver},
    report::{Finding, Report},
  };
}

/// Opens `path` for reading, reporting a missing file as [`AuthorListError::MissingFile`].
pub(crate) fn open(path: &Path) -> Result<File> {
  File::open(path).map_err(|e| match e.kind() {
    std::io::ErrorKind::NotFound => AuthorListError::MissingFile(path.to_path_buf()),
    _ => AuthorListError::Io(e),
  })
}

/// Normalizes a CSV header cell for lookup: lowercase alphanumerics only, so that `First name`,
/// `first_name` and `Firstname` all compare equal.
pub(crate) fn header_key(header: &str) -> String {
  header.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect()
}

/// Finds the index of the first header matching any of `aliases` (compared via [`header_key`]).
pub(crate) fn find_column(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
  headers.iter().position(|header| aliases.contains(&header_key(header).as_str()))
}
