//! Recoverable findings collected during a run.
//!
//! Nothing recorded here stops a run or prevents output from being written. The CLI prints the
//! report once all files are produced.

use super::*;

/// Why an infrastructure name did not make it into the author list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmatched {
  /// No exact match and fuzzy matching is turned off
  FuzzyDisabled,
  /// No candidate scored above the confidence floor
  NoCandidates,
  /// Candidates were offered and none was selected
  Declined,
}

/// A problem that was worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
  /// An infrastructure name could not be resolved to a roster entry.
  UnmatchedInfrastructure {
    /// Name as written in the infrastructure file
    name:   String,
    /// How resolution failed
    reason: Unmatched,
  },
  /// An ORCID cell was not a valid iD and was dropped.
  InvalidOrcid {
    /// Author the cell belongs to
    author: String,
    /// The rejected value
    value:  String,
  },
  /// One person carries two different ORCIDs; the first was kept.
  ConflictingOrcid {
    /// Author the iDs belong to
    author:  String,
    /// The iD in use
    kept:    String,
    /// The iD that was dropped
    ignored: String,
  },
  /// The member database does not exist.
  MissingEmailDatabase(PathBuf),
  /// The member database could not be used.
  MalformedEmailDatabase {
    /// Path of the database
    path:   PathBuf,
    /// What is wrong with it
    reason: String,
  },
  /// Several database rows match one author with different emails.
  AmbiguousEmail {
    /// The author
    author: String,
  },
  /// Authors left without an email address.
  MissingEmails(Vec<String>),
}

impl Display for Finding {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Finding::UnmatchedInfrastructure { name, reason } => match reason {
        Unmatched::FuzzyDisabled => {
          write!(f, "Infrastructure author '{name}' not found exactly (fuzzy matching disabled)")
        },
        Unmatched::NoCandidates => {
          write!(f, "No good match found for infrastructure author '{name}'")
        },
        Unmatched::Declined => write!(f, "Skipped infrastructure author '{name}', no match selected"),
      },
      Finding::InvalidOrcid { author, value } => {
        write!(f, "Ignoring invalid ORCID '{value}' for {author}")
      },
      Finding::ConflictingOrcid { author, kept, ignored } => {
        write!(f, "{author} has two ORCIDs, keeping {kept} and ignoring {ignored}")
      },
      Finding::MissingEmailDatabase(path) => {
        write!(f, "Could not find {}, proceeding without emails", path.display())
      },
      Finding::MalformedEmailDatabase { path, reason } => {
        write!(f, "Could not use {} ({reason}), proceeding without emails", path.display())
      },
      Finding::AmbiguousEmail { author } => {
        write!(f, "Several different emails found for {author}, leaving it empty")
      },
      Finding::MissingEmails(authors) => {
        write!(f, "Can't find email for {} author(s): {}", authors.len(), authors.join(", "))
      },
    }
  }
}

/// Ordered collection of [`Finding`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
  /// Findings in the order they were recorded
  findings: Vec<Finding>,
}

impl Report {
  /// Creates an empty report.
  pub fn new() -> Self { Self::default() }

  /// Records a finding and logs it at `warn` level.
  pub fn push(&mut self, finding: Finding) {
    warn!("{finding}");
    self.findings.push(finding);
  }

  /// Whether anything was recorded.
  pub fn is_empty(&self) -> bool { self.findings.is_empty() }

  /// Number of findings.
  pub fn len(&self) -> usize { self.findings.len() }

  /// Iterates findings in recording order.
  pub fn iter(&self) -> impl Iterator<Item = &Finding> { self.findings.iter() }

  /// Infrastructure names that were left out, in file order.
  pub fn unmatched_infrastructure(&self) -> Vec<&str> {
    self
      .findings
      .iter()
      .filter_map(|finding| match finding {
        Finding::UnmatchedInfrastructure { name, .. } => Some(name.as_str()),
        _ => None,
      })
      .collect()
  }
}
