//! Collapsing duplicate author records.
//!
//! Records are merged by [`Identity`]. The first record seen for an identity fixes its position
//! and its scalar fields; later records only contribute what the first one lacks, and their
//! affiliations are appended in order. Merging an already merged set changes nothing.

use super::*;

/// Incremental merge of author records by identity.
#[derive(Debug, Default)]
pub struct Merger {
  /// Merged records in first-seen order
  authors: Vec<AuthorRecord>,
  /// Position of each identity in `authors`
  index:   HashMap<Identity, usize>,
  /// ORCID conflicts found while merging
  report:  Report,
}

impl Merger {
  /// Creates an empty merger.
  pub fn new() -> Self { Self::default() }

  /// Merges one record into the set.
  pub fn absorb(&mut self, record: AuthorRecord) {
    let identity = record.identity();
    match self.index.get(&identity) {
      Some(&position) => {
        let existing = &mut self.authors[position];
        trace!("Merging duplicate entry for {}", existing.full_name());
        if let Some(ignored) = existing.absorb(record) {
          let finding = Finding::ConflictingOrcid {
            author: existing.full_name(),
            kept: existing.orcid.clone().unwrap_or_default(),
            ignored,
          };
          self.report.push(finding);
        }
      },
      None => {
        self.index.insert(identity, self.authors.len());
        self.authors.push(record);
      },
    }
  }

  /// Merges every record of `records`, in order.
  pub fn absorb_all(&mut self, records: impl IntoIterator<Item = AuthorRecord>) {
    records.into_iter().for_each(|record| self.absorb(record));
  }

  /// Number of distinct identities seen so far.
  pub fn len(&self) -> usize { self.authors.len() }

  /// Whether nothing was merged yet.
  pub fn is_empty(&self) -> bool { self.authors.is_empty() }

  /// Returns the merged records and any conflicts found along the way.
  pub fn finish(self) -> (Vec<AuthorRecord>, Report) { (self.authors, self.report) }
}

/// Merges records from several source contexts, earlier contexts taking precedence.
///
/// ```
/// use authorlist::{author::AuthorRecord, merge::merge};
///
/// let merged = merge([
///   vec![AuthorRecord::new("Jane", "Doe").with_affiliation("Uni A")],
///   vec![AuthorRecord::new("JANE", "doe").with_affiliation("Uni B")],
/// ]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].affiliations, vec!["Uni A", "Uni B"]);
/// ```
pub fn merge<C>(contexts: impl IntoIterator<Item = C>) -> Vec<AuthorRecord>
where C: IntoIterator<Item = AuthorRecord> {
  let mut merger = Merger::new();
  for context in contexts {
    merger.absorb_all(context);
  }
  merger.finish().0
}
