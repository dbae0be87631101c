//! LaTeX and CSV output.
//!
//! The LaTeX snippets are pasted verbatim into AASTeX manuscripts, so the exact bytes matter:
//!
//! ```text
//! \orcidlink{0000-0001-2345-6789}\author[0000-0001-2345-6789]{Jane Doe}
//! \affiliation{Uni A}
//! \affiliation{Uni B}
//!
//! \author{John Smith}
//! \affiliation{Lab X}
//!
//! ```
//!
//! The numbered variant writes one line per author and a separate affiliation list:
//!
//! ```text
//! \orcidlink{0000-0001-2345-6789}Jane Doe,$^{1,2}$
//! John Smith,$^{3}$
//! ```
//!
//! ```text
//! $^{1}$ Uni A \\
//! $^{2}$ Uni B \\
//! $^{3}$ Lab X \\
//! ```
//!
//! Names and affiliations are written as they are; any LaTeX escaping must already be present in
//! the roster.

use super::*;

/// Appends the `\orcidlink{}` command for `author` if links are enabled and it has an ORCID.
fn push_orcid_link(line: &mut String, author: &AuthorRecord, orcid_links: bool) {
  if let Some(orcid) = author.orcid.as_deref().filter(|_| orcid_links) {
    line.push_str(&format!(r"\orcidlink{{{orcid}}}"));
  }
}

/// Renders AASTeX `\author` / `\affiliation` blocks, each followed by a blank line.
pub fn aastex(authors: &[AuthorRecord], orcid_links: bool) -> String {
  let mut out = String::new();
  for author in authors {
    push_orcid_link(&mut out, author, orcid_links);
    let name = &author.display_name;
    match author.orcid.as_deref() {
      Some(orcid) => out.push_str(&format!("\\author[{orcid}]{{{name}}}\n")),
      None => out.push_str(&format!("\\author{{{name}}}\n")),
    }
    for affiliation in &author.affiliations {
      out.push_str(&format!("\\affiliation{{{affiliation}}}\n"));
    }
    out.push('\n');
  }
  out
}

/// Affiliations numbered by first appearance in the final author order.
///
/// Built once from the ordered author list; numbering starts at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliationTable {
  /// Affiliations in numbering order, `entries[n - 1]` has number `n`
  entries: Vec<String>,
  /// Number of each affiliation
  index:   HashMap<String, usize>,
}

impl AffiliationTable {
  /// Numbers every affiliation of `authors`, scanning authors in order and each author's
  /// affiliations in order.
  pub fn build(authors: &[AuthorRecord]) -> Self {
    let mut table = Self::default();
    for affiliation in authors.iter().flat_map(|author| &author.affiliations) {
      if !table.index.contains_key(affiliation) {
        table.entries.push(affiliation.clone());
        table.index.insert(affiliation.clone(), table.entries.len());
      }
    }
    trace!("Numbered {} distinct affiliations", table.entries.len());
    table
  }

  /// Number assigned to `affiliation`.
  pub fn number(&self, affiliation: &str) -> Option<usize> { self.index.get(affiliation).copied() }

  /// Number of distinct affiliations.
  pub fn len(&self) -> usize { self.entries.len() }

  /// Whether no author had an affiliation.
  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// `(number, affiliation)` pairs in numbering order.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
    self.entries.iter().enumerate().map(|(i, affiliation)| (i + 1, affiliation.as_str()))
  }
}

/// Renders one line per author: the name followed by superscripted affiliation numbers.
///
/// Affiliations missing from `table` are skipped, which only happens when `table` was built
/// from a different author list.
pub fn numbered_authors(
  authors: &[AuthorRecord],
  table: &AffiliationTable,
  orcid_links: bool,
) -> String {
  let mut out = String::new();
  for author in authors {
    push_orcid_link(&mut out, author, orcid_links);
    let numbers: Vec<String> = author
      .affiliations
      .iter()
      .filter_map(|affiliation| table.number(affiliation))
      .map(|number| number.to_string())
      .collect();
    out.push_str(&author.display_name);
    if !numbers.is_empty() {
      out.push_str(&format!(",$^{{{}}}$", numbers.join(",")));
    }
    out.push('\n');
  }
  out
}

/// Renders the numbered affiliation list, one `$^{n}$ Affiliation \\` line per entry.
pub fn numbered_affiliations(table: &AffiliationTable) -> String {
  let mut out = String::new();
  for (number, affiliation) in table.iter() {
    out.push_str(&format!("$^{{{number}}}$ {affiliation} \\\\\n"));
  }
  out
}

/// One row of the journal submission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow<'a> {
  /// 1-based position in the author list
  #[serde(rename = "Order")]
  pub order:      usize,
  /// First name as written in the roster
  #[serde(rename = "Firstname")]
  pub first_name: &'a str,
  /// Last name as written in the roster
  #[serde(rename = "Lastname")]
  pub last_name:  &'a str,
  /// Contact email, empty when unknown
  #[serde(rename = "Email")]
  pub email:      &'a str,
}

/// Submission rows for `authors`, numbered from 1.
pub fn output_rows(authors: &[AuthorRecord]) -> Vec<OutputRow<'_>> {
  authors
    .iter()
    .enumerate()
    .map(|(i, author)| OutputRow {
      order:      i + 1,
      first_name: &author.first_name,
      last_name:  &author.last_name,
      email:      author.email.as_deref().unwrap_or_default(),
    })
    .collect()
}

/// Renders the submission table with header `Order,Firstname,Lastname,Email`.
pub fn submission_csv(authors: &[AuthorRecord]) -> Result<String> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  let rows = output_rows(authors);
  if rows.is_empty() {
    writer.write_record(["Order", "Firstname", "Lastname", "Email"])?;
  }
  for row in rows {
    writer.serialize(row)?;
  }
  let bytes = writer.into_inner().map_err(|e| AuthorListError::Io(e.into_error()))?;
  String::from_utf8(bytes)
    .map_err(|e| AuthorListError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
