//! Author records and the identity they are deduplicated by.
//!
//! Two rows describe the same person when their normalized first and last names agree. The
//! normalization ([`fold`]) lowercases, strips diacritics and treats punctuation as whitespace,
//! so `"Jürgen Müller"`, `"jurgen muller"` and `"Jurgen  MÜLLER"` all share one [`Identity`].

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::*;

lazy_static! {
  /// Bare ORCID iD: four groups of four digits, the final check character may be `X`.
  static ref ORCID: Regex = Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$").unwrap();
}

/// Folds a name for comparison.
///
/// Applies NFKD, drops combining marks, lowercases, maps every non-alphanumeric character to a
/// space and collapses runs of whitespace.
///
/// ```
/// use authorlist::author::fold;
///
/// assert_eq!(fold("  Ana-María  Núñez "), "ana maria nunez");
/// assert_eq!(fold("J. Doe"), "j doe");
/// ```
pub fn fold(name: &str) -> String {
  let mapped: String = name
    .nfkd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .map(|c| if c.is_alphanumeric() { c } else { ' ' })
    .collect();
  mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized (first, last) name pair identifying one person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
  /// Folded first name(s)
  pub first: String,
  /// Folded last name(s)
  pub last:  String,
}

impl Identity {
  /// Builds an identity from raw first and last names.
  pub fn new(first: &str, last: &str) -> Self { Self { first: fold(first), last: fold(last) } }

  /// All identities a free-text name could refer to.
  ///
  /// `"Last, First"` yields exactly one identity. Anything else is split at every word
  /// boundary, so `"Johannes Ulf Lange"` yields `(johannes, ulf lange)` and
  /// `(johannes ulf, lange)`. A single word yields nothing.
  pub fn candidates(name: &str) -> Vec<Self> {
    let name = name.replace("&nbsp;", " ");
    if let Some((last, first)) = name.split_once(',') {
      let identity = Self::new(first, last);
      return if identity.first.is_empty() || identity.last.is_empty() {
        Vec::new()
      } else {
        vec![identity]
      };
    }

    let folded = fold(&name);
    let tokens: Vec<&str> = folded.split(' ').filter(|t| !t.is_empty()).collect();
    (1..tokens.len())
      .map(|i| Self { first: tokens[..i].join(" "), last: tokens[i..].join(" ") })
      .collect()
  }
}

impl Display for Identity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} {}", self.first, self.last)
  }
}

/// Normalizes a raw ORCID cell to the bare `NNNN-NNNN-NNNN-NNNN` form.
///
/// Accepts values prefixed with `https://orcid.org/` (or `http://`, or without scheme) and a
/// lowercase check character. Returns [`None`] for anything that is not a well-formed iD.
///
/// ```
/// use authorlist::author::normalize_orcid;
///
/// assert_eq!(
///   normalize_orcid("https://orcid.org/0000-0002-1825-009x").as_deref(),
///   Some("0000-0002-1825-009X")
/// );
/// assert_eq!(normalize_orcid("0000-0002-1825"), None);
/// ```
pub fn normalize_orcid(raw: &str) -> Option<String> {
  let trimmed = raw.trim();
  let bare = trimmed
    .strip_prefix("https://")
    .or_else(|| trimmed.strip_prefix("http://"))
    .unwrap_or(trimmed);
  let bare = bare.strip_prefix("orcid.org/").unwrap_or(bare).to_uppercase();
  ORCID.is_match(&bare).then_some(bare)
}

/// One author after deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
  /// First (given) name as written in the roster
  pub first_name:   String,
  /// Last (family) name as written in the roster
  pub last_name:    String,
  /// Name as typeset in LaTeX output
  pub display_name: String,
  /// Affiliations in first-seen order, without duplicates
  pub affiliations: Vec<String>,
  /// Bare ORCID iD
  pub orcid:        Option<String>,
  /// Contact email from the member database
  pub email:        Option<String>,
}

impl AuthorRecord {
  /// Creates a record with no affiliations whose display name is `"{first} {last}"`.
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    let first_name = first_name.into().trim().to_string();
    let last_name = last_name.into().trim().to_string();
    let display_name = format!("{first_name} {last_name}");
    Self {
      first_name,
      last_name,
      display_name,
      affiliations: Vec::new(),
      orcid: None,
      email: None,
    }
  }

  /// Overrides the typeset name. Blank names are ignored.
  pub fn with_display_name(mut self, name: &str) -> Self {
    let name = name.trim();
    if !name.is_empty() {
      self.display_name = name.to_string();
    }
    self
  }

  /// Adds an affiliation (see [`AuthorRecord::add_affiliation`]).
  pub fn with_affiliation(mut self, affiliation: &str) -> Self {
    self.add_affiliation(affiliation);
    self
  }

  /// Sets the ORCID iD, which is expected to be normalized already.
  pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
    self.orcid = Some(orcid.into());
    self
  }

  /// Sets the contact email.
  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }

  /// The identity this record is deduplicated by.
  pub fn identity(&self) -> Identity { Identity::new(&self.first_name, &self.last_name) }

  /// `"{first} {last}"` as written in the roster.
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }

  /// Appends an affiliation unless it is blank or already present.
  pub fn add_affiliation(&mut self, affiliation: &str) {
    let affiliation = affiliation.trim();
    if !affiliation.is_empty() && !self.affiliations.iter().any(|a| a == affiliation) {
      self.affiliations.push(affiliation.to_string());
    }
  }

  /// Folds `other` into `self`.
  ///
  /// Affiliations are unioned keeping `self`'s order first. Scalar fields keep the value already
  /// present on `self` and only take `other`'s when `self` has none. Returns the ORCID of `other`
  /// when it was discarded because `self` carries a different one.
  pub fn absorb(&mut self, other: AuthorRecord) -> Option<String> {
    for affiliation in &other.affiliations {
      self.add_affiliation(affiliation);
    }
    if self.display_name == self.full_name() && other.display_name != other.full_name() {
      self.display_name = other.display_name;
    }
    if self.email.is_none() {
      self.email = other.email;
    }
    match (&self.orcid, other.orcid) {
      (None, theirs) => {
        self.orcid = theirs;
        None
      },
      (Some(ours), Some(theirs)) if *ours != theirs => Some(theirs),
      _ => None,
    }
  }

  /// Sort key used for alphabetical placement: folded last name, then folded first name.
  pub(crate) fn sort_key(&self) -> (String, String) {
    (fold(&self.last_name), fold(&self.first_name))
  }
}
