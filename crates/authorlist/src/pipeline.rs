//! One run from input files to written artifacts.
//!
//! [`AuthorList::assemble`] does everything that can fail before output exists: loading,
//! resolving the category files, merging, ordering and attaching emails. Only once it returns
//! are files written, so a fatal error never leaves partial output behind.

use super::*;
use crate::{
  matcher::NameMatcher,
  order::Groups,
  render::{AffiliationTable, OutputRow},
  report::Unmatched,
};

/// Input files of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
  /// Roster CSV, one row per author and affiliation
  pub roster:         PathBuf,
  /// First-tier names, one per line, in author order
  pub first_tier:     PathBuf,
  /// Infrastructure names, one per line
  pub infrastructure: PathBuf,
}

impl Sources {
  /// Bundles the three input paths.
  pub fn new(
    roster: impl AsRef<Path>,
    first_tier: impl AsRef<Path>,
    infrastructure: impl AsRef<Path>,
  ) -> Self {
    Self {
      roster:         roster.as_ref().to_path_buf(),
      first_tier:     first_tier.as_ref().to_path_buf(),
      infrastructure: infrastructure.as_ref().to_path_buf(),
    }
  }
}

/// Output files of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
  /// AASTeX author blocks
  pub aastex:         PathBuf,
  /// Journal submission table
  pub submission_csv: PathBuf,
  /// Numbered-affiliation variant: author lines and affiliation list
  pub numbered:       Option<(PathBuf, PathBuf)>,
}

impl Destinations {
  /// Destinations for the two mandatory artifacts.
  pub fn new(aastex: impl AsRef<Path>, submission_csv: impl AsRef<Path>) -> Self {
    Self {
      aastex:         aastex.as_ref().to_path_buf(),
      submission_csv: submission_csv.as_ref().to_path_buf(),
      numbered:       None,
    }
  }

  /// Also write the numbered-affiliation variant.
  pub fn with_numbered(
    mut self,
    authors: impl AsRef<Path>,
    affiliations: impl AsRef<Path>,
  ) -> Self {
    self.numbered = Some((authors.as_ref().to_path_buf(), affiliations.as_ref().to_path_buf()));
    self
  }
}

/// Rendered output, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
  /// AASTeX author blocks
  pub aastex:         String,
  /// Journal submission table
  pub submission_csv: String,
  /// Numbered author lines and affiliation list
  pub numbered:       Option<(String, String)>,
}

impl Artifacts {
  /// Writes every artifact to its destination.
  ///
  /// # Errors
  ///
  /// [`AuthorListError::Config`] if the numbered variant was rendered but has no destination or
  /// the other way around; [`AuthorListError::Io`] if a file cannot be written.
  pub fn write(&self, destinations: &Destinations) -> Result<()> {
    let numbered = match (&self.numbered, &destinations.numbered) {
      (Some(content), Some(paths)) => Some((content, paths)),
      (None, None) => None,
      _ => {
        return Err(AuthorListError::Config(
          "numbered author and affiliation output must be rendered and written together"
            .to_string(),
        ))
      },
    };

    std::fs::write(&destinations.aastex, &self.aastex)?;
    std::fs::write(&destinations.submission_csv, &self.submission_csv)?;
    if let Some(((authors, affiliations), (authors_path, affiliations_path))) = numbered {
      std::fs::write(authors_path, authors)?;
      std::fs::write(affiliations_path, affiliations)?;
    }
    info!(
      "Wrote {} and {}",
      destinations.aastex.display(),
      destinations.submission_csv.display()
    );
    Ok(())
  }
}

/// The ordered, merged author list of a run.
#[derive(Debug, Clone)]
pub struct AuthorList {
  /// Authors in final order
  authors:     Vec<AuthorRecord>,
  /// Group sizes within `authors`
  groups:      Groups,
  /// Everything that was worked around
  report:      Report,
  /// Whether to emit `\orcidlink{}` commands
  orcid_links: bool,
}

impl AuthorList {
  /// Loads, resolves, merges and orders the authors of a run.
  ///
  /// First-tier names must match a roster entry exactly. Infrastructure names that do not are
  /// offered to `resolver` as fuzzy candidates when fuzzy matching is enabled in `config`, and
  /// otherwise recorded as unmatched.
  ///
  /// # Errors
  ///
  /// - [`AuthorListError::MissingFile`] if an input file is absent
  /// - [`AuthorListError::MalformedRow`] if the roster lacks a required column
  /// - [`AuthorListError::MissingAuthor`] if a first-tier name has no roster entry
  /// - Any error returned by `resolver`
  pub fn assemble<R: Resolver>(
    sources: &Sources,
    config: &Config,
    resolver: &mut R,
  ) -> Result<Self> {
    config.validate()?;
    let first_tier_names = loader::load_category(&sources.first_tier)?;
    let infrastructure_names = loader::load_category(&sources.infrastructure)?;
    info!(
      "{} first-tier and {} infrastructure names",
      first_tier_names.len(),
      infrastructure_names.len()
    );

    let mut report = Report::new();
    let roster = loader::load_roster(&sources.roster, &mut report)?;
    let matcher = NameMatcher::new(&roster);

    let mut first_tier: Vec<&AuthorRecord> = Vec::with_capacity(first_tier_names.len());
    for name in &first_tier_names {
      let record =
        matcher.exact(name).ok_or_else(|| AuthorListError::MissingAuthor(name.clone()))?;
      debug!("First-tier '{name}' resolved to {}", record.full_name());
      if !first_tier.iter().any(|placed| placed.identity() == record.identity()) {
        first_tier.push(record);
      }
    }
    let first_tier_ids: Vec<Identity> = first_tier.iter().map(|r| r.identity()).collect();

    let infrastructure = resolve_infrastructure(
      &matcher,
      &infrastructure_names,
      &first_tier_names,
      &first_tier_ids,
      config,
      resolver,
      &mut report,
    )?;
    let infrastructure_ids: Vec<Identity> = infrastructure.iter().map(|r| r.identity()).collect();

    let merged = merge::merge([
      first_tier.into_iter().cloned().collect::<Vec<_>>(),
      infrastructure.into_iter().cloned().collect(),
      roster.iter().cloned().collect(),
    ]);
    let (mut authors, groups) =
      order::order_authors(merged, &first_tier_ids, &infrastructure_ids)?;

    email::attach_emails(&config.users_csv, &mut authors, &mut report);

    Ok(Self { authors, groups, report, orcid_links: config.orcid_links })
  }

  /// Authors in final order.
  pub fn authors(&self) -> &[AuthorRecord] { &self.authors }

  /// Sizes of the first-tier, infrastructure and remaining groups.
  pub fn groups(&self) -> Groups { self.groups }

  /// Findings recorded while assembling.
  pub fn report(&self) -> &Report { &self.report }

  /// Rows of the submission table.
  pub fn output_rows(&self) -> Vec<OutputRow<'_>> { render::output_rows(&self.authors) }

  /// Renders every artifact, including the numbered variant when `numbered` is set.
  pub fn render(&self, numbered: bool) -> Result<Artifacts> {
    let numbered = numbered.then(|| {
      let table = AffiliationTable::build(&self.authors);
      (
        render::numbered_authors(&self.authors, &table, self.orcid_links),
        render::numbered_affiliations(&table),
      )
    });
    Ok(Artifacts {
      aastex: render::aastex(&self.authors, self.orcid_links),
      submission_csv: render::submission_csv(&self.authors)?,
      numbered,
    })
  }

  /// Renders every artifact `destinations` asks for and writes them.
  pub fn write(&self, destinations: &Destinations) -> Result<()> {
    self.render(destinations.numbered.is_some())?.write(destinations)
  }
}

/// Resolves infrastructure names to roster entries, in file order and without repeats.
///
/// Names that are written exactly like a first-tier name, or resolve to a first-tier author, are
/// skipped silently. Fuzzy candidates never include first-tier authors.
fn resolve_infrastructure<'a, R: Resolver>(
  matcher: &NameMatcher<'a>,
  names: &[String],
  first_tier_names: &[String],
  first_tier: &[Identity],
  config: &Config,
  resolver: &mut R,
  report: &mut Report,
) -> Result<Vec<&'a AuthorRecord>> {
  let mut resolved: Vec<&'a AuthorRecord> = Vec::new();
  let mut seen: Vec<String> = Vec::new();

  for name in names {
    let folded = author::fold(name);
    if seen.contains(&folded) || first_tier_names.iter().any(|n| author::fold(n) == folded) {
      continue;
    }
    seen.push(folded);

    let record = match matcher.exact(name) {
      Some(record) => Some(record),
      None if !config.fuzzy.enabled => {
        report.push(Finding::UnmatchedInfrastructure {
          name:   name.clone(),
          reason: Unmatched::FuzzyDisabled,
        });
        continue;
      },
      None => {
        let candidates = matcher.fuzzy(name, config.fuzzy.limit, config.fuzzy.floor, |r| {
          !first_tier.contains(&r.identity())
        });
        if candidates.is_empty() {
          report.push(Finding::UnmatchedInfrastructure {
            name:   name.clone(),
            reason: Unmatched::NoCandidates,
          });
          continue;
        }
        let chosen = matcher.resolve(name, &candidates, resolver)?;
        if chosen.is_none() {
          report.push(Finding::UnmatchedInfrastructure {
            name:   name.clone(),
            reason: Unmatched::Declined,
          });
        }
        chosen
      },
    };

    if let Some(record) = record {
      let identity = record.identity();
      if first_tier.contains(&identity) {
        debug!("Infrastructure '{name}' is already first-tier");
      } else if !resolved.iter().any(|r| r.identity() == identity) {
        debug!("Infrastructure '{name}' resolved to {}", record.full_name());
        resolved.push(record);
      }
    }
  }
  Ok(resolved)
}
