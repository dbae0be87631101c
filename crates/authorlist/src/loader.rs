//! Reading the roster CSV and the author category files.

use std::io::{BufRead, BufReader};

use super::*;

/// Header aliases for the first-name column.
const FIRST_NAME: &[&str] = &["firstname", "givenname", "first"];
/// Header aliases for the last-name column.
const LAST_NAME: &[&str] = &["lastname", "familyname", "surname", "last"];
/// Header aliases for the affiliation column.
const AFFILIATION: &[&str] = &["affiliation", "institution"];
/// Header aliases for the ORCID column.
const ORCID: &[&str] = &["orcid", "orcidid"];
/// Header aliases for the typeset-name column.
const AUTHOR_NAME: &[&str] = &["authorname", "displayname"];

/// Column positions of a roster file.
struct Columns {
  /// First name, required
  first:       usize,
  /// Last name, required
  last:        usize,
  /// Affiliation, required
  affiliation: usize,
  /// ORCID, optional
  orcid:       Option<usize>,
  /// Typeset name, optional
  author_name: Option<usize>,
}

impl Columns {
  /// Locates the roster columns, failing when a required one is absent.
  fn locate(path: &Path, headers: &csv::StringRecord) -> Result<Self> {
    let required = |aliases: &[&str], label: &str| {
      find_column(headers, aliases).ok_or_else(|| AuthorListError::MalformedRow {
        path:   path.to_path_buf(),
        line:   0,
        reason: format!("missing required column '{label}'"),
      })
    };
    Ok(Self {
      first:       required(FIRST_NAME, "Firstname")?,
      last:        required(LAST_NAME, "Lastname")?,
      affiliation: required(AFFILIATION, "Affiliation")?,
      orcid:       find_column(headers, ORCID),
      author_name: find_column(headers, AUTHOR_NAME),
    })
  }
}

/// Loads the author roster, merging rows that share an identity.
///
/// Each row names one author and one affiliation; an author with several affiliations appears
/// on several rows. Invalid ORCIDs are dropped and recorded in `report`.
///
/// # Errors
///
/// - [`AuthorListError::MissingFile`] if `path` does not exist
/// - [`AuthorListError::MalformedRow`] if a required column is missing or a row has a blank name
/// - [`AuthorListError::Csv`] if the file is not readable CSV
pub fn load_roster(path: impl AsRef<Path>, report: &mut Report) -> Result<Vec<AuthorRecord>> {
  let path = path.as_ref();
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(open(path)?);

  let headers = reader.headers()?.clone();
  let columns = Columns::locate(path, &headers)?;

  let mut merger = merge::Merger::new();
  let mut rows = 0usize;
  for row in reader.records() {
    let row = row?;
    let line = row.position().map_or(0, csv::Position::line);
    if row.iter().all(str::is_empty) {
      continue;
    }

    let cell = |i: usize| row.get(i).unwrap_or_default();
    let (first, last) = (cell(columns.first), cell(columns.last).trim_end_matches(',').trim());
    if first.is_empty() || last.is_empty() {
      return Err(AuthorListError::MalformedRow {
        path: path.to_path_buf(),
        line,
        reason: "blank first or last name".to_string(),
      });
    }

    let mut record = AuthorRecord::new(first, last).with_affiliation(cell(columns.affiliation));
    if let Some(i) = columns.author_name {
      record = record.with_display_name(cell(i));
    }
    if let Some(raw) = columns.orcid.map(cell).filter(|raw| !raw.is_empty()) {
      match author::normalize_orcid(raw) {
        Some(orcid) => record = record.with_orcid(orcid),
        None => report
          .push(Finding::InvalidOrcid { author: record.full_name(), value: raw.to_string() }),
      }
    }

    merger.absorb(record);
    rows += 1;
  }

  let (authors, conflicts) = merger.finish();
  for finding in conflicts.iter() {
    report.push(finding.clone());
  }
  info!("Loaded {} authors from {rows} rows of {}", authors.len(), path.display());
  Ok(authors)
}

/// Reads a category file: one name per line.
///
/// Surrounding whitespace is trimmed; blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// [`AuthorListError::MissingFile`] if `path` does not exist.
pub fn load_category(path: impl AsRef<Path>) -> Result<Vec<String>> {
  let path = path.as_ref();
  let reader = BufReader::new(open(path)?);
  let mut names = Vec::new();
  for line in reader.lines() {
    let line = line?;
    let name = line.trim().trim_start_matches('\u{feff}');
    if !name.is_empty() && !name.starts_with('#') {
      names.push(name.to_string());
    }
  }
  debug!("Read {} names from {}", names.len(), path.display());
  Ok(names)
}
