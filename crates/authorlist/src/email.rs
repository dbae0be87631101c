//! Attaching contact emails from the collaboration's member database.
//!
//! The member database is a CSV export with a `Name` column (`"Last, First"`, sometimes with the
//! comma followed by a literal `&nbsp;`) and an `Email` column. It is optional: when it is
//! missing or unusable the author list is still produced, just without emails.

use std::collections::hash_map::Entry;

use super::*;

/// Header aliases for the name column.
const NAME: &[&str] = &["name", "fullname"];
/// Header aliases for the email column.
const EMAIL: &[&str] = &["email", "emailaddress", "mail"];

/// Result of looking an identity up in the member database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
  /// Exactly one address is known
  Found(&'a str),
  /// Several different addresses are known
  Ambiguous,
  /// No address is known
  Missing,
}

/// Emails by identity.
#[derive(Debug, Clone, Default)]
pub struct EmailDatabase {
  /// Distinct addresses per identity, in file order
  entries: HashMap<Identity, Vec<String>>,
}

impl EmailDatabase {
  /// Reads a member database.
  ///
  /// Rows with a blank name or email are skipped. A name without a comma is registered under
  /// every first/last split (see [`Identity::candidates`]).
  ///
  /// # Errors
  ///
  /// - [`AuthorListError::MissingFile`] if `path` does not exist
  /// - [`AuthorListError::MalformedRow`] if the `Name` or `Email` column is missing
  /// - [`AuthorListError::Csv`] if the file is not readable CSV
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
      .flexible(true)
      .trim(csv::Trim::All)
      .from_reader(open(path)?);

    let headers = reader.headers()?.clone();
    let column = |aliases: &[&str], label: &str| {
      find_column(&headers, aliases).ok_or_else(|| AuthorListError::MalformedRow {
        path:   path.to_path_buf(),
        line:   0,
        reason: format!("missing required column '{label}'"),
      })
    };
    let (name_column, email_column) = (column(NAME, "Name")?, column(EMAIL, "Email")?);

    let mut database = Self::default();
    for row in reader.records() {
      let row = row?;
      let (Some(name), Some(email)) = (row.get(name_column), row.get(email_column)) else {
        continue;
      };
      if email.is_empty() {
        continue;
      }
      for identity in Identity::candidates(name) {
        database.insert(identity, email);
      }
    }
    debug!("Read emails for {} names from {}", database.entries.len(), path.display());
    Ok(database)
  }

  /// Registers `email` for `identity`, ignoring exact repeats.
  pub fn insert(&mut self, identity: Identity, email: &str) {
    match self.entries.entry(identity) {
      Entry::Occupied(mut entry) => {
        if !entry.get().iter().any(|known| known.eq_ignore_ascii_case(email)) {
          entry.get_mut().push(email.to_string());
        }
      },
      Entry::Vacant(entry) => {
        entry.insert(vec![email.to_string()]);
      },
    }
  }

  /// Looks up the email for `identity`.
  pub fn lookup(&self, identity: &Identity) -> Lookup<'_> {
    match self.entries.get(identity).map(Vec::as_slice) {
      Some([email]) => Lookup::Found(email),
      Some([_, _, ..]) => Lookup::Ambiguous,
      _ => Lookup::Missing,
    }
  }

  /// Fills in the email of every author that has none yet.
  ///
  /// Ambiguous matches are reported individually; authors without a match are reported together
  /// in one [`Finding::MissingEmails`].
  pub fn attach(&self, authors: &mut [AuthorRecord], report: &mut Report) {
    let mut missing = Vec::new();
    for author in authors.iter_mut().filter(|author| author.email.is_none()) {
      match self.lookup(&author.identity()) {
        Lookup::Found(email) => author.email = Some(email.to_string()),
        Lookup::Ambiguous => report.push(Finding::AmbiguousEmail { author: author.full_name() }),
        Lookup::Missing => missing.push(author.full_name()),
      }
    }
    if !missing.is_empty() {
      report.push(Finding::MissingEmails(missing));
    }
  }
}

/// Attaches emails from the database at `path`.
///
/// Never fails: a missing or malformed database is recorded in `report` and every email is left
/// as it was.
pub fn attach_emails(path: impl AsRef<Path>, authors: &mut [AuthorRecord], report: &mut Report) {
  let path = path.as_ref();
  match EmailDatabase::from_path(path) {
    Ok(database) => database.attach(authors, report),
    Err(AuthorListError::MissingFile(path)) => report.push(Finding::MissingEmailDatabase(path)),
    Err(e) => report.push(Finding::MalformedEmailDatabase {
      path:   path.to_path_buf(),
      reason: e.to_string(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn database(content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Users.csv");
    std::fs::write(&path, content).unwrap();
    (dir, path)
  }

  #[test]
  fn test_lookup_forms() {
    let (_dir, path) = database(
      "Name,Email\n\"Doe,&nbsp;Jane\",jane@uni.edu\n\"Smith, John\",john@lab.org\nAda \
       Lovelace,ada@engine.uk\n",
    );
    let database = EmailDatabase::from_path(&path).unwrap();
    assert_eq!(database.lookup(&Identity::new("Jane", "Doe")), Lookup::Found("jane@uni.edu"));
    assert_eq!(database.lookup(&Identity::new("john", "SMITH")), Lookup::Found("john@lab.org"));
    assert_eq!(database.lookup(&Identity::new("Ada", "Lovelace")), Lookup::Found("ada@engine.uk"));
    assert_eq!(database.lookup(&Identity::new("Alan", "Turing")), Lookup::Missing);
  }

  #[traced_test]
  #[test]
  fn test_attach_reports_ambiguous_and_missing() {
    let (_dir, path) = database(
      "Name,Email\n\"Doe, Jane\",jane@uni.edu\n\"Doe, Jane\",jane.doe@other.edu\n\"Doe, \
       Jane\",JANE@uni.edu\n\"Smith, John\",john@lab.org\n",
    );
    let mut authors = vec![
      AuthorRecord::new("Jane", "Doe"),
      AuthorRecord::new("John", "Smith"),
      AuthorRecord::new("Alan", "Turing"),
      AuthorRecord::new("Ada", "Lovelace").with_email("ada@engine.uk"),
    ];
    let mut report = Report::new();
    attach_emails(&path, &mut authors, &mut report);

    assert_eq!(authors[0].email, None);
    assert_eq!(authors[1].email.as_deref(), Some("john@lab.org"));
    assert_eq!(authors[3].email.as_deref(), Some("ada@engine.uk"));
    assert_eq!(report.iter().cloned().collect::<Vec<_>>(), vec![
      Finding::AmbiguousEmail { author: "Jane Doe".to_string() },
      Finding::MissingEmails(vec!["Alan Turing".to_string()]),
    ]);
    assert!(logs_contain("Can't find email"));
  }

  #[test]
  fn test_missing_database_is_not_fatal() {
    let dir = tempdir().unwrap();
    let mut authors = vec![AuthorRecord::new("Jane", "Doe")];
    let mut report = Report::new();
    attach_emails(dir.path().join("Users.csv"), &mut authors, &mut report);

    assert_eq!(authors[0].email, None);
    assert!(matches!(report.iter().next(), Some(Finding::MissingEmailDatabase(_))));
    assert_eq!(report.len(), 1);
  }

  #[test]
  fn test_malformed_database_is_not_fatal() {
    let (_dir, path) = database("Who,Address\nJane Doe,jane@uni.edu\n");
    let mut authors = vec![AuthorRecord::new("Jane", "Doe")];
    let mut report = Report::new();
    attach_emails(&path, &mut authors, &mut report);

    assert_eq!(authors[0].email, None);
    match report.iter().next() {
      Some(Finding::MalformedEmailDatabase { reason, .. }) => assert!(reason.contains("Name")),
      other => panic!("expected a malformed database finding, got {other:?}"),
    };
  }
}
