use authorlist::{merge::merge, order::Groups, report::Unmatched};

use super::*;

#[test]
fn test_first_tier_is_prefix_in_listed_order() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Jane Doe\nSven Heydenreich\n", "Carl Zeiss\n");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;

  let names = names(&list);
  assert_eq!(names[..2], ["Jane Doe", "Sven Heydenreich"]);
  assert_eq!(names.iter().filter(|n| *n == "Jane Doe").count(), 1);
  assert_eq!(names[2], "Carl Zeiss");
  Ok(())
}

#[test]
fn test_infrastructure_then_remaining_alphabetical() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "Carl Zeiss\nDoe, Jane\n");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;

  assert_eq!(names(&list), vec![
    "Sven Heydenreich",
    "Jane Doe",
    "Carl Zeiss",
    "Amy Adams",
    "Zoë Ávila",
    "Bob Brown",
  ]);
  assert_eq!(list.groups(), Groups { first_tier: 1, infrastructure: 2, remaining: 3 });
  Ok(())
}

#[test]
fn test_duplicate_rows_become_one_author() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;

  let jane: Vec<_> = list.authors().iter().filter(|a| a.last_name == "Doe").collect();
  assert_eq!(jane.len(), 1);
  assert_eq!(jane[0].affiliations, vec!["Uni A", "Uni B"]);
  Ok(())
}

#[test]
fn test_merging_output_again_changes_nothing() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "Bob Brown\n");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;

  let authors = list.authors().to_vec();
  assert_eq!(merge([authors.clone()]), authors);
  assert_eq!(merge([authors.clone(), authors.clone()]), authors);
  Ok(())
}

#[test]
fn test_missing_first_tier_author_aborts_without_output() {
  let workspace = Workspace::new(ROSTER, "Jane Doe\nAlan Turing\n", "");
  let destinations = workspace.destinations();

  let result = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)
    .and_then(|list| list.write(&destinations));

  match result {
    Err(AuthorListError::MissingAuthor(name)) => assert_eq!(name, "Alan Turing"),
    other => panic!("expected a missing author error, got {other:?}"),
  }
  assert!(!destinations.aastex.exists());
  assert!(!destinations.submission_csv.exists());
}

#[test]
fn test_unmatched_infrastructure_without_fuzzy_is_reported() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "J. Doe\nCarl Zeiss\n");
  let config = workspace.config.clone().with_fuzzy_matching(false);
  let mut never_asked = |_: &str, _: &[Candidate<'_>]| -> Result<Option<usize>, AuthorListError> {
    panic!("resolver must not be consulted with fuzzy matching disabled")
  };
  let list = AuthorList::assemble(&workspace.sources, &config, &mut never_asked)?;

  assert_eq!(list.report().unmatched_infrastructure(), vec!["J. Doe"]);
  assert!(list.report().iter().any(|f| *f
    == Finding::UnmatchedInfrastructure {
      name:   "J. Doe".to_string(),
      reason: Unmatched::FuzzyDisabled,
    }));
  assert_eq!(list.groups().infrastructure, 1);

  // Jane Doe is still an author, just not placed with the infrastructure group.
  let names = names(&list);
  assert_eq!(names[1], "Carl Zeiss");
  assert!(names[2..].contains(&"Jane Doe".to_string()));
  Ok(())
}

#[test]
fn test_fuzzy_candidates_exclude_first_tier() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Jane Doe\n", "Jane Do\n");
  let mut offered = 0;
  let mut count = |_: &str, candidates: &[Candidate<'_>]| -> Result<Option<usize>, AuthorListError> {
    offered += candidates.len();
    Ok(None)
  };
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut count)?;

  assert_eq!(offered, 0);
  assert_eq!(list.report().unmatched_infrastructure(), vec!["Jane Do"]);
  Ok(())
}

#[test]
fn test_order_column_matches_latex_blocks() -> TestResult<()> {
  let workspace =
    Workspace::new(ROSTER, "Sven Heydenreich\n", "Carl Zeiss\nBob Brown\n").with_users(USERS);
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;
  let destinations = workspace.destinations();
  list.write(&destinations)?;

  let csv = workspace.read("authors.csv.out");
  let mut lines = csv.lines();
  assert_eq!(lines.next(), Some("Order,Firstname,Lastname,Email"));
  let rows: Vec<Vec<&str>> = lines.map(|line| line.split(',').collect()).collect();
  let orders: Vec<usize> = rows.iter().map(|row| row[0].parse().unwrap()).collect();
  assert_eq!(orders, (1..=list.authors().len()).collect::<Vec<_>>());

  let tex = workspace.read("authors.tex");
  let blocks: Vec<&str> = tex.split("\n\n").filter(|block| !block.is_empty()).collect();
  assert_eq!(blocks.len(), rows.len());
  for (block, row) in blocks.iter().zip(&rows) {
    let expected = format!("{{{} {}}}", row[1], row[2]);
    assert!(block.lines().next().unwrap().ends_with(&expected), "{block} vs {row:?}");
  }

  assert_eq!(rows[0], vec!["1", "Sven", "Heydenreich", "sven@uni-bonn.de"]);
  assert_eq!(rows[1], vec!["2", "Bob", "Brown", "bob@lab-b.org"]);
  Ok(())
}

#[test]
fn test_latex_output_is_exact() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\nJane Doe\n", "");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;
  let artifacts = list.render(false)?;

  assert!(artifacts.aastex.starts_with(
    "\\orcidlink{0000-0002-1825-0097}\\author[0000-0002-1825-0097]{Sven Heydenreich}\n\
     \\affiliation{University of Bonn}\n\
     \n\
     \\author{Jane Doe}\n\
     \\affiliation{Uni A}\n\
     \\affiliation{Uni B}\n\
     \n"
  ));
  assert!(artifacts.numbered.is_none());

  let config = workspace.config.clone().with_orcid_links(false);
  let list = AuthorList::assemble(&workspace.sources, &config, &mut Decline)?;
  let artifacts = list.render(false)?;
  assert!(artifacts.aastex.starts_with("\\author[0000-0002-1825-0097]{Sven Heydenreich}\n"));
  Ok(())
}

#[test]
fn test_numbered_affiliations_share_indices() -> TestResult<()> {
  let roster = "Firstname,Lastname,Affiliation\nJane,Doe,Shared Institute\nJane,Doe,Uni \
                A\nJohn,Smith,Uni B\nJohn,Smith,Shared Institute\n";
  let workspace = Workspace::new(roster, "Jane Doe\nJohn Smith\n", "");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;

  let table = AffiliationTable::build(list.authors());
  assert_eq!(table.len(), 3);

  let destinations = workspace
    .destinations()
    .with_numbered(workspace.path("alt_authors.tex"), workspace.path("alt_affiliations.tex"));
  list.write(&destinations)?;

  assert_eq!(workspace.read("alt_authors.tex"), "Jane Doe,$^{1,2}$\nJohn Smith,$^{3,1}$\n");
  assert_eq!(
    workspace.read("alt_affiliations.tex"),
    "$^{1}$ Shared Institute \\\\\n$^{2}$ Uni A \\\\\n$^{3}$ Uni B \\\\\n"
  );
  Ok(())
}

#[test]
fn test_two_authors_one_shared_affiliation() -> TestResult<()> {
  let roster = "Firstname,Lastname,Affiliation\nJane,Doe,Shared\nJohn,Smith,Shared\n";
  let workspace = Workspace::new(roster, "Jane Doe\nJohn Smith\n", "");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;
  let (authors, affiliations) = list.render(true)?.numbered.unwrap();

  assert_eq!(authors, "Jane Doe,$^{1}$\nJohn Smith,$^{1}$\n");
  assert_eq!(affiliations, "$^{1}$ Shared \\\\\n");
  Ok(())
}

#[test]
fn test_missing_email_database_still_writes_output() -> TestResult<()> {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "");
  let list = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline)?;
  list.write(&workspace.destinations())?;

  assert!(list.authors().iter().all(|a| a.email.is_none()));
  assert!(matches!(list.report().iter().next(), Some(Finding::MissingEmailDatabase(_))));
  assert!(workspace.read("authors.csv.out").contains("1,Sven,Heydenreich,\n"));
  Ok(())
}

#[test]
fn test_missing_category_file_is_fatal() {
  let workspace = Workspace::new(ROSTER, "Sven Heydenreich\n", "");
  std::fs::remove_file(&workspace.sources.infrastructure).unwrap();
  let result = AuthorList::assemble(&workspace.sources, &workspace.config, &mut Decline);
  assert!(matches!(result, Err(AuthorListError::MissingFile(path)) if path.ends_with("infrastructure.txt")));
}
