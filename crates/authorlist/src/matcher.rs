//! Resolving free-text names against the roster.
//!
//! Resolution happens in two stages. [`NameMatcher::exact`] compares identities, so case,
//! diacritics and punctuation never matter and both `"First Last"` and `"Last, First"` work.
//! When that fails, [`NameMatcher::fuzzy`] scores every roster entry and hands the best few to a
//! [`Resolver`], which decides whether any of them is the intended person.
//!
//! Candidate lists are deterministic: equal scores keep roster order.

use strsim::normalized_levenshtein;

use super::*;

/// A roster entry offered as a fuzzy match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
  /// The roster entry
  pub record:     &'a AuthorRecord,
  /// Similarity to the query, in percent
  pub confidence: u8,
}

/// Decides which fuzzy candidate, if any, a name refers to.
///
/// Implementations receive the query as written in the category file and the candidates in
/// descending confidence order, and return the index of the chosen candidate or [`None`] for
/// "none of the above". Any `FnMut(&str, &[Candidate]) -> Result<Option<usize>>` closure is a
/// resolver, which keeps tests free of console interaction:
///
/// ```
/// use authorlist::prelude::*;
///
/// fn accept_best(_query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>, AuthorListError> {
///   Ok((!candidates.is_empty()).then_some(0))
/// }
///
/// fn takes_resolver<R: Resolver>(_resolver: &mut R) {}
/// takes_resolver(&mut accept_best);
/// ```
pub trait Resolver {
  /// Picks one of `candidates` for `query`, or none.
  fn resolve(&mut self, query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>>;
}

impl<F> Resolver for F
where F: FnMut(&str, &[Candidate<'_>]) -> Result<Option<usize>>
{
  fn resolve(&mut self, query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>> {
    self(query, candidates)
  }
}

/// Resolver that declines every candidate list.
///
/// Used when there is nobody to ask, e.g. scripted runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Resolver for Decline {
  fn resolve(&mut self, query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>> {
    debug!("Declining {} candidate(s) for '{query}'", candidates.len());
    Ok(None)
  }
}

/// Similarity of two names in percent.
///
/// Both names are [folded](author::fold). The score is the better of the normalized
/// Levenshtein similarity of the folded strings and of their alphabetically sorted words, so
/// `"Doe Jane"` scores 100 against `"Jane Doe"`.
///
/// ```
/// use authorlist::matcher::similarity;
///
/// assert_eq!(similarity("Jane Doe", "jane doe"), 100);
/// assert_eq!(similarity("Doe Jane", "Jane Doe"), 100);
/// assert!(similarity("Jane Do", "Jane Doe") >= 70);
/// assert!(similarity("Sven Heydenreich", "Jane Doe") < 50);
/// ```
pub fn similarity(a: &str, b: &str) -> u8 {
  let (a, b) = (author::fold(a), author::fold(b));
  let direct = normalized_levenshtein(&a, &b);
  let sorted = normalized_levenshtein(&sort_words(&a), &sort_words(&b));
  (direct.max(sorted) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Words of `name` in alphabetical order, joined by single spaces.
fn sort_words(name: &str) -> String {
  let mut words: Vec<&str> = name.split_whitespace().collect();
  words.sort_unstable();
  words.join(" ")
}

/// Looks names up in a fixed pool of roster entries.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher<'a> {
  /// The roster
  pool: &'a [AuthorRecord],
}

impl<'a> NameMatcher<'a> {
  /// Creates a matcher over `pool`.
  pub fn new(pool: &'a [AuthorRecord]) -> Self { Self { pool } }

  /// Finds the entry whose identity equals one reading of `name`.
  ///
  /// When several readings hit different entries, the entry that comes first in the pool wins.
  pub fn exact(&self, name: &str) -> Option<&'a AuthorRecord> {
    let readings = Identity::candidates(name);
    let found = self.pool.iter().find(|record| readings.contains(&record.identity()));
    trace!("Exact lookup for '{name}': {:?}", found.map(AuthorRecord::full_name));
    found
  }

  /// Scores every entry accepted by `eligible` against `name` and returns at most `limit` of
  /// those scoring at least `floor`, best first. Equal scores keep pool order.
  pub fn fuzzy(
    &self,
    name: &str,
    limit: usize,
    floor: u8,
    eligible: impl Fn(&AuthorRecord) -> bool,
  ) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = self
      .pool
      .iter()
      .filter(|record| eligible(*record))
      .map(|record| Candidate { record, confidence: similarity(name, &record.full_name()) })
      .filter(|candidate| candidate.confidence >= floor)
      .collect();
    candidates.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    candidates.truncate(limit);
    debug!(
      "Fuzzy candidates for '{name}': {:?}",
      candidates.iter().map(|c| (c.record.full_name(), c.confidence)).collect::<Vec<_>>()
    );
    candidates
  }

  /// Runs the fuzzy stage and lets `resolver` choose.
  ///
  /// Returns `Ok(None)` both when no candidate passes the floor and when the resolver declines;
  /// use [`NameMatcher::fuzzy`] directly to tell these apart.
  ///
  /// # Errors
  ///
  /// Propagates resolver errors, and returns [`AuthorListError::Prompt`] if the resolver picks
  /// an index outside the candidate list.
  pub fn resolve<R: Resolver>(
    &self,
    name: &str,
    candidates: &[Candidate<'a>],
    resolver: &mut R,
  ) -> Result<Option<&'a AuthorRecord>> {
    if candidates.is_empty() {
      return Ok(None);
    }
    match resolver.resolve(name, candidates)? {
      Some(choice) => candidates.get(choice).map(|c| Some(c.record)).ok_or_else(|| {
        AuthorListError::Prompt(format!(
          "selected candidate {choice} for '{name}', only {} offered",
          candidates.len()
        ))
      }),
      None => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pool() -> Vec<AuthorRecord> {
    vec![
      AuthorRecord::new("Jane", "Doe"),
      AuthorRecord::new("Johannes Ulf", "Lange"),
      AuthorRecord::new("Jana", "Doe"),
      AuthorRecord::new("José", "Núñez"),
      AuthorRecord::new("Sven", "Heydenreich"),
    ]
  }

  #[test]
  fn test_exact_forms() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    assert_eq!(matcher.exact("jane doe").unwrap().full_name(), "Jane Doe");
    assert_eq!(matcher.exact("Doe, Jane").unwrap().full_name(), "Jane Doe");
    assert_eq!(matcher.exact("Johannes Ulf Lange").unwrap().last_name, "Lange");
    assert_eq!(matcher.exact("Jose Nunez").unwrap().last_name, "Núñez");
    assert!(matcher.exact("J. Doe").is_none());
    assert!(matcher.exact("Doe").is_none());
  }

  #[test]
  fn test_fuzzy_is_ordered_and_limited() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    let candidates = matcher.fuzzy("Jane Do", 2, 70, |_| true);
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].record.full_name(), "Jane Doe");
    assert_eq!(candidates[1].record.full_name(), "Jana Doe");
    assert!(candidates[0].confidence >= candidates[1].confidence);
  }

  #[test]
  fn test_fuzzy_ties_keep_pool_order() {
    let pool = vec![
      AuthorRecord::new("Anna", "Berg"),
      AuthorRecord::new("Anne", "Berg"),
      AuthorRecord::new("Anni", "Berg"),
    ];
    let matcher = NameMatcher::new(&pool);
    let candidates = matcher.fuzzy("Ann Berg", 3, 0, |_| true);
    let names: Vec<_> = candidates.iter().map(|c| c.record.first_name.as_str()).collect();
    assert_eq!(names, vec!["Anna", "Anne", "Anni"]);
  }

  #[test]
  fn test_fuzzy_floor_and_eligibility() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    assert!(matcher.fuzzy("Zaphod Beeblebrox", 2, 70, |_| true).is_empty());

    let candidates = matcher.fuzzy("Jane Do", 2, 70, |r| r.first_name != "Jane");
    assert_eq!(candidates[0].record.full_name(), "Jana Doe");
  }

  /// Answers prompts from a script and remembers what it was asked.
  #[derive(Default)]
  struct Scripted {
    answers: Vec<Option<usize>>,
    asked:   Vec<(String, usize)>,
  }

  impl Resolver for Scripted {
    fn resolve(&mut self, query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>> {
      self.asked.push((query.to_string(), candidates.len()));
      Ok(self.answers.remove(0))
    }
  }

  fn pick_first(_query: &str, candidates: &[Candidate<'_>]) -> Result<Option<usize>> {
    Ok((!candidates.is_empty()).then_some(0))
  }

  #[test]
  fn test_resolve_asks_resolver() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    let candidates = matcher.fuzzy("Jane Do", 2, 70, |_| true);

    let mut scripted = Scripted { answers: vec![Some(1), None], ..Default::default() };
    let chosen = matcher.resolve("Jane Do", &candidates, &mut scripted).unwrap();
    assert_eq!(chosen.unwrap().full_name(), "Jana Doe");
    assert!(matcher.resolve("Jane Do", &candidates, &mut scripted).unwrap().is_none());
    assert_eq!(scripted.asked, vec![("Jane Do".to_string(), 2), ("Jane Do".to_string(), 2)]);

    let chosen = matcher.resolve("Jane Do", &candidates, &mut pick_first).unwrap();
    assert_eq!(chosen.unwrap().full_name(), "Jane Doe");
    assert!(matcher.resolve("Jane Do", &candidates, &mut Decline).unwrap().is_none());
  }

  #[test]
  fn test_resolver_not_asked_without_candidates() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    let mut scripted = Scripted::default();
    assert!(matcher.resolve("Nobody", &[], &mut scripted).unwrap().is_none());
    assert!(scripted.asked.is_empty());
  }

  #[test]
  fn test_out_of_range_choice_is_an_error() {
    let pool = pool();
    let matcher = NameMatcher::new(&pool);
    let candidates = matcher.fuzzy("Jane Do", 1, 70, |_| true);
    let mut bogus = Scripted { answers: vec![Some(5)], ..Default::default() };
    assert!(matches!(
      matcher.resolve("Jane Do", &candidates, &mut bogus),
      Err(AuthorListError::Prompt(_))
    ));
  }
}
