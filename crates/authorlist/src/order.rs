//! Final placement of authors.
//!
//! The author list is the concatenation of three groups:
//!
//! 1. first-tier authors, in the order they were listed
//! 2. infrastructure authors, alphabetically by last name then first name
//! 3. every other author, alphabetically by last name then first name
//!
//! Alphabetical comparisons use [folded](author::fold) names, so `Ávila` sorts with `Avila`.
//! Authors that compare equal keep their roster order.

use super::*;

/// Sizes of the groups in an ordered author list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Groups {
  /// Number of first-tier authors at the head of the list
  pub first_tier:     usize,
  /// Number of infrastructure authors following them
  pub infrastructure: usize,
  /// Number of remaining authors at the tail
  pub remaining:      usize,
}

/// Orders `authors` into first-tier, infrastructure and remaining groups.
///
/// `first_tier` and `infrastructure` hold the identities resolved from the category files.
/// Identities listed more than once are placed once, at their first position; infrastructure
/// identities that are also first-tier stay in the first tier.
///
/// # Errors
///
/// [`AuthorListError::MissingAuthor`] if a first-tier identity has no record in `authors`.
/// Infrastructure identities without a record are ignored, since they cannot be resolved to one
/// in the first place.
pub fn order_authors(
  authors: Vec<AuthorRecord>,
  first_tier: &[Identity],
  infrastructure: &[Identity],
) -> Result<(Vec<AuthorRecord>, Groups)> {
  let mut slots: Vec<Option<AuthorRecord>> = authors.into_iter().map(Some).collect();
  let position: HashMap<Identity, usize> = slots
    .iter()
    .enumerate()
    .filter_map(|(i, slot)| slot.as_ref().map(|record| (record.identity(), i)))
    .rev()
    .collect();

  let mut ordered = Vec::with_capacity(slots.len());
  let mut groups = Groups::default();

  for identity in first_tier {
    let &i =
      position.get(identity).ok_or_else(|| AuthorListError::MissingAuthor(identity.to_string()))?;
    if let Some(record) = slots[i].take() {
      trace!("First-tier #{}: {}", groups.first_tier + 1, record.full_name());
      ordered.push(record);
      groups.first_tier += 1;
    }
  }

  let mut infra: Vec<AuthorRecord> = infrastructure
    .iter()
    .filter_map(|identity| position.get(identity).and_then(|&i| slots[i].take()))
    .collect();
  sort_alphabetically(&mut infra);
  groups.infrastructure = infra.len();
  ordered.extend(infra);

  let mut remaining: Vec<AuthorRecord> = slots.into_iter().flatten().collect();
  sort_alphabetically(&mut remaining);
  groups.remaining = remaining.len();
  ordered.extend(remaining);

  debug!(
    "Ordered {} authors: {} first-tier, {} infrastructure, {} remaining",
    ordered.len(),
    groups.first_tier,
    groups.infrastructure,
    groups.remaining
  );
  Ok((ordered, groups))
}

/// Stable sort by folded last name, then folded first name.
pub fn sort_alphabetically(authors: &mut [AuthorRecord]) {
  authors.sort_by_cached_key(AuthorRecord::sort_key);
}
