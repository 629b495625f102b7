//! Due-set selection.
//!
//! Operates on a snapshot of the store so the result only depends on its
//! inputs. Registered items come back oldest-due first with the id as a
//! tie-break, so the same snapshot always yields the same order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::ReviewState;

/// Ids of registered items with `next_review_at <= now`
pub fn select_due(snapshot: &[(String, ReviewState)], now: DateTime<Utc>) -> Vec<String> {
  let mut due: Vec<&(String, ReviewState)> = snapshot
    .iter()
    .filter(|(_, state)| state.is_due(now))
    .collect();
  due.sort_by(|(a_id, a), (b_id, b)| {
    a.next_review_at
      .cmp(&b.next_review_at)
      .then_with(|| a_id.cmp(b_id))
  });
  due.into_iter().map(|(id, _)| id.clone()).collect()
}

/// Filter caller-supplied ids down to the due ones, keeping caller order.
///
/// An id without a recorded state has never been reviewed and is always due.
pub fn select_due_among<S: AsRef<str>>(
  candidates: &[S],
  snapshot: &[(String, ReviewState)],
  now: DateTime<Utc>,
) -> Vec<String> {
  let states: HashMap<&str, &ReviewState> = snapshot
    .iter()
    .map(|(id, state)| (id.as_str(), state))
    .collect();

  candidates
    .iter()
    .map(S::as_ref)
    .filter(|id| states.get(id).is_none_or(|state| state.is_due(now)))
    .map(str::to_string)
    .collect()
}
