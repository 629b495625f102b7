//! Per-catalog progress summary shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::MASTERED_INTERVAL_DAYS;
use crate::domain::ReviewState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
  pub total: usize,
  pub due: usize,
  /// Items scheduled at least `MASTERED_INTERVAL_DAYS` out
  pub mastered: usize,
  pub never_reviewed: usize,
  /// Mean ease factor, 0 for an empty catalog
  pub average_ease: f64,
}

pub fn compute(snapshot: &[(String, ReviewState)], now: DateTime<Utc>) -> CatalogStats {
  let total = snapshot.len();
  let mut due = 0;
  let mut mastered = 0;
  let mut never_reviewed = 0;
  let mut ease_sum = 0.0;

  for (_, state) in snapshot {
    if state.is_due(now) {
      due += 1;
    }
    if state.interval >= MASTERED_INTERVAL_DAYS {
      mastered += 1;
    }
    if state.last_reviewed_at.is_none() {
      never_reviewed += 1;
    }
    ease_sum += state.ease_factor;
  }

  CatalogStats {
    total,
    due,
    mastered,
    never_reviewed,
    average_ease: if total > 0 { ease_sum / total as f64 } else { 0.0 },
  }
}
