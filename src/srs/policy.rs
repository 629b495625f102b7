//! Scheduling strategies selectable per catalog.
//!
//! Both strategies grew out of separate review screens and use materially
//! different formulas, so each stays reproducible on its own:
//! - `boolean-outcome`: pass/fail ladder 1 → 6 → interval * ease, ease in [1.3, 2.5]
//! - `graded-outcome`: interval * ease * {0.5, 1.0, 1.3}, ease floored at 1.3

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{boolean, graded};
use crate::config::MAX_BOOLEAN_EASE;
use crate::domain::{Grade, ReviewState};
use crate::error::{Result, SchedulerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingPolicy {
  /// Exercise review: correct/incorrect
  BooleanOutcome,
  /// Flashcard review: hard/medium/easy
  GradedOutcome,
}

impl SchedulingPolicy {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::BooleanOutcome => "boolean-outcome",
      Self::GradedOutcome => "graded-outcome",
    }
  }

  /// Check `state` against the bounds this policy keeps.
  ///
  /// On top of the shared checks, boolean-outcome rejects an ease above its
  /// ceiling, e.g. one left behind by a catalog that used to be graded.
  pub fn validate(&self, id: &str, state: &ReviewState) -> Result<()> {
    state.validate(id)?;
    if *self == Self::BooleanOutcome && state.ease_factor > MAX_BOOLEAN_EASE {
      return Err(SchedulerError::invalid_state(
        id,
        format!(
          "ease factor {} is above the {} ceiling of {}",
          state.ease_factor,
          self.as_str(),
          MAX_BOOLEAN_EASE
        ),
      ));
    }
    Ok(())
  }

  /// Compute the state following a review at `now`.
  ///
  /// `current` is validated first (see [`Self::validate`]); a corrupted state
  /// is reported as `InvalidState` rather than silently repaired. The input is
  /// never modified.
  pub fn next_state(
    &self,
    id: &str,
    current: &ReviewState,
    grade: Grade,
    now: DateTime<Utc>,
  ) -> Result<ReviewState> {
    self.validate(id, current)?;

    let mut next = current.clone();
    match self {
      Self::BooleanOutcome => boolean::apply(&mut next, grade.is_recalled()),
      Self::GradedOutcome => graded::apply(&mut next, grade),
    }
    next.schedule(id, now)?;

    tracing::debug!(
      "{} review of '{}' ({}): interval {} -> {}, ease {:.2} -> {:.2}",
      self.as_str(),
      id,
      grade.as_str(),
      current.interval,
      next.interval,
      current.ease_factor,
      next.ease_factor
    );
    Ok(next)
  }
}
