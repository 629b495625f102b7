use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EASE, INITIAL_INTERVAL, MIN_EASE};
use crate::error::{Result, SchedulerError};

/// Scheduling state of one item.
///
/// Serializes as `{ interval, easeFactor, nextReviewAt, consecutiveCorrect, lastReviewedAt? }`
/// with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
  /// Days until the next review
  pub interval: i64,
  pub ease_factor: f64,
  #[serde(default)]
  pub consecutive_correct: u32,
  pub next_review_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
  /// Default state for a freshly registered item: due immediately.
  pub fn new(now: DateTime<Utc>) -> Self {
    Self {
      interval: INITIAL_INTERVAL,
      ease_factor: DEFAULT_EASE,
      consecutive_correct: 0,
      next_review_at: now,
      last_reviewed_at: None,
    }
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_at <= now
  }

  /// Reject states that could only come from corrupted data.
  pub fn validate(&self, id: &str) -> Result<()> {
    if self.interval < 1 {
      return Err(SchedulerError::invalid_state(
        id,
        format!("interval must be at least 1 day, got {}", self.interval),
      ));
    }
    if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE {
      return Err(SchedulerError::invalid_state(
        id,
        format!("ease factor must be a number >= {}, got {}", MIN_EASE, self.ease_factor),
      ));
    }
    Ok(())
  }

  /// Record a review at `now` that scheduled the item `interval` days out
  pub(crate) fn schedule(&mut self, id: &str, now: DateTime<Utc>) -> Result<()> {
    let next = Duration::try_days(self.interval)
      .and_then(|d| now.checked_add_signed(d))
      .ok_or_else(|| {
        SchedulerError::invalid_state(id, format!("interval of {} days overflows the calendar", self.interval))
      })?;
    self.next_review_at = next;
    self.last_reviewed_at = Some(now);
    Ok(())
  }
}
