use crate::config::{EASE_BONUS, EASE_PENALTY, MAX_BOOLEAN_EASE, MAX_INTERVAL_DAYS, MIN_EASE};
use crate::domain::ReviewState;

/// Next interval/ease/streak for a pass/fail review.
///
/// Success: streak + 1, interval 1 → 6 → interval * ease (ease taken before this
/// review's bonus) up to `MAX_INTERVAL_DAYS`, then ease + 0.15 capped at 2.5.
/// Failure: streak and interval reset, ease - 0.2 floored at 1.3.
pub fn apply(state: &mut ReviewState, recalled: bool) {
  if recalled {
    state.consecutive_correct += 1;
    state.interval = match state.consecutive_correct {
      1 => 1,
      2 => 6,
      _ => (((state.interval as f64) * state.ease_factor).round() as i64).min(MAX_INTERVAL_DAYS),
    };
    state.ease_factor = (state.ease_factor + EASE_BONUS).min(MAX_BOOLEAN_EASE);
  } else {
    state.consecutive_correct = 0;
    state.interval = 1;
    state.ease_factor = (state.ease_factor - EASE_PENALTY).max(MIN_EASE);
  }
}
