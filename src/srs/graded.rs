use crate::config::{EASY_MULTIPLIER, GRADED_EASE_STEP, HARD_MULTIPLIER, MAX_INTERVAL_DAYS, MIN_EASE};
use crate::domain::{Grade, ReviewState};

fn multiplier(grade: Grade) -> f64 {
  match grade {
    Grade::Easy => EASY_MULTIPLIER,
    Grade::Medium => 1.0,
    Grade::Hard => HARD_MULTIPLIER,
  }
}

/// Next interval/ease for a three-point self grade.
///
/// interval' = ceil(interval * ease * multiplier), kept within
/// `1..=MAX_INTERVAL_DAYS`.
/// Easy raises ease by 0.1, medium and hard both lower it by 0.1. The floor is
/// 1.3; there is no ceiling.
pub fn apply(state: &mut ReviewState, grade: Grade) {
  let product = (state.interval as f64) * state.ease_factor * multiplier(grade);
  state.interval = (product.ceil() as i64).clamp(1, MAX_INTERVAL_DAYS);

  let step = if grade == Grade::Easy {
    GRADED_EASE_STEP
  } else {
    -GRADED_EASE_STEP
  };
  state.ease_factor = (state.ease_factor + step).max(MIN_EASE);
}
