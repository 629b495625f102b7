use serde::{Deserialize, Serialize};

/// Outcome quality of a single review event.
///
/// Flashcards are self-graded on all three points. Exercises are judged
/// correct/incorrect, which maps onto the two ends of the scale
/// (see [`Grade::from_correct`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
  Hard,
  Medium,
  Easy,
}

impl Grade {
  pub const ALL: [Grade; 3] = [Grade::Hard, Grade::Medium, Grade::Easy];

  /// Normalize an exercise result: correct → Easy, incorrect → Hard
  pub fn from_correct(correct: bool) -> Self {
    if correct { Self::Easy } else { Self::Hard }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Hard => "hard",
      Self::Medium => "medium",
      Self::Easy => "easy",
    }
  }

  /// Whether the learner recalled the item (anything but Hard)
  pub fn is_recalled(&self) -> bool {
    !matches!(self, Self::Hard)
  }
}
