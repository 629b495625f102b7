use serde::{Deserialize, Serialize};

/// A learnable item as supplied by the catalog.
///
/// The engine only ever looks at `id`; `content` is carried for callers that
/// hand whole records around (exercise body, flashcard question/answer, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewableItem {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content: Option<serde_json::Value>,
}

impl ReviewableItem {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      content: None,
    }
  }

  pub fn with_content(id: impl Into<String>, content: serde_json::Value) -> Self {
    Self {
      id: id.into(),
      content: Some(content),
    }
  }
}

impl From<&str> for ReviewableItem {
  fn from(id: &str) -> Self {
    Self::new(id)
  }
}
