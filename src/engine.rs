//! Engine facade: one catalog, one scheduling policy, one store.
//!
//! Mutating operations take `&mut self`, so a review is a single
//! read-modify-write against the store. Callers sharing an engine across
//! tasks wrap it in a mutex (see `state::AppState`).

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::db::ReviewStore;
use crate::domain::{Grade, ReviewState, ReviewableItem};
use crate::error::{Result, SchedulerError};
use crate::srs::{self, SchedulingPolicy};
use crate::stats::{self, CatalogStats};

pub struct Engine<S, C = SystemClock> {
  catalog: String,
  policy: SchedulingPolicy,
  store: S,
  clock: C,
}

impl<S: ReviewStore> Engine<S, SystemClock> {
  pub fn new(catalog: impl Into<String>, policy: SchedulingPolicy, store: S) -> Self {
    Self::with_clock(catalog, policy, store, SystemClock)
  }
}

impl<S: ReviewStore, C: Clock> Engine<S, C> {
  pub fn with_clock(catalog: impl Into<String>, policy: SchedulingPolicy, store: S, clock: C) -> Self {
    Self {
      catalog: catalog.into(),
      policy,
      store,
      clock,
    }
  }

  pub fn catalog(&self) -> &str {
    &self.catalog
  }

  pub fn policy(&self) -> SchedulingPolicy {
    self.policy
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.clock.now()
  }

  /// Register an item, giving it a default state that is due immediately.
  ///
  /// Re-adding a known item keeps its progress. Returns whether a state was created.
  pub fn add_item(&mut self, item: &ReviewableItem) -> Result<bool> {
    if self.store.get(&item.id)?.is_some() {
      return Ok(false);
    }
    self.store.put(&item.id, &ReviewState::new(self.clock.now()))?;
    tracing::info!("Registered '{}' in {}", item.id, self.catalog);
    Ok(true)
  }

  /// Register a batch of items, returning how many were new
  pub fn add_items(&mut self, items: &[ReviewableItem]) -> Result<usize> {
    let mut created = 0;
    for item in items {
      if self.add_item(item)? {
        created += 1;
      }
    }
    Ok(created)
  }

  /// Apply one review to a registered item and persist the result.
  ///
  /// If the store write fails the stored state is left as it was.
  pub fn submit_review(&mut self, id: &str, grade: Grade) -> Result<ReviewState> {
    let current = self
      .store
      .get(id)?
      .ok_or_else(|| SchedulerError::NotFound(id.to_string()))?;

    let next = self.policy.next_state(id, &current, grade, self.clock.now())?;
    self.store.put(id, &next)?;
    Ok(next)
  }

  /// Exercise-style review: correct counts as easy, incorrect as hard
  pub fn submit_answer(&mut self, id: &str, correct: bool) -> Result<ReviewState> {
    self.submit_review(id, Grade::from_correct(correct))
  }

  /// Registered items due at `now`, oldest first
  pub fn due_items(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
    Ok(srs::select_due(&self.store.all()?, now))
  }

  /// Due subset of caller-supplied ids; ids never registered are due
  pub fn due_items_among<T: AsRef<str>>(&self, candidates: &[T], now: DateTime<Utc>) -> Result<Vec<String>> {
    Ok(srs::select_due_among(candidates, &self.store.all()?, now))
  }

  /// All registered items, sorted by id
  pub fn all_items(&self) -> Result<Vec<(String, ReviewState)>> {
    let mut items = self.store.all()?;
    items.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(items)
  }

  pub fn state(&self, id: &str) -> Result<ReviewState> {
    self
      .store
      .get(id)?
      .ok_or_else(|| SchedulerError::NotFound(id.to_string()))
  }

  /// Forget an item that was removed from the catalog
  pub fn remove_item(&mut self, id: &str) -> Result<()> {
    self.store.delete(id)?;
    tracing::info!("Removed '{}' from {}", id, self.catalog);
    Ok(())
  }

  pub fn stats(&self, now: DateTime<Utc>) -> Result<CatalogStats> {
    Ok(stats::compute(&self.store.all()?, now))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::FixedClock;
  use crate::db::{MemoryStore, SqliteStore};
  use crate::error::StorageError;
  use crate::testing::TestEnv;
  use chrono::{Duration, TimeZone};
  use std::sync::Arc;

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap()
  }

  fn engine(policy: SchedulingPolicy) -> (Engine<MemoryStore, Arc<FixedClock>>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(t0()));
    let engine = Engine::with_clock("test", policy, MemoryStore::new(), Arc::clone(&clock));
    (engine, clock)
  }

  /// Store whose writes can be switched off
  struct FlakyStore {
    inner: MemoryStore,
    fail_writes: bool,
  }

  impl ReviewStore for FlakyStore {
    fn get(&self, id: &str) -> Result<Option<ReviewState>> {
      self.inner.get(id)
    }

    fn put(&mut self, id: &str, state: &ReviewState) -> Result<()> {
      if self.fail_writes {
        return Err(StorageError::Io(std::io::Error::other("disk full")).into());
      }
      self.inner.put(id, state)
    }

    fn all(&self) -> Result<Vec<(String, ReviewState)>> {
      self.inner.all()
    }

    fn delete(&mut self, id: &str) -> Result<()> {
      self.inner.delete(id)
    }
  }

  #[test]
  fn test_add_item_creates_default_state() {
    let (mut engine, _) = engine(SchedulingPolicy::BooleanOutcome);
    assert!(engine.add_item(&"ex-1".into()).unwrap());

    let state = engine.state("ex-1").unwrap();
    assert_eq!(state, ReviewState::new(t0()));
    assert_eq!(engine.due_items(t0()).unwrap(), vec!["ex-1"]);
  }

  #[test]
  fn test_add_item_is_idempotent() {
    let (mut engine, clock) = engine(SchedulingPolicy::BooleanOutcome);
    engine.add_item(&"ex-1".into()).unwrap();
    engine.submit_answer("ex-1", true).unwrap();
    engine.submit_answer("ex-1", true).unwrap();
    let progressed = engine.state("ex-1").unwrap();

    clock.advance(Duration::days(2));
    assert!(!engine.add_item(&"ex-1".into()).unwrap());
    assert!(!engine.add_item(&ReviewableItem::with_content("ex-1", serde_json::json!({"q": "?"}))).unwrap());

    assert_eq!(engine.state("ex-1").unwrap(), progressed);
  }

  #[test]
  fn test_add_items_counts_new() {
    let (mut engine, _) = engine(SchedulingPolicy::GradedOutcome);
    engine.add_item(&"a".into()).unwrap();
    let items: Vec<ReviewableItem> = ["a", "b", "c"].into_iter().map(ReviewableItem::from).collect();
    assert_eq!(engine.add_items(&items).unwrap(), 2);
    assert_eq!(engine.all_items().unwrap().len(), 3);
  }

  #[test]
  fn test_submit_review_unknown_item() {
    let (mut engine, _) = engine(SchedulingPolicy::GradedOutcome);
    let err = engine.submit_review("ghost", Grade::Easy).unwrap_err();
    assert!(matches!(err, SchedulerError::NotFound(id) if id == "ghost"));
  }

  #[test]
  fn test_boolean_catalog_progression() {
    let (mut engine, clock) = engine(SchedulingPolicy::BooleanOutcome);
    engine.add_item(&"ex-1".into()).unwrap();

    let mut intervals = Vec::new();
    for _ in 0..3 {
      let next = engine.submit_answer("ex-1", true).unwrap();
      assert!(next.next_review_at > clock.now());
      assert!((next.ease_factor - 2.5).abs() < 1e-9);
      intervals.push(next.interval);
      clock.set(next.next_review_at);
    }
    assert_eq!(intervals, vec![1, 6, 15]);

    let failed = engine.submit_answer("ex-1", false).unwrap();
    assert_eq!(failed.interval, 1);
    assert_eq!(failed.consecutive_correct, 0);
    assert!((failed.ease_factor - 2.3).abs() < 1e-9);
  }

  #[test]
  fn test_graded_catalog_review_is_persisted() {
    let (mut engine, _) = engine(SchedulingPolicy::GradedOutcome);
    engine.add_item(&"fc-1".into()).unwrap();

    let next = engine.submit_review("fc-1", Grade::Easy).unwrap();
    // ceil(1 * 2.5 * 1.3) = 4
    assert_eq!(next.interval, 4);
    assert_eq!(next.next_review_at, t0() + Duration::days(4));
    assert_eq!(engine.state("fc-1").unwrap(), next);
    assert!(engine.due_items(t0()).unwrap().is_empty());
    assert_eq!(engine.due_items(t0() + Duration::days(4)).unwrap(), vec!["fc-1"]);
  }

  #[test]
  fn test_due_items_scenario() {
    let (mut engine, clock) = engine(SchedulingPolicy::GradedOutcome);
    let now = t0();

    // Registered at now - 1 day, now, and reviewed once to land at now + 1 day
    clock.set(now - Duration::days(1));
    engine.add_item(&"overdue".into()).unwrap();
    clock.set(now);
    engine.add_item(&"due-now".into()).unwrap();
    engine.add_item(&"later".into()).unwrap();
    let mut later = engine.state("later").unwrap();
    later.next_review_at = now + Duration::days(1);
    engine.store.put("later", &later).unwrap();

    assert_eq!(engine.due_items(now).unwrap(), vec!["overdue", "due-now"]);
    assert_eq!(
      engine
        .due_items_among(&["overdue", "due-now", "later", "unregistered"], now)
        .unwrap(),
      vec!["overdue", "due-now", "unregistered"]
    );
  }

  #[test]
  fn test_failed_write_leaves_state_unchanged() {
    let clock = Arc::new(FixedClock::new(t0()));
    let store = FlakyStore {
      inner: MemoryStore::new(),
      fail_writes: false,
    };
    let mut engine = Engine::with_clock("flaky", SchedulingPolicy::BooleanOutcome, store, Arc::clone(&clock));
    engine.add_item(&"ex-1".into()).unwrap();
    let before = engine.state("ex-1").unwrap();

    engine.store.fail_writes = true;
    let err = engine.submit_answer("ex-1", true).unwrap_err();
    assert!(matches!(err, SchedulerError::StorageFailure(_)));

    assert_eq!(engine.state("ex-1").unwrap(), before);
    assert_eq!(engine.due_items(t0()).unwrap(), vec!["ex-1"]);
  }

  #[test]
  fn test_corrupted_state_is_reported() {
    let (mut engine, _) = engine(SchedulingPolicy::BooleanOutcome);
    let mut broken = ReviewState::new(t0());
    broken.interval = 0;
    engine.store.put("broken", &broken).unwrap();

    let err = engine.submit_answer("broken", true).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidState { .. }));
    // Not clamped behind the caller's back
    assert_eq!(engine.state("broken").unwrap().interval, 0);
  }

  #[test]
  fn test_remove_item() {
    let (mut engine, _) = engine(SchedulingPolicy::GradedOutcome);
    engine.add_item(&"fc-1".into()).unwrap();
    engine.remove_item("fc-1").unwrap();

    assert!(matches!(engine.state("fc-1"), Err(SchedulerError::NotFound(_))));
    assert!(matches!(engine.remove_item("fc-1"), Err(SchedulerError::NotFound(_))));
    // Registering again starts from scratch
    assert!(engine.add_item(&"fc-1".into()).unwrap());
  }

  #[test]
  fn test_stats() {
    let (mut engine, _) = engine(SchedulingPolicy::GradedOutcome);
    engine.add_item(&"a".into()).unwrap();
    engine.add_item(&"b".into()).unwrap();
    engine.submit_review("b", Grade::Hard).unwrap();

    let stats = engine.stats(t0()).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.due, 1);
    assert_eq!(stats.never_reviewed, 1);
    assert!((stats.average_ease - 2.45).abs() < 1e-9);
  }

  #[test]
  fn test_sqlite_backed_engine_survives_restart() {
    let env = TestEnv::new().unwrap();
    let clock = Arc::new(FixedClock::new(t0()));
    {
      let store = SqliteStore::new(env.pool.clone(), "flashcards");
      let mut engine = Engine::with_clock("flashcards", SchedulingPolicy::GradedOutcome, store, Arc::clone(&clock));
      engine.add_item(&"fc-1".into()).unwrap();
      engine.submit_review("fc-1", Grade::Medium).unwrap();
    }

    let store = SqliteStore::new(env.pool.clone(), "flashcards");
    let engine = Engine::with_clock("flashcards", SchedulingPolicy::GradedOutcome, store, clock);
    let state = engine.state("fc-1").unwrap();
    assert_eq!(state.interval, 3);
    assert!((state.ease_factor - 2.4).abs() < 1e-9);
    assert_eq!(state.last_reviewed_at, Some(t0()));
  }
}
