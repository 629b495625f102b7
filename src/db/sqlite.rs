//! SQLite-backed review store.
//!
//! All catalogs share one database; rows are keyed by `(catalog, item_id)`.
//! Each mutation is a single autocommitted statement, so it is on disk before
//! the call returns and a failed write changes nothing.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::{try_lock, DbPool, ReviewStore};
use crate::domain::ReviewState;
use crate::error::{Result, SchedulerError};

pub struct SqliteStore {
    pool: DbPool,
    catalog: String,
}

/// Raw column values as read from `review_states`
struct StateRow {
    item_id: String,
    interval_days: i64,
    ease_factor: f64,
    consecutive_correct: i64,
    next_review: String,
    last_reviewed: Option<String>,
}

impl SqliteStore {
    pub fn new(pool: DbPool, catalog: impl Into<String>) -> Self {
        Self {
            pool,
            catalog: catalog.into(),
        }
    }
}

fn row_to_state_row(row: &rusqlite::Row) -> rusqlite::Result<StateRow> {
    Ok(StateRow {
        item_id: row.get(0)?,
        interval_days: row.get(1)?,
        ease_factor: row.get(2)?,
        consecutive_correct: row.get(3)?,
        next_review: row.get(4)?,
        last_reviewed: row.get(5)?,
    })
}

fn parse_timestamp(item_id: &str, column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SchedulerError::invalid_state(item_id, format!("bad {} '{}': {}", column, value, e)))
}

impl StateRow {
    fn into_state(self) -> Result<(String, ReviewState)> {
        let next_review_at = parse_timestamp(&self.item_id, "next_review", &self.next_review)?;
        let last_reviewed_at = self
            .last_reviewed
            .as_deref()
            .map(|value| parse_timestamp(&self.item_id, "last_reviewed", value))
            .transpose()?;
        let consecutive_correct = u32::try_from(self.consecutive_correct).map_err(|_| {
            SchedulerError::invalid_state(
                &self.item_id,
                format!("bad consecutive_correct {}", self.consecutive_correct),
            )
        })?;

        let state = ReviewState {
            interval: self.interval_days,
            ease_factor: self.ease_factor,
            consecutive_correct,
            next_review_at,
            last_reviewed_at,
        };
        Ok((self.item_id, state))
    }
}

impl ReviewStore for SqliteStore {
    fn get(&self, id: &str) -> Result<Option<ReviewState>> {
        let conn = try_lock(&self.pool)?;
        let row = conn
            .query_row(
                r#"
        SELECT item_id, interval_days, ease_factor, consecutive_correct, next_review, last_reviewed
        FROM review_states WHERE catalog = ?1 AND item_id = ?2
        "#,
                params![self.catalog, id],
                row_to_state_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(row.into_state()?.1)),
            None => Ok(None),
        }
    }

    fn put(&mut self, id: &str, state: &ReviewState) -> Result<()> {
        let conn = try_lock(&self.pool)?;
        conn.execute(
            r#"
      INSERT INTO review_states (catalog, item_id, interval_days, ease_factor, consecutive_correct,
                                 next_review, last_reviewed)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      ON CONFLICT(catalog, item_id) DO UPDATE SET
        interval_days = excluded.interval_days,
        ease_factor = excluded.ease_factor,
        consecutive_correct = excluded.consecutive_correct,
        next_review = excluded.next_review,
        last_reviewed = excluded.last_reviewed
      "#,
            params![
                self.catalog,
                id,
                state.interval,
                state.ease_factor,
                state.consecutive_correct,
                state.next_review_at.to_rfc3339(),
                state.last_reviewed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn all(&self) -> Result<Vec<(String, ReviewState)>> {
        let conn = try_lock(&self.pool)?;
        let mut stmt = conn.prepare(
            r#"
      SELECT item_id, interval_days, ease_factor, consecutive_correct, next_review, last_reviewed
      FROM review_states WHERE catalog = ?1
      "#,
        )?;

        let rows = stmt
            .query_map(params![self.catalog], row_to_state_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(StateRow::into_state).collect()
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let conn = try_lock(&self.pool)?;
        let deleted = conn.execute(
            "DELETE FROM review_states WHERE catalog = ?1 AND item_id = ?2",
            params![self.catalog, id],
        )?;
        if deleted == 0 {
            return Err(SchedulerError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::testing::TestEnv;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 18, 45, 12).unwrap()
    }

    fn reviewed_state() -> ReviewState {
        ReviewState {
            interval: 6,
            ease_factor: 1.7999999999999998,
            consecutive_correct: 2,
            next_review_at: t0() + Duration::days(6),
            last_reviewed_at: Some(t0()),
        }
    }

    #[test]
    fn test_put_get_roundtrip() {
        let env = TestEnv::new().unwrap();
        let mut store = SqliteStore::new(env.pool.clone(), "exercises");

        assert!(store.get("ex-1").unwrap().is_none());
        store.put("ex-1", &reviewed_state()).unwrap();
        assert_eq!(store.get("ex-1").unwrap(), Some(reviewed_state()));
    }

    #[test]
    fn test_put_is_upsert() {
        let env = TestEnv::new().unwrap();
        let mut store = SqliteStore::new(env.pool.clone(), "exercises");

        store.put("ex-1", &ReviewState::new(t0())).unwrap();
        store.put("ex-1", &reviewed_state()).unwrap();
        store.put("ex-1", &reviewed_state()).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1, reviewed_state());
    }

    #[test]
    fn test_catalogs_are_isolated() {
        let env = TestEnv::new().unwrap();
        let mut exercises = SqliteStore::new(env.pool.clone(), "exercises");
        let mut flashcards = SqliteStore::new(env.pool.clone(), "flashcards");

        exercises.put("shared-id", &reviewed_state()).unwrap();
        flashcards.put("shared-id", &ReviewState::new(t0())).unwrap();

        assert_eq!(exercises.get("shared-id").unwrap(), Some(reviewed_state()));
        assert_eq!(flashcards.get("shared-id").unwrap(), Some(ReviewState::new(t0())));

        flashcards.delete("shared-id").unwrap();
        assert!(exercises.get("shared-id").unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let env = TestEnv::new().unwrap();
        let mut store = SqliteStore::new(env.pool.clone(), "exercises");
        let err = store.delete("nope").unwrap_err();
        assert!(matches!(err, SchedulerError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_survives_reopen() {
        let env = TestEnv::new().unwrap();
        let path = env.path().join("reopen.db");
        {
            let pool = init_db(&path).unwrap();
            let mut store = SqliteStore::new(pool, "flashcards");
            store.put("fc-1", &reviewed_state()).unwrap();
        }

        let pool = init_db(&path).unwrap();
        let store = SqliteStore::new(pool, "flashcards");
        assert_eq!(store.get("fc-1").unwrap(), Some(reviewed_state()));
        // Reopening an existing database leaves a backup next to it
        assert!(path.with_extension("db.backup").exists());
    }

    #[test]
    fn test_corrupt_timestamp_is_invalid_state() {
        let env = TestEnv::new().unwrap();
        {
            let conn = env.pool.lock().unwrap();
            conn.execute(
                "INSERT INTO review_states (catalog, item_id, interval_days, ease_factor, next_review)
                 VALUES ('exercises', 'bad', 1, 2.5, 'yesterday-ish')",
                [],
            )
            .unwrap();
        }
        let store = SqliteStore::new(env.pool.clone(), "exercises");
        let err = store.get("bad").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidState { .. }));
    }

    #[test]
    fn test_negative_streak_is_invalid_state() {
        let env = TestEnv::new().unwrap();
        {
            let conn = env.pool.lock().unwrap();
            conn.execute(
                "INSERT INTO review_states
                 (catalog, item_id, interval_days, ease_factor, consecutive_correct, next_review)
                 VALUES ('exercises', 'neg', 1, 2.5, -1, '2024-02-10T18:45:12Z')",
                [],
            )
            .unwrap();
        }
        let store = SqliteStore::new(env.pool.clone(), "exercises");
        let err = store.get("neg").unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidState { ref id, .. } if id == "neg"));
        assert!(matches!(store.all(), Err(SchedulerError::InvalidState { .. })));
    }
}
