use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS review_states (
      catalog TEXT NOT NULL,
      item_id TEXT NOT NULL,
      interval_days INTEGER NOT NULL DEFAULT 1,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      consecutive_correct INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL,
      last_reviewed TEXT,
      PRIMARY KEY (catalog, item_id)
    );

    CREATE INDEX IF NOT EXISTS idx_review_states_next_review ON review_states(catalog, next_review);
    "#,
  )?;

  Ok(())
}
