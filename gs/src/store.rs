//! SQLite-backed store for goals, intentions and day reviews

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{DayReview, Goal, GoalFilter, GoalId, Intention, IntentionId, NewGoal};

/// File name used when the store is opened on a directory
pub const DB_FILENAME: &str = "goalie.db";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Current time as unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The goalie database
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open or create the database at `path`
    ///
    /// When `path` is an existing directory the database file is created inside it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db_path = if path.is_dir() {
            path.join(DB_FILENAME)
        } else {
            path.to_path_buf()
        };
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        debug!(db_path = %db_path.display(), "Store::open: called");

        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self { conn, path: db_path };
        store.create_tables()?;
        info!(path = %store.path.display(), "Opened goal store");
        Ok(store)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("Store::open_in_memory: called");
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        store.create_tables()?;
        Ok(store)
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn create_tables(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS goals (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                number      INTEGER NOT NULL,
                color       TEXT NOT NULL DEFAULT '',
                archived    INTEGER NOT NULL DEFAULT 0,
                created_at  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS intentions (
                id          INTEGER PRIMARY KEY,
                content     TEXT NOT NULL,
                day         TEXT NOT NULL,
                done        INTEGER NOT NULL DEFAULT 0,
                cancelled   INTEGER NOT NULL DEFAULT 0,
                outcome     INTEGER NOT NULL DEFAULT 0,
                unintended  INTEGER NOT NULL DEFAULT 0,
                position    INTEGER NOT NULL DEFAULT 0,
                pomos       INTEGER NOT NULL DEFAULT 0,
                created_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_intentions_day ON intentions(day, position);

            CREATE TABLE IF NOT EXISTS intention_goals (
                intention_id INTEGER NOT NULL REFERENCES intentions(id) ON DELETE CASCADE,
                ordinal      INTEGER NOT NULL,
                goal_id      INTEGER NOT NULL REFERENCES goals(id) ON DELETE CASCADE,
                PRIMARY KEY (intention_id, ordinal)
            );

            CREATE TABLE IF NOT EXISTS day_reviews (
                date        TEXT NOT NULL,
                goal_key    INTEGER NOT NULL,
                goal_id     INTEGER,
                enough      INTEGER NOT NULL DEFAULT 0,
                reflection  TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (date, goal_key)
            );",
        )?;
        Ok(())
    }

    // =========================================================================
    // Goals
    // =========================================================================

    /// Goals matching `filter`, ordered by display number
    pub fn get_goals(&self, filter: GoalFilter) -> Result<Vec<Goal>, StoreError> {
        debug!(?filter, "Store::get_goals: called");
        let sql = match filter {
            GoalFilter::Active => "SELECT * FROM goals WHERE archived = 0 ORDER BY number, id",
            GoalFilter::Archived => "SELECT * FROM goals WHERE archived = 1 ORDER BY number, id",
            GoalFilter::All => "SELECT * FROM goals ORDER BY number, id",
        };
        let mut stmt = self.conn.prepare(sql)?;
        let goals = stmt
            .query_map([], row_to_goal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Create a goal numbered one past the current highest number
    pub fn insert_goal(&mut self, new: NewGoal) -> Result<Goal, StoreError> {
        debug!(name = %new.name, "Store::insert_goal: called");
        let number: i64 = self
            .conn
            .query_row("SELECT COALESCE(MAX(number), 0) + 1 FROM goals", [], |row| row.get(0))?;
        let created_at = now_ms();
        self.conn.execute(
            "INSERT INTO goals (name, description, number, color, archived, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)",
            params![new.name, new.description, number, new.color, created_at],
        )?;
        let id = GoalId(self.conn.last_insert_rowid());
        info!(%id, number, "Inserted goal");
        Ok(Goal {
            id,
            name: new.name,
            description: new.description,
            number,
            color: new.color,
            archived: false,
            created_at,
        })
    }

    /// Insert or overwrite goals by id
    pub fn upsert_goals(&mut self, goals: &[Goal]) -> Result<(), StoreError> {
        debug!(count = goals.len(), "Store::upsert_goals: called");
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO goals (id, name, description, number, color, archived, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    number = excluded.number,
                    color = excluded.color,
                    archived = excluded.archived",
            )?;
            for goal in goals {
                stmt.execute(params![
                    goal.id.0,
                    goal.name,
                    goal.description,
                    goal.number,
                    goal.color,
                    goal.archived,
                    goal.created_at
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete goals; their intention associations go with them
    pub fn delete_goals(&mut self, goals: &[Goal]) -> Result<usize, StoreError> {
        debug!(count = goals.len(), "Store::delete_goals: called");
        let tx = self.conn.transaction()?;
        let mut deleted = 0;
        for goal in goals {
            deleted += tx.execute("DELETE FROM goals WHERE id = ?1", params![goal.id.0])?;
        }
        tx.commit()?;
        info!(deleted, "Deleted goals");
        Ok(deleted)
    }

    // =========================================================================
    // Intentions
    // =========================================================================

    /// Intentions whose day lies in `[start, end)`, ordered by day then position
    pub fn get_intentions_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Intention>, StoreError> {
        debug!(%start, %end, "Store::get_intentions_between: called");
        let mut stmt = self.conn.prepare(
            "SELECT * FROM intentions WHERE day >= ?1 AND day < ?2 ORDER BY day, position, id",
        )?;
        let mut intentions = stmt
            .query_map(params![fmt_date(start), fmt_date(end)], row_to_intention)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut goal_stmt = self
            .conn
            .prepare("SELECT goal_id FROM intention_goals WHERE intention_id = ?1 ORDER BY ordinal")?;
        for intention in &mut intentions {
            if let Some(id) = intention.id {
                intention.goals = goal_stmt
                    .query_map(params![id.0], |row| row.get(0).map(GoalId))?
                    .collect::<Result<Vec<_>, _>>()?;
            }
        }
        Ok(intentions)
    }

    /// Intentions belonging to a single day
    pub fn get_intentions_for_day(&self, day: NaiveDate) -> Result<Vec<Intention>, StoreError> {
        let end = day.succ_opt().unwrap_or(day);
        self.get_intentions_between(day, end)
    }

    /// Insert new intentions and overwrite existing ones, returning them with ids assigned
    ///
    /// Goal associations are rewritten wholesale for every intention.
    pub fn upsert_intentions(&mut self, intentions: &[Intention]) -> Result<Vec<Intention>, StoreError> {
        debug!(count = intentions.len(), "Store::upsert_intentions: called");
        let tx = self.conn.transaction()?;
        let mut saved = Vec::with_capacity(intentions.len());
        {
            let mut upsert = tx.prepare(
                "INSERT INTO intentions
                    (id, content, day, done, cancelled, outcome, unintended, position, pomos, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                    content = excluded.content,
                    day = excluded.day,
                    done = excluded.done,
                    cancelled = excluded.cancelled,
                    outcome = excluded.outcome,
                    unintended = excluded.unintended,
                    position = excluded.position,
                    pomos = excluded.pomos",
            )?;
            let mut clear_goals = tx.prepare("DELETE FROM intention_goals WHERE intention_id = ?1")?;
            let mut add_goal =
                tx.prepare("INSERT INTO intention_goals (intention_id, ordinal, goal_id) VALUES (?1, ?2, ?3)")?;

            for intention in intentions {
                upsert.execute(params![
                    intention.id.map(|id| id.0),
                    intention.content,
                    fmt_date(intention.day),
                    intention.done,
                    intention.cancelled,
                    intention.outcome,
                    intention.unintended,
                    intention.position,
                    intention.pomos,
                    intention.created_at
                ])?;
                let id = intention.id.unwrap_or(IntentionId(tx.last_insert_rowid()));

                clear_goals.execute(params![id.0])?;
                for (ordinal, goal) in intention.goals.iter().enumerate() {
                    add_goal.execute(params![id.0, ordinal as i64, goal.0])?;
                }

                let mut stored = intention.clone();
                stored.id = Some(id);
                saved.push(stored);
            }
        }
        tx.commit()?;
        debug!(count = saved.len(), "Store::upsert_intentions: committed");
        Ok(saved)
    }

    // =========================================================================
    // Day reviews
    // =========================================================================

    /// Insert day reviews, overwriting any existing row for the same date and goal
    pub fn upsert_day_reviews(&mut self, reviews: &[DayReview]) -> Result<(), StoreError> {
        debug!(count = reviews.len(), "Store::upsert_day_reviews: called");
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO day_reviews (date, goal_key, goal_id, enough, reflection)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(date, goal_key) DO UPDATE SET
                    goal_id = excluded.goal_id,
                    enough = excluded.enough,
                    reflection = excluded.reflection",
            )?;
            for review in reviews {
                let goal_id = review.goal.map(|g| g.0);
                stmt.execute(params![
                    fmt_date(review.date),
                    goal_id.unwrap_or(0),
                    goal_id,
                    review.enough,
                    review.reflection
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Reviews recorded for `date`; goal reviews first by goal id, misc last
    pub fn get_day_reviews(&self, date: NaiveDate) -> Result<Vec<DayReview>, StoreError> {
        debug!(%date, "Store::get_day_reviews: called");
        let mut stmt = self.conn.prepare(
            "SELECT date, goal_id, enough, reflection FROM day_reviews
             WHERE date = ?1 ORDER BY goal_key = 0, goal_key",
        )?;
        let reviews = stmt
            .query_map(params![fmt_date(date)], |row| {
                Ok(DayReview {
                    date: parse_date(row, 0)?,
                    goal: row.get::<_, Option<i64>>(1)?.map(GoalId),
                    enough: row.get(2)?,
                    reflection: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reviews)
    }
}

fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_goal(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: GoalId(row.get("id")?),
        name: row.get("name")?,
        description: row.get("description")?,
        number: row.get("number")?,
        color: row.get("color")?,
        archived: row.get("archived")?,
        created_at: row.get("created_at")?,
    })
}

fn row_to_intention(row: &Row<'_>) -> rusqlite::Result<Intention> {
    // column order follows the CREATE TABLE above
    const DAY_COLUMN: usize = 2;
    Ok(Intention {
        id: Some(IntentionId(row.get("id")?)),
        content: row.get("content")?,
        day: parse_date(row, DAY_COLUMN)?,
        done: row.get("done")?,
        cancelled: row.get("cancelled")?,
        outcome: row.get("outcome")?,
        unintended: row.get("unintended")?,
        position: row.get("position")?,
        pomos: row.get("pomos")?,
        created_at: row.get("created_at")?,
        goals: Vec::new(),
    })
}
