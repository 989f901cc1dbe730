//! SQLite-based routine storage.
//!
//! Provides persistent storage for:
//! - Routines and their ordered tasks
//! - Key-value store for application state (run snapshots)

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::routine::{Routine, RoutineId};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSummary {
    pub id: RoutineId,
    pub name: String,
    pub goal_time: Option<u32>,
    pub task_count: usize,
}

/// SQLite database for routines.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/ritual/ritual.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("ritual.db"))
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS routines (
                id          INTEGER PRIMARY KEY,
                name        TEXT NOT NULL,
                goal_time   INTEGER
            );

            CREATE TABLE IF NOT EXISTS tasks (
                routine_id      INTEGER NOT NULL,
                id              INTEGER NOT NULL,
                position        INTEGER NOT NULL,
                name            TEXT NOT NULL,
                checked_off     INTEGER NOT NULL DEFAULT 0,
                completed       INTEGER NOT NULL DEFAULT 0,
                skipped         INTEGER NOT NULL DEFAULT 0,
                duration        INTEGER NOT NULL DEFAULT 0,
                elapsed_seconds INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (routine_id, id)
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_routine_position ON tasks(routine_id, position);",
        )?;
        Ok(())
    }

    // ── Routines ─────────────────────────────────────────────────────

    /// Insert or replace a routine and its full task list.
    ///
    /// # Errors
    /// Returns an error if any statement fails; nothing is written then.
    pub fn save_routine(&self, routine: &Routine) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO routines (id, name, goal_time) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, goal_time = excluded.goal_time",
            params![routine.id(), routine.name(), routine.goal_time()],
        )?;
        tx.execute("DELETE FROM tasks WHERE routine_id = ?1", params![routine.id()])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (routine_id, id, position, name, checked_off, completed,
                                    skipped, duration, elapsed_seconds)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, task) in routine.tasks().iter().enumerate() {
                stmt.execute(params![
                    routine.id(),
                    task.id(),
                    position as i64,
                    task.name(),
                    task.is_checked_off(),
                    task.is_completed(),
                    task.is_skipped(),
                    task.duration(),
                    task.elapsed_seconds(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Load a routine with its tasks in order. Run state is not part of the
    /// routine row; see [`super::RunState`].
    pub fn load_routine(&self, id: RoutineId) -> Result<Option<Routine>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, goal_time FROM routines WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<u32>>(1)?)),
            )
            .optional()?;
        let Some((name, goal_time)) = row else {
            return Ok(None);
        };

        let mut routine = Routine::new(id, name);
        routine.update_goal_time(goal_time);

        let mut stmt = self.conn.prepare(
            "SELECT id, name, checked_off, completed, skipped, duration, elapsed_seconds
             FROM tasks WHERE routine_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            let mut task = Task::new(row.get(0)?, row.get::<_, String>(1)?);
            task.restore_state(row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?);
            task.set_checked_off(row.get(2)?);
            Ok(task)
        })?;
        for task in rows {
            routine.add_task(task?)?;
        }
        Ok(Some(routine))
    }

    pub fn list_routines(&self) -> Result<Vec<RoutineSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.id, r.name, r.goal_time, COUNT(t.id)
             FROM routines r LEFT JOIN tasks t ON t.routine_id = r.id
             GROUP BY r.id ORDER BY r.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(RoutineSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                goal_time: row.get(2)?,
                task_count: row.get::<_, i64>(3)? as usize,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Delete a routine and its tasks. Returns whether it existed.
    pub fn delete_routine(&self, id: RoutineId) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE routine_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM routines WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    pub fn next_routine_id(&self) -> Result<RoutineId> {
        let max: u32 = self
            .conn
            .query_row("SELECT COALESCE(MAX(id), 0) FROM routines", [], |row| row.get(0))?;
        Ok(max + 1)
    }

    // ── Key-value ────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}
