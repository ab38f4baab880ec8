//! Todo Storage
//! Mission: Store tasks in SQLite, every access scoped to the owning user

use crate::todos::models::Todo;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

/// Todo storage with SQLite backend.
///
/// Every read and mutation filters on `user_id`; ownership checks live in
/// the SQL, not in the handlers.
///
/// Shares the server's database file with `UserStore`, which owns the
/// `users` table. SQLite will not prepare statements against `todos` until
/// that FK parent exists, so `UserStore` must be initialized first.
pub struct TodoStore {
    db_path: String,
}

impl TodoStore {
    /// Create a new todo store and initialize database
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                complete INTEGER NOT NULL DEFAULT 0,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )?;

        Ok(())
    }

    /// List all todos owned by one user
    pub fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, text, complete, user_id FROM todos WHERE user_id = ?1 ORDER BY id",
        )?;

        let todos = stmt
            .query_map(params![user_id], Self::row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    /// Get one todo by id, only if owned by the given user
    pub fn get(&self, id: i64, user_id: i64) -> Result<Option<Todo>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, text, complete, user_id FROM todos WHERE id = ?1 AND user_id = ?2",
        )?;

        let todo = stmt
            .query_row(params![id, user_id], Self::row_to_todo)
            .optional()?;

        Ok(todo)
    }

    /// Create a new todo under the given owner
    pub fn create(&self, text: &str, complete: bool, user_id: i64) -> Result<Todo> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "INSERT INTO todos (text, complete, user_id) VALUES (?1, ?2, ?3)",
            params![text, complete, user_id],
        )
        .context("Failed to insert todo")?;

        let id = conn.last_insert_rowid();

        info!("✅ Created todo {} for user {}", id, user_id);

        Ok(Todo {
            id,
            text: text.to_string(),
            complete,
            user_id,
        })
    }

    /// Update a todo's text and completion flag, only if owned by the given
    /// user. Returns None when no owned row matched.
    pub fn update(
        &self,
        id: i64,
        user_id: i64,
        text: &str,
        complete: bool,
    ) -> Result<Option<Todo>> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn
            .execute(
                "UPDATE todos SET text = ?1, complete = ?2 WHERE id = ?3 AND user_id = ?4",
                params![text, complete, id, user_id],
            )
            .context("Failed to update todo")?;

        if rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(Todo {
            id,
            text: text.to_string(),
            complete,
            user_id,
        }))
    }

    /// Delete a todo, only if owned by the given user. Returns false when no
    /// owned row matched.
    pub fn delete(&self, id: i64, user_id: i64) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "DELETE FROM todos WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;

        if rows_affected > 0 {
            info!("🗑️  Deleted todo {} for user {}", id, user_id);
        }

        Ok(rows_affected > 0)
    }

    fn row_to_todo(row: &rusqlite::Row<'_>) -> rusqlite::Result<Todo> {
        Ok(Todo {
            id: row.get(0)?,
            text: row.get(1)?,
            complete: row.get(2)?,
            user_id: row.get(3)?,
        })
    }
}
