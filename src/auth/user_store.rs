//! User Storage
//! Mission: Securely store and manage user accounts with SQLite

use crate::auth::models::User;
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};
use uuid::Uuid;

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize database
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
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                public_id TEXT UNIQUE NOT NULL,
                name TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                admin INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        // Create default admin user if none exists
        self.create_default_admin(&conn)?;

        Ok(())
    }

    /// Create default admin user for initial setup.
    ///
    /// Self-registration deliberately never grants admin, so a fresh database
    /// needs one seeded administrator to make the admin endpoints reachable.
    fn create_default_admin(&self, conn: &Connection) -> Result<()> {
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE admin = 1", [], |row| {
                row.get(0)
            })
            .context("Failed to check for admin users")?;

        if count == 0 {
            let password_hash =
                hash("admin123", DEFAULT_COST).context("Failed to hash password")?;

            conn.execute(
                "INSERT INTO users (public_id, name, password_hash, admin)
                 VALUES (?1, ?2, ?3, 1)",
                params![Uuid::new_v4().to_string(), "admin", password_hash],
            )
            .context("Failed to insert admin user")?;

            info!("🔐 Default admin user created (username: admin, password: admin123)");
            warn!("⚠️  CHANGE DEFAULT PASSWORD IN PRODUCTION!");
        }

        Ok(())
    }

    /// Get user by login name
    pub fn get_by_name(&self, name: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, public_id, name, password_hash, admin
             FROM users WHERE name = ?1",
        )?;

        let user = stmt
            .query_row(params![name], Self::row_to_user)
            .optional()?;

        Ok(user)
    }

    /// Get user by externally visible public id
    pub fn get_by_public_id(&self, public_id: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt = conn.prepare(
            "SELECT id, public_id, name, password_hash, admin
             FROM users WHERE public_id = ?1",
        )?;

        let user = stmt
            .query_row(params![public_id], Self::row_to_user)
            .optional()?;

        Ok(user)
    }

    /// Verify login name and password
    pub fn verify_password(&self, name: &str, password: &str) -> Result<bool> {
        match self.get_by_name(name)? {
            Some(user) => {
                let valid =
                    verify(password, &user.password_hash).context("Failed to verify password")?;
                Ok(valid)
            }
            None => Ok(false),
        }
    }

    /// Create a new user with a freshly generated public id
    pub fn create_user(&self, name: &str, password: &str, admin: bool) -> Result<User> {
        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;
        let public_id = Uuid::new_v4().to_string();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (public_id, name, password_hash, admin)
             VALUES (?1, ?2, ?3, ?4)",
            params![public_id, name, password_hash, admin],
        )
        .context("Failed to insert user")?;

        let id = conn.last_insert_rowid();

        info!("✅ Created user: {} (admin: {})", name, admin);

        Ok(User {
            id,
            public_id,
            name: name.to_string(),
            password_hash,
            admin,
        })
    }

    /// List all users (admin only)
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = Connection::open(&self.db_path)?;

        let mut stmt =
            conn.prepare("SELECT id, public_id, name, password_hash, admin FROM users")?;

        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Update a user's name and admin flag. Returns None when no row matched.
    pub fn update_user(&self, public_id: &str, name: &str, admin: bool) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn
            .execute(
                "UPDATE users SET name = ?1, admin = ?2 WHERE public_id = ?3",
                params![name, admin, public_id],
            )
            .context("Failed to update user")?;

        if rows_affected == 0 {
            return Ok(None);
        }

        self.get_by_public_id(public_id)
    }

    /// Delete a user by public id. Returns false when no row matched.
    pub fn delete_user(&self, public_id: &str) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;

        let rows_affected = conn.execute(
            "DELETE FROM users WHERE public_id = ?1",
            params![public_id],
        )?;

        if rows_affected > 0 {
            info!("🗑️  Deleted user: {}", public_id);
        }

        Ok(rows_affected > 0)
    }

    /// Whether an error from this store is a SQLite unique-constraint
    /// violation (duplicate name or public id).
    pub fn is_unique_violation(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<rusqlite::Error>(),
            Some(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }

    fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            public_id: row.get(1)?,
            name: row.get(2)?,
            password_hash: row.get(3)?,
            admin: row.get(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_default_admin_created() {
        let (store, _temp) = create_test_store();

        let admin = store.get_by_name("admin").unwrap();
        assert!(admin.is_some());

        let admin = admin.unwrap();
        assert_eq!(admin.name, "admin");
        assert!(admin.admin);
        assert!(!admin.public_id.is_empty());
    }

    #[test]
    fn test_password_verification() {
        let (store, _temp) = create_test_store();

        // Correct password
        assert!(store.verify_password("admin", "admin123").unwrap());

        // Incorrect password
        assert!(!store.verify_password("admin", "wrongpassword").unwrap());

        // Non-existent user
        assert!(!store.verify_password("nonexistent", "password").unwrap());
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let created = store.create_user("alice", "password123", false).unwrap();
        assert_eq!(created.name, "alice");
        assert!(!created.admin);
        assert!(created.id > 0);

        let by_name = store.get_by_name("alice").unwrap().unwrap();
        assert_eq!(by_name.public_id, created.public_id);

        let by_public_id = store.get_by_public_id(&created.public_id).unwrap().unwrap();
        assert_eq!(by_public_id.id, created.id);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (store, _temp) = create_test_store();

        store.create_user("alice", "pass", false).unwrap();
        let result = store.create_user("alice", "otherpass", false);
        assert!(result.is_err());
        assert!(UserStore::is_unique_violation(&result.unwrap_err()));
    }

    #[test]
    fn test_unique_violation_detection() {
        let (store, _temp) = create_test_store();

        store.create_user("alice", "pass", false).unwrap();
        store.create_user("bob", "pass", false).unwrap();

        // Renaming bob onto alice's name trips the UNIQUE constraint
        let bob = store.get_by_name("bob").unwrap().unwrap();
        let err = store
            .update_user(&bob.public_id, "alice", false)
            .unwrap_err();
        assert!(UserStore::is_unique_violation(&err));

        // A non-constraint failure is not a unique violation
        let other = anyhow::anyhow!("connection lost");
        assert!(!UserStore::is_unique_violation(&other));
    }

    #[test]
    fn test_list_users() {
        let (store, _temp) = create_test_store();

        store.create_user("alice", "pass", false).unwrap();
        store.create_user("bob", "pass", false).unwrap();

        let users = store.list_users().unwrap();
        assert_eq!(users.len(), 3); // admin + alice + bob
    }

    #[test]
    fn test_update_user() {
        let (store, _temp) = create_test_store();

        let user = store.create_user("alice", "pass", false).unwrap();

        let updated = store
            .update_user(&user.public_id, "alice2", true)
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "alice2");
        assert!(updated.admin);

        // Unknown public id matches nothing
        let missing = store.update_user("no-such-id", "x", false).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_delete_user() {
        let (store, _temp) = create_test_store();

        let user = store.create_user("tempuser", "pass", false).unwrap();
        assert!(store.get_by_name("tempuser").unwrap().is_some());

        assert!(store.delete_user(&user.public_id).unwrap());
        assert!(store.get_by_name("tempuser").unwrap().is_none());

        // Second delete matches nothing
        assert!(!store.delete_user(&user.public_id).unwrap());
    }
}
