use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// An in-memory store, for tests and embedding.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_role(s: &str) -> Role {
    Role::parse(s).unwrap_or_else(|| {
        tracing::error!("Invalid role in database: '{}'", s);
        Role::User
    })
}

/// Maps SQLite constraint failures (duplicate email, bad foreign key) to
/// a distinct error kind so callers never surface a raw storage error.
fn map_constraint(e: rusqlite::Error, what: &str) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::ConstraintViolation(what.to_string())
        }
        e => Error::from(e),
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        role: parse_role(&row.get::<_, String>(5)?),
        created_at: parse_datetime(&row.get::<_, String>(6)?),
        updated_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &NewUser) -> Result<User> {
        let conn = self.conn();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO users (email, password_hash, first_name, last_name, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                user.email,
                user.password_hash,
                user.first_name,
                user.last_name,
                user.role.as_str(),
                format_datetime(&now),
            ],
        )
        .map_err(|e| map_constraint(e, "email already in use"))?;

        Ok(User {
            id: conn.last_insert_rowid(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;

        let rows = stmt.query_map([], user_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_user(&self, id: i64, email: &str, first_name: &str, last_name: &str) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE users SET email = ?1, first_name = ?2, last_name = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    email,
                    first_name,
                    last_name,
                    format_datetime(&Utc::now()),
                    id
                ],
            )
            .map_err(|e| map_constraint(e, "email already in use"))?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_user(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM locations WHERE trip_id IN (SELECT id FROM trips WHERE user_id = ?1)",
            params![id],
        )?;
        tx.execute("DELETE FROM trips WHERE user_id = ?1", params![id])?;
        let rows = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    fn has_admin_user(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'ADMIN'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Trip operations

    fn create_trip(&self, owner_id: i64, name: &str, location_names: &[String]) -> Result<i64> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let owner: Option<i64> = tx
            .query_row(
                "SELECT id FROM users WHERE id = ?1",
                params![owner_id],
                |row| row.get(0),
            )
            .optional()?;
        if owner.is_none() {
            return Err(Error::OwnerNotFound);
        }

        let now = format_datetime(&Utc::now());
        tx.execute(
            "INSERT INTO trips (user_id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![owner_id, name, now],
        )?;
        let trip_id = tx.last_insert_rowid();

        for (position, location) in location_names.iter().enumerate() {
            tx.execute(
                "INSERT INTO locations (trip_id, name, position, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![trip_id, location, position as i64, now],
            )?;
        }

        tx.commit()?;
        Ok(trip_id)
    }

    fn list_trips(&self, owner_id: i64) -> Result<Vec<TripSummary>> {
        let conn = self.conn();
        let mut trip_stmt =
            conn.prepare("SELECT id, name FROM trips WHERE user_id = ?1 ORDER BY id")?;
        let mut loc_stmt =
            conn.prepare("SELECT name FROM locations WHERE trip_id = ?1 ORDER BY position")?;

        let trips = trip_stmt
            .query_map(params![owner_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(trips.len());
        for (trip_id, name) in trips {
            let locations = loc_stmt
                .query_map(params![trip_id], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            summaries.push(TripSummary {
                trip_id,
                name,
                locations,
            });
        }

        Ok(summaries)
    }

    fn get_trip_owner(&self, trip_id: i64) -> Result<Option<i64>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT user_id FROM trips WHERE id = ?1",
            params![trip_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_trip(&self, trip_id: i64) -> Result<bool> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Locations first so the trip row never outlives an orphan window
        tx.execute("DELETE FROM locations WHERE trip_id = ?1", params![trip_id])?;
        let rows = tx.execute("DELETE FROM trips WHERE id = ?1", params![trip_id])?;

        tx.commit()?;
        Ok(rows > 0)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
