mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Creates the schema. Safe to call against an already-initialized
    /// database; existing rows are untouched.
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &NewUser) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn list_users(&self) -> Result<Vec<User>>;
    /// Updates email and name fields only. Role and password are not
    /// reachable through this path.
    fn update_user(&self, id: i64, email: &str, first_name: &str, last_name: &str) -> Result<()>;
    /// Deletes the user and cascades to their trips and locations in a
    /// single transaction.
    fn delete_user(&self, id: i64) -> Result<bool>;
    fn has_admin_user(&self) -> Result<bool>;

    // Trip operations
    /// Inserts a trip and one location row per name, all-or-nothing.
    /// Fails with `OwnerNotFound` when `owner_id` does not reference an
    /// existing user. Returns the generated trip id.
    fn create_trip(&self, owner_id: i64, name: &str, location_names: &[String]) -> Result<i64>;
    /// Every trip owned by `owner_id`, each with its location names in
    /// saved order. Empty vec when the owner has no trips.
    fn list_trips(&self, owner_id: i64) -> Result<Vec<TripSummary>>;
    fn get_trip_owner(&self, trip_id: i64) -> Result<Option<i64>>;
    /// Deletes the trip's locations and then the trip itself in a single
    /// transaction. Returns false when the trip does not exist.
    fn delete_trip(&self, trip_id: i64) -> Result<bool>;

    fn close(&self) -> Result<()>;
}
