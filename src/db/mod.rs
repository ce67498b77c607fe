//! Database module: connection lifecycle, schema registry and per-entity
//! storage.
//!
//! Layout:
//! - `connection.rs`: lazily connected, single-flight pool owner
//! - `schema.rs`: SQL DDL for every entity, registered in a fixed order
//! - `models.rs`: Rust structs mirroring DB rows plus insert-time validation
//! - `notes.rs`, `payouts.rs`, `wishlist.rs`, `users.rs`: storage per entity

pub mod connection;
pub mod models;
pub mod notes;
pub mod payouts;
pub mod schema;
pub mod users;
pub mod wishlist;

use sqlx::{Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

pub use connection::DbConnection;
pub use models::{
    NewNote, NewPayout, NewUser, Note, Payout, PayoutStatus, Role, User, WishlistItem,
};
pub use notes::NotesStorage;
pub use payouts::PayoutsStorage;
pub use users::UsersStorage;
pub use wishlist::WishlistStorage;

use crate::error::HubError;

/// Map a unique-constraint violation to `Conflict`, everything else to
/// `Database`.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> HubError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            HubError::Conflict(message.to_string())
        }
        _ => HubError::Database(err),
    }
}
