//! Entity schemas, registered once per connection in a fixed order.
//!
//! Tables are declared `STRICT`, so SQLite rejects values of the wrong type
//! as well as queries naming columns that do not exist. Every statement uses
//! `IF NOT EXISTS`; registering against a database that already has the
//! tables reuses them.

use tracing::debug;

use crate::db::SqlitePool;
use crate::error::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub name: &'static str,
    pub ddl: &'static str,
}

/// Tables are created in this order on every connect.
pub const REGISTRY: &[EntitySchema] = &[USERS, NOTES, PAYOUTS, WISHLISTS];

pub const USERS: EntitySchema = EntitySchema {
    name: "users",
    ddl: r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL
) STRICT;
"#,
};

pub const NOTES: EntitySchema = EntitySchema {
    name: "notes",
    ddl: r#"
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    section_id TEXT NOT NULL,
    lecture_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_notes_user_lecture ON notes(user_id, lecture_id);
"#,
};

pub const PAYOUTS: EntitySchema = EntitySchema {
    name: "payouts",
    ddl: r#"
CREATE TABLE IF NOT EXISTS payouts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    instructor TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount >= 0),
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'approved', 'paid')),
    method TEXT NULL,
    processed_at TEXT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_payouts_instructor ON payouts(instructor);
"#,
};

pub const WISHLISTS: EntitySchema = EntitySchema {
    name: "wishlists",
    ddl: r#"
CREATE TABLE IF NOT EXISTS wishlists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    course_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (user_id, course_id)
) STRICT;
"#,
};

pub fn lookup(name: &str) -> Option<&'static EntitySchema> {
    REGISTRY.iter().find(|s| s.name == name)
}

/// Execute every registered DDL statement in registry order.
pub async fn register_all(pool: &SqlitePool) -> Result<(), HubError> {
    for schema in REGISTRY {
        // sqlx::query runs one statement at a time
        for stmt in schema.ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(pool).await?;
        }
        debug!(entity = schema.name, "schema registered");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_names_are_unique() {
        let names: HashSet<_> = REGISTRY.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), REGISTRY.len());
    }

    #[test]
    fn registry_order_and_lookup() {
        assert_eq!(REGISTRY.first().map(|s| s.name), Some("users"));
        assert_eq!(lookup("wishlists"), Some(&WISHLISTS));
        assert!(lookup("courses").is_none());
    }
}
