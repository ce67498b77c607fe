use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::connection::DbConnection;
use crate::db::map_unique_violation;
use crate::db::models::{NewUser, Role, User, parse_timestamp};
use crate::error::HubError;

const USER_COLUMNS: &str =
    "id, email, name, first_name, last_name, role, password_hash, created_at, updated_at";

/// Message surfaced when an email is already registered.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "User already exists";

#[derive(Clone)]
pub struct UsersStorage {
    db: DbConnection,
}

impl UsersStorage {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, user: NewUser) -> Result<User, HubError> {
        let pool = self.db.ensure_connected().await?;
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(&format!(
            r#"INSERT INTO users (
                email, name, first_name, last_name, role, password_hash, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}"#
        ))
        .bind(user.email)
        .bind(user.name)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.role.as_str())
        .bind(user.password_hash)
        .bind(&now)
        .bind(&now)
        .fetch_one(&pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_ACCOUNT_MESSAGE))?;
        Ok(Self::row_to_model(row)?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, HubError> {
        let pool = self.db.ensure_connected().await?;
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&pool)
            .await?;
        Ok(row.map(Self::row_to_model).transpose()?)
    }

    fn row_to_model(row: SqliteRow) -> Result<User, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            role: role
                .parse::<Role>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
