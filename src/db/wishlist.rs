use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::connection::DbConnection;
use crate::db::map_unique_violation;
use crate::db::models::{WishlistItem, parse_timestamp, require};
use crate::error::HubError;

#[derive(Clone)]
pub struct WishlistStorage {
    db: DbConnection,
}

impl WishlistStorage {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Add `course` to `user`'s wishlist. A pair that is already present is
    /// rejected with `Conflict`.
    pub async fn add(&self, user: &str, course: &str) -> Result<WishlistItem, HubError> {
        require("user", user)?;
        require("course", course)?;
        let pool = self.db.ensure_connected().await?;
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"INSERT INTO wishlists (user_id, course_id, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               RETURNING id, user_id, course_id, created_at, updated_at"#,
        )
        .bind(user)
        .bind(course)
        .bind(&now)
        .bind(&now)
        .fetch_one(&pool)
        .await
        .map_err(|e| map_unique_violation(e, "Course is already in the wishlist"))?;
        Ok(Self::row_to_model(row)?)
    }

    pub async fn list_for_user(&self, user: &str) -> Result<Vec<WishlistItem>, HubError> {
        let pool = self.db.ensure_connected().await?;
        let rows = sqlx::query(
            r#"SELECT id, user_id, course_id, created_at, updated_at
               FROM wishlists WHERE user_id = ? ORDER BY id"#,
        )
        .bind(user)
        .fetch_all(&pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Self::row_to_model)
            .collect::<Result<_, _>>()?)
    }

    /// Returns whether the pair was present.
    pub async fn remove(&self, user: &str, course: &str) -> Result<bool, HubError> {
        let pool = self.db.ensure_connected().await?;
        let res = sqlx::query("DELETE FROM wishlists WHERE user_id = ? AND course_id = ?")
            .bind(user)
            .bind(course)
            .execute(&pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    fn row_to_model(row: SqliteRow) -> Result<WishlistItem, sqlx::Error> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(WishlistItem {
            id: row.try_get("id")?,
            user: row.try_get("user_id")?,
            course: row.try_get("course_id")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
