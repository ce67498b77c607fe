use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::connection::DbConnection;
use crate::db::models::{NewNote, Note, parse_timestamp, require};
use crate::error::HubError;

const NOTE_COLUMNS: &str =
    "id, user_id, course_id, section_id, lecture_id, content, created_at, updated_at";

#[derive(Clone)]
pub struct NotesStorage {
    db: DbConnection,
}

impl NotesStorage {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, note: NewNote) -> Result<Note, HubError> {
        note.validate()?;
        let pool = self.db.ensure_connected().await?;
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(&format!(
            r#"INSERT INTO notes (
                user_id, course_id, section_id, lecture_id, content, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {NOTE_COLUMNS}"#
        ))
        .bind(note.user_id)
        .bind(note.course_id)
        .bind(note.section_id)
        .bind(note.lecture_id)
        .bind(note.content)
        .bind(&now)
        .bind(&now)
        .fetch_one(&pool)
        .await?;
        Ok(Self::row_to_model(row)?)
    }

    pub async fn get(&self, id: i64) -> Result<Note, HubError> {
        let pool = self.db.ensure_connected().await?;
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| HubError::NotFound(format!("note {id}")))?;
        Ok(Self::row_to_model(row)?)
    }

    /// Notes a user took on one lecture, oldest first.
    pub async fn list_for_lecture(
        &self,
        user_id: &str,
        lecture_id: &str,
    ) -> Result<Vec<Note>, HubError> {
        let pool = self.db.ensure_connected().await?;
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? AND lecture_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .bind(lecture_id)
        .fetch_all(&pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Self::row_to_model)
            .collect::<Result<_, _>>()?)
    }

    pub async fn update_content(&self, id: i64, content: &str) -> Result<Note, HubError> {
        require("content", content)?;
        let pool = self.db.ensure_connected().await?;
        let row = sqlx::query(&format!(
            "UPDATE notes SET content = ?, updated_at = ? WHERE id = ? RETURNING {NOTE_COLUMNS}"
        ))
        .bind(content)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| HubError::NotFound(format!("note {id}")))?;
        Ok(Self::row_to_model(row)?)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, HubError> {
        let pool = self.db.ensure_connected().await?;
        let res = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    fn row_to_model(row: SqliteRow) -> Result<Note, sqlx::Error> {
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;
        Ok(Note {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            course_id: row.try_get("course_id")?,
            section_id: row.try_get("section_id")?,
            lecture_id: row.try_get("lecture_id")?,
            content: row.try_get("content")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
