use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::db::connection::DbConnection;
use crate::db::models::{NewPayout, Payout, PayoutStatus, parse_timestamp};
use crate::error::HubError;

const PAYOUT_COLUMNS: &str =
    "id, instructor, amount, status, method, processed_at, created_at, updated_at";

#[derive(Clone)]
pub struct PayoutsStorage {
    db: DbConnection,
}

impl PayoutsStorage {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, payout: NewPayout) -> Result<Payout, HubError> {
        payout.validate()?;
        let pool = self.db.ensure_connected().await?;
        let now = Utc::now().to_rfc3339();
        let status = payout.status.unwrap_or_default();
        let row = sqlx::query(&format!(
            r#"INSERT INTO payouts (
                instructor, amount, status, method, processed_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {PAYOUT_COLUMNS}"#
        ))
        .bind(payout.instructor)
        .bind(payout.amount)
        .bind(status.as_str())
        .bind(payout.method)
        .bind(payout.processed_at.map(|t| t.to_rfc3339()))
        .bind(&now)
        .bind(&now)
        .fetch_one(&pool)
        .await?;
        Ok(Self::row_to_model(row)?)
    }

    pub async fn get(&self, id: i64) -> Result<Payout, HubError> {
        let pool = self.db.ensure_connected().await?;
        let row = sqlx::query(&format!("SELECT {PAYOUT_COLUMNS} FROM payouts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| HubError::NotFound(format!("payout {id}")))?;
        Ok(Self::row_to_model(row)?)
    }

    pub async fn list_for_instructor(&self, instructor: &str) -> Result<Vec<Payout>, HubError> {
        let pool = self.db.ensure_connected().await?;
        let rows = sqlx::query(&format!(
            "SELECT {PAYOUT_COLUMNS} FROM payouts WHERE instructor = ? ORDER BY id"
        ))
        .bind(instructor)
        .fetch_all(&pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Self::row_to_model)
            .collect::<Result<_, _>>()?)
    }

    /// Move a payout to `status`. Reaching `paid` stamps `processed_at`
    /// unless it was already set.
    pub async fn set_status(&self, id: i64, status: PayoutStatus) -> Result<Payout, HubError> {
        let pool = self.db.ensure_connected().await?;
        let now = Utc::now().to_rfc3339();
        let processed_at = (status == PayoutStatus::Paid).then(|| now.clone());
        let row = sqlx::query(&format!(
            r#"UPDATE payouts SET
                status = ?,
                processed_at = COALESCE(processed_at, ?),
                updated_at = ?
              WHERE id = ?
              RETURNING {PAYOUT_COLUMNS}"#
        ))
        .bind(status.as_str())
        .bind(processed_at)
        .bind(&now)
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| HubError::NotFound(format!("payout {id}")))?;
        Ok(Self::row_to_model(row)?)
    }

    fn row_to_model(row: SqliteRow) -> Result<Payout, sqlx::Error> {
        let status: String = row.try_get("status")?;
        let processed_at: Option<String> = row.try_get("processed_at")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let status = status
            .parse::<PayoutStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let processed_at = processed_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(Payout {
            id: row.try_get("id")?,
            instructor: row.try_get("instructor")?,
            amount: row.try_get("amount")?,
            status,
            method: row.try_get("method")?,
            processed_at,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}
