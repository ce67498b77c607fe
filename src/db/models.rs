use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(HubError::Validation(format!("unknown role `{other}`"))),
        }
    }
}

/// Persisted account. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub user_id: String,
    pub course_id: String,
    pub section_id: String,
    pub lecture_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub user_id: String,
    pub course_id: String,
    pub section_id: String,
    pub lecture_id: String,
    pub content: String,
}

impl NewNote {
    pub fn validate(&self) -> Result<(), HubError> {
        require("userId", &self.user_id)?;
        require("courseId", &self.course_id)?;
        require("sectionId", &self.section_id)?;
        require("lectureId", &self.lecture_id)?;
        require("content", &self.content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Approved,
    Paid,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayoutStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PayoutStatus::Pending),
            "approved" => Ok(PayoutStatus::Approved),
            "paid" => Ok(PayoutStatus::Paid),
            other => Err(HubError::Validation(format!(
                "`{other}` is not a valid payout status"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: i64,
    pub instructor: String,
    pub amount: f64,
    pub status: PayoutStatus,
    pub method: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayout {
    pub instructor: String,
    pub amount: f64,
    /// Defaults to `pending` when omitted.
    #[serde(default)]
    pub status: Option<PayoutStatus>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
}

impl NewPayout {
    pub fn validate(&self) -> Result<(), HubError> {
        require("instructor", &self.instructor)?;
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(HubError::Validation(
                "amount must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: i64,
    pub user: String,
    pub course: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), HubError> {
    if value.trim().is_empty() {
        return Err(HubError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_requires_every_reference() {
        let note = NewNote {
            user_id: "u1".into(),
            course_id: "c1".into(),
            section_id: " ".into(),
            lecture_id: "l1".into(),
            content: "hello".into(),
        };
        let err = note.validate().unwrap_err();
        assert_eq!(err.to_string(), "sectionId is required");
    }

    #[test]
    fn payout_status_parses_known_values_only() {
        assert_eq!("paid".parse::<PayoutStatus>().ok(), Some(PayoutStatus::Paid));
        assert!("refunded".parse::<PayoutStatus>().is_err());
        assert_eq!(PayoutStatus::default(), PayoutStatus::Pending);
    }

    #[test]
    fn payout_rejects_negative_amount() {
        let payout = NewPayout {
            instructor: "i1".into(),
            amount: -1.0,
            ..Default::default()
        };
        assert!(matches!(payout.validate(), Err(HubError::Validation(_))));
    }

    #[test]
    fn user_json_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 1,
            email: "a@b.c".into(),
            name: "A B".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            role: Role::Admin,
            password_hash: "$2b$10$secret".into(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "admin");
        assert_eq!(json["firstName"], "A");
    }
}
