use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
///
/// Serializes with the stored hash under `password`; anything handed to a
/// client should go through [`crate::auth::dto::PublicUser`] instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    #[serde(rename = "password")]
    #[sqlx(rename = "password")]
    pub password_hash: String, // Argon2 PHC string
    pub check_point: i32,
    pub high_score: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial progress update; `None` leaves the column untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub check_point: Option<i32>,
    pub high_score: Option<i32>,
}
