use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::{ProgressUpdate, User};

/// Request body for login and signup. Fields are optional so that a missing
/// field is reported as an invalid request rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields, if present and non-empty.
    pub fn non_empty(&self) -> Option<(&str, &str)> {
        match (self.name.as_deref(), self.password.as_deref()) {
            (Some(name), Some(password)) if !name.is_empty() && !password.is_empty() => {
                Some((name, password))
            }
            _ => None,
        }
    }
}

/// Request body for the progress update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub check_point: Option<i32>,
    #[serde(default)]
    pub high_score: Option<i32>,
}

impl From<ProgressRequest> for ProgressUpdate {
    fn from(r: ProgressRequest) -> Self {
        Self {
            check_point: r.check_point,
            high_score: r.high_score,
        }
    }
}

/// Response returned after login or signup.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// User record without the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub name: String,
    pub check_point: i32,
    pub high_score: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            check_point: u.check_point,
            high_score: u.high_score,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_drops_password() {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: 1,
            name: "mario".into(),
            password_hash: "$argon2id$secret".into(),
            check_point: 2,
            high_score: 300,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PublicUser::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["checkPoint"], 2);
        assert_eq!(json["highScore"], 300);
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn credentials_require_both_fields() {
        let empty_name = CredentialsRequest {
            name: Some(String::new()),
            password: Some("pw".into()),
        };
        assert!(empty_name.non_empty().is_none());
        assert!(CredentialsRequest::default().non_empty().is_none());

        let ok = CredentialsRequest {
            name: Some("luigi".into()),
            password: Some("pw".into()),
        };
        assert_eq!(ok.non_empty(), Some(("luigi", "pw")));
    }

    #[test]
    fn progress_request_treats_null_as_omitted() {
        let req: ProgressRequest =
            serde_json::from_str(r#"{"checkPoint": 3, "highScore": null}"#).unwrap();
        let update = ProgressUpdate::from(req);
        assert_eq!(update.check_point, Some(3));
        assert_eq!(update.high_score, None);
    }
}
