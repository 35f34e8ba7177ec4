//! Portal account models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A portal account. Students and administrators both sign in as users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// External identity provider id, when the account was provisioned from one.
    pub uid: Option<String>,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The public view of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: i64,
    pub uid: Option<String>,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            uid: user.uid,
            email: user.email,
            name: user.name,
            is_admin: user.is_admin,
        }
    }
}
