//! Administrative operations behind the CLI commands.

use anyhow::{Context, anyhow, bail};
use portal_auth::{TokenClaims, create_access_token};
use portal_config::JwtConfig;
use portal_core::hash_password;
use portal_db::{AccessControlStore, PgAccessControlStore};
use portal_models::{
    AccessControlRecord, NewAccessControl, StudentStatus, UpdateAccessControl,
    UpdateAccessControlDto, User, UserInfo,
};
use sqlx::PgPool;

/// Creates an administrator account and returns its id.
pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<i64> {
    let hashed_password =
        hash_password(password).map_err(|e| anyhow!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password, is_admin)
         VALUES ($1, LOWER($2), $3, TRUE)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin user")?;

    user_id.ok_or_else(|| anyhow!("User with this email already exists"))
}

/// Signs an access token for an existing user.
pub async fn issue_token(db: &PgPool, user_id: i64, jwt_config: &JwtConfig) -> anyhow::Result<String> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user")?
        .ok_or_else(|| anyhow!("User {} not found", user_id))?;

    let claims = TokenClaims::for_user(&UserInfo::from(user), jwt_config);
    create_access_token(&claims, jwt_config).map_err(|e| anyhow!("{}", e.error))
}

/// Parses a `--status` value. `none` clears the status.
pub fn parse_status(value: &str) -> anyhow::Result<Option<StudentStatus>> {
    match value {
        "none" => Ok(None),
        other => other
            .parse::<StudentStatus>()
            .map(Some)
            .map_err(|e| anyhow!(e)),
    }
}

/// Applies `dto` to the student's record, creating an empty record first if
/// the student has none.
pub async fn set_access(
    db: &PgPool,
    student_id: i64,
    dto: UpdateAccessControlDto,
) -> anyhow::Result<AccessControlRecord> {
    if dto.is_empty() {
        bail!("Nothing to change: pass at least one of --course, --library, --exams, --status");
    }

    let store = PgAccessControlStore::new(db.clone());
    let existing = store
        .ensure_for_student(student_id, NewAccessControl::default())
        .await
        .with_context(|| format!("Failed to load access control for student {}", student_id))?;

    store
        .update(&UpdateAccessControl::new(existing.id, dto))
        .await
        .context("Failed to update access control")?
        .ok_or_else(|| anyhow!("Access control record {} disappeared", existing.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("none").unwrap(), None);
        assert_eq!(
            parse_status("dropped_out").unwrap(),
            Some(StudentStatus::DroppedOut)
        );
        assert!(parse_status("expelled").is_err());
    }
}
