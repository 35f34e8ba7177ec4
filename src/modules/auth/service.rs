use anyhow::Context;
use portal_auth::{TokenClaims, create_access_token};
use portal_config::JwtConfig;
use portal_core::{AppError, verify_password};
use portal_models::{LoginRequest, LoginResponse, User, UserInfo};
use portal_observability::{track_jwt_issued, track_user_login_failure, track_user_login_success};
use sqlx::PgPool;
use tracing::instrument;

pub struct AuthService;

impl AuthService {
    fn invalid_credentials() -> AppError {
        AppError::unauthorized("Invalid email or password".to_string())
            .with_code("invalid_credentials")
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, uid, email, name, password, is_admin, created_at, updated_at
               FROM users
               WHERE LOWER(email) = LOWER($1)"#,
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user by email")
        .map_err(AppError::database)?;

        let Some(user) = user else {
            track_user_login_failure("unknown_email");
            return Err(Self::invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure("invalid_password");
            return Err(Self::invalid_credentials());
        }

        let user = UserInfo::from(user);
        let claims = TokenClaims::for_user(&user, jwt_config);
        let access_token = create_access_token(&claims, jwt_config)?;

        track_jwt_issued();
        track_user_login_success(if user.is_admin { "admin" } else { "student" });
        tracing::info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            user,
        })
    }
}
