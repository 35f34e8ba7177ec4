//! Access token claims.

use portal_config::JwtConfig;
use portal_models::UserInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity carried in an access token.
///
/// Keys are camelCase (`userId`, `isAdmin`) to match tokens issued by the
/// login flow and existing clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Account id (`users.id`)
    pub user_id: i64,
    /// External identity provider id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for `user`, issued now and expiring after the configured lifetime.
    pub fn for_user(user: &UserInfo, jwt_config: &JwtConfig) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            user_id: user.id,
            uid: user.uid.clone(),
            email: Some(user.email.clone()),
            name: user.name.clone(),
            is_admin: Some(user.is_admin),
            iat: now,
            exp: now + jwt_config.access_token_expiry,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_keys() {
        let claims = TokenClaims {
            user_id: 12,
            uid: None,
            email: Some("a@example.edu".into()),
            name: "Ada".into(),
            is_admin: Some(true),
            iat: 1,
            exp: 2,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 12);
        assert_eq!(json["isAdmin"], true);
        assert!(json.get("uid").is_none());
    }

    #[test]
    fn test_optional_fields_may_be_missing() {
        let claims: TokenClaims =
            serde_json::from_str(r#"{"userId":3,"name":"Bo","iat":1,"exp":2}"#).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.is_admin, None);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_for_user_uses_configured_expiry() {
        let user = UserInfo {
            id: 9,
            uid: Some("ext-9".into()),
            email: "s@example.edu".into(),
            name: "Sam".into(),
            is_admin: false,
        };
        let config = JwtConfig {
            secret: "test-secret".into(),
            access_token_expiry: 900,
            leeway: 0,
        };

        let claims = TokenClaims::for_user(&user, &config);
        assert_eq!(claims.user_id, 9);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.is_admin, Some(false));
    }
}
