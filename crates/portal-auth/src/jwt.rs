//! Minting and verifying access tokens.
//!
//! Tokens are HS256 JWTs signed with the shared secret from [`JwtConfig`].
//! Verification failures of every kind collapse into [`InvalidCredential`];
//! the underlying cause is only logged at `debug`.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use portal_config::JwtConfig;
use portal_core::AppError;

use crate::claims::TokenClaims;

/// The token could not be accepted. The cause is logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid credential")]
pub struct InvalidCredential;

/// True for values clients send when they have no token: blank,
/// `"undefined"` and `"null"`.
pub fn is_absent_token(token: &str) -> bool {
    matches!(token.trim(), "" | "undefined" | "null")
}

/// Signs `claims` into an access token.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(claims: &TokenClaims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Checks signature and expiry of access tokens.
///
/// Built once from [`JwtConfig`] at startup and shared; verification holds no
/// mutable state.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = jwt_config.leeway;

        Self {
            decoding_key: DecodingKey::from_secret(jwt_config.secret.as_bytes()),
            validation,
        }
    }

    /// Returns the claims of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, InvalidCredential> {
        if is_absent_token(token) {
            tracing::debug!("token rejected: empty");
            return Err(InvalidCredential);
        }

        decode::<TokenClaims>(token.trim(), &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!(kind = ?err.kind(), "token rejected");
                InvalidCredential
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
            leeway: 0,
        }
    }

    fn claims(exp_offset: i64) -> TokenClaims {
        let now = chrono::Utc::now().timestamp();
        TokenClaims {
            user_id: 42,
            uid: Some("ext-42".into()),
            email: Some("student@example.edu".into()),
            name: "Student".into(),
            is_admin: None,
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn test_placeholder_tokens_are_invalid() {
        let verifier = TokenVerifier::new(&config());
        for token in ["", "undefined", "null", "  ", " null "] {
            assert_eq!(verifier.verify(token), Err(InvalidCredential));
        }
    }

    #[test]
    fn test_fresh_token_round_trips_claims() {
        let config = config();
        let issued = claims(3600);
        let token = create_access_token(&issued, &config).unwrap();

        let verified = TokenVerifier::new(&config).verify(&token).unwrap();
        assert_eq!(verified, issued);
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let config = config();
        let token = create_access_token(&claims(-120), &config).unwrap();
        assert_eq!(TokenVerifier::new(&config).verify(&token), Err(InvalidCredential));
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let config = JwtConfig {
            leeway: 300,
            ..config()
        };
        let token = create_access_token(&claims(-120), &config).unwrap();
        assert!(TokenVerifier::new(&config).verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_access_token(&claims(3600), &config()).unwrap();
        let other = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..config()
        };
        assert_eq!(TokenVerifier::new(&other).verify(&token), Err(InvalidCredential));
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        let verifier = TokenVerifier::new(&config());
        assert_eq!(verifier.verify("not.a.jwt"), Err(InvalidCredential));
        assert_eq!(verifier.verify("garbage"), Err(InvalidCredential));
    }

    #[test]
    fn test_token_without_user_id_is_invalid() {
        #[derive(serde::Serialize)]
        struct Partial {
            name: String,
            iat: i64,
            exp: i64,
        }

        let config = config();
        let now = chrono::Utc::now().timestamp();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                name: "x".into(),
                iat: now,
                exp: now + 60,
            },
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert_eq!(TokenVerifier::new(&config).verify(&token), Err(InvalidCredential));
    }

    #[test]
    fn test_absent_token_detection() {
        assert!(is_absent_token("undefined"));
        assert!(is_absent_token(""));
        assert!(!is_absent_token("eyJ"));
    }
}
