//! Token compatibility checks against the public auth API.

use jsonwebtoken::{EncodingKey, Header, encode};
use portal_auth::{InvalidCredential, TokenClaims, TokenVerifier, create_access_token};
use portal_config::JwtConfig;
use portal_models::UserInfo;
use serde_json::json;

fn config() -> JwtConfig {
    JwtConfig {
        secret: "unit-test-secret-key-with-32-characters".to_string(),
        access_token_expiry: 900,
        leeway: 0,
    }
}

#[test]
fn test_externally_issued_camel_case_token_verifies() {
    let config = config();
    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::default(),
        &json!({
            "userId": 77,
            "uid": "firebase-77",
            "email": "s77@example.edu",
            "name": "Student 77",
            "isAdmin": false,
            "iat": now,
            "exp": now + 60,
        }),
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    let claims = TokenVerifier::new(&config).verify(&token).unwrap();
    assert_eq!(claims.user_id, 77);
    assert_eq!(claims.uid.as_deref(), Some("firebase-77"));
    assert!(!claims.is_admin());
}

#[test]
fn test_claims_for_user_expire_after_configured_lifetime() {
    let config = config();
    let user = UserInfo {
        id: 3,
        uid: None,
        email: "admin@example.edu".to_string(),
        name: "Admin".to_string(),
        is_admin: true,
    };

    let claims = TokenClaims::for_user(&user, &config);
    assert_eq!(claims.exp - claims.iat, 900);
    assert!(claims.is_admin());

    let token = create_access_token(&claims, &config).unwrap();
    assert_eq!(TokenVerifier::new(&config).verify(&token), Ok(claims));
}

#[test]
fn test_token_signed_with_other_algorithm_is_rejected() {
    let config = config();
    let now = chrono::Utc::now().timestamp();
    let token = encode(
        &Header::new(jsonwebtoken::Algorithm::HS512),
        &json!({"userId": 1, "name": "x", "iat": now, "exp": now + 60}),
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    assert_eq!(TokenVerifier::new(&config).verify(&token), Err(InvalidCredential));
}
