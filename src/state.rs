use std::fmt;
use std::sync::Arc;

use portal_auth::{FeatureAccessGate, FeatureRouteMap, RouteMapError, TokenVerifier};
use portal_config::{CorsConfig, JwtConfig, RateLimitConfig};
use portal_db::{
    AccessControlStore, PgAccessControlStore, PgPool, PgStudentDirectory, StudentDirectory,
};

use crate::config::AppConfig;

/// The access-control data accessors the gate and handlers share.
#[derive(Clone)]
pub struct Stores {
    pub access_control: Arc<dyn AccessControlStore>,
    pub students: Arc<dyn StudentDirectory>,
}

impl Stores {
    pub fn new(
        access_control: Arc<dyn AccessControlStore>,
        students: Arc<dyn StudentDirectory>,
    ) -> Self {
        Self {
            access_control,
            students,
        }
    }

    pub fn postgres(pool: &PgPool) -> Self {
        Self::new(
            Arc::new(PgAccessControlStore::new(pool.clone())),
            Arc::new(PgStudentDirectory::new(pool.clone())),
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub verifier: TokenVerifier,
    pub gate: Arc<FeatureAccessGate>,
    pub access_control: Arc<dyn AccessControlStore>,
    pub students: Arc<dyn StudentDirectory>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("jwt_config.access_token_expiry", &self.jwt_config.access_token_expiry)
            .field("cors_config", &self.cors_config)
            .field("rate_limit_config", &self.rate_limit_config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the gate and verifier from `config`.
    ///
    /// # Errors
    ///
    /// Fails when the configured route table names an unknown feature.
    pub fn new(db: PgPool, stores: Stores, config: &AppConfig) -> Result<Self, RouteMapError> {
        let routes = FeatureRouteMap::from_config(&config.gate)?;
        let verifier = TokenVerifier::new(&config.jwt);
        let gate = FeatureAccessGate::new(
            routes,
            config.gate.mode,
            verifier.clone(),
            stores.access_control.clone(),
            stores.students.clone(),
        );

        Ok(Self {
            db,
            jwt_config: config.jwt.clone(),
            cors_config: config.cors.clone(),
            rate_limit_config: config.rate_limit.clone(),
            verifier,
            gate: Arc::new(gate),
            access_control: stores.access_control,
            students: stores.students,
        })
    }
}
