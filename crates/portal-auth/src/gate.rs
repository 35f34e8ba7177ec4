//! Feature access gate.
//!
//! Decides, per request, whether the caller may reach a restricted portal
//! feature. The steps are:
//!
//! 1. classify the path against the [`FeatureRouteMap`]; unlisted paths pass through
//! 2. without a token, pass through ([`GateMode::Lenient`]) or deny ([`GateMode::Strict`])
//! 3. verify the token, resolve the student, load their access record
//! 4. deny terminal statuses, then allow iff the feature's flag is set
//!
//! Store failures deny. The gate keeps no mutable state, so the same inputs
//! against an unchanged record always give the same [`Decision`].

use std::fmt;
use std::sync::Arc;

use portal_config::GateMode;
use portal_db::{AccessControlStore, StudentDirectory};
use portal_models::Feature;

use crate::jwt::{TokenVerifier, is_absent_token};
use crate::routes::FeatureRouteMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    MissingCredential,
    InvalidCredential,
    StudentNotFound,
    RecordNotFound,
    InactiveStatus,
    FeatureNotGranted,
    LookupFailed,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::StudentNotFound => "student_not_found",
            Self::RecordNotFound => "record_not_found",
            Self::InactiveStatus => "inactive_status",
            Self::FeatureNotGranted => "feature_not_granted",
            Self::LookupFailed => "lookup_failed",
        }
    }

    /// Whether the caller failed to authenticate, as opposed to lacking permission.
    pub fn is_authentication(self) -> bool {
        matches!(self, Self::MissingCredential | Self::InvalidCredential)
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Restricted route, caller holds the feature.
    Allow,
    /// Not decided by the gate; the request continues unchanged.
    PassThrough,
    Deny(DenyReason),
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::PassThrough => "pass_through",
            Self::Deny(_) => "deny",
        }
    }
}

pub struct FeatureAccessGate {
    routes: Arc<FeatureRouteMap>,
    mode: GateMode,
    verifier: TokenVerifier,
    access: Arc<dyn AccessControlStore>,
    students: Arc<dyn StudentDirectory>,
}

impl fmt::Debug for FeatureAccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureAccessGate")
            .field("routes", &self.routes)
            .field("mode", &self.mode)
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl FeatureAccessGate {
    pub fn new(
        routes: impl Into<Arc<FeatureRouteMap>>,
        mode: GateMode,
        verifier: TokenVerifier,
        access: Arc<dyn AccessControlStore>,
        students: Arc<dyn StudentDirectory>,
    ) -> Self {
        Self {
            routes: routes.into(),
            mode,
            verifier,
            access,
            students,
        }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// The feature guarding `path`, if any.
    pub fn feature_for(&self, path: &str) -> Option<Feature> {
        self.routes.classify(path)
    }

    /// Decides whether a request for `path` carrying `token` may proceed.
    pub async fn authorize(&self, path: &str, token: Option<&str>) -> Decision {
        let Some(feature) = self.routes.classify(path) else {
            return Decision::PassThrough;
        };

        let token = match token {
            Some(token) if !is_absent_token(token) => token,
            _ => {
                return match self.mode {
                    GateMode::Lenient => {
                        tracing::debug!(
                            path,
                            feature = %feature,
                            "no credential on restricted route, passing through (lenient mode)"
                        );
                        Decision::PassThrough
                    }
                    GateMode::Strict => Decision::Deny(DenyReason::MissingCredential),
                };
            }
        };

        match self.decide(feature, token).await {
            Ok(()) => Decision::Allow,
            Err(reason) => {
                tracing::debug!(path, feature = %feature, reason = %reason, "access denied");
                Decision::Deny(reason)
            }
        }
    }

    async fn decide(&self, feature: Feature, token: &str) -> Result<(), DenyReason> {
        let claims = self
            .verifier
            .verify(token)
            .map_err(|_| DenyReason::InvalidCredential)?;

        let student_id = self
            .students
            .student_id_for_user(claims.user_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, user_id = claims.user_id, "student lookup failed");
                DenyReason::LookupFailed
            })?
            .ok_or(DenyReason::StudentNotFound)?;

        let record = self
            .access
            .fetch_by_student_id(student_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, student_id, "access control lookup failed");
                DenyReason::LookupFailed
            })?
            .ok_or(DenyReason::RecordNotFound)?;

        if record.is_terminal() {
            return Err(DenyReason::InactiveStatus);
        }
        if !record.grants(feature) {
            return Err(DenyReason::FeatureNotGranted);
        }

        Ok(())
    }
}
