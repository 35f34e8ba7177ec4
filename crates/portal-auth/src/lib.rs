//! # Portal Auth
//!
//! Access control for the student portal.
//!
//! - [`claims`]: the identity carried in access tokens
//! - [`jwt`]: minting tokens and the [`TokenVerifier`]
//! - [`routes`]: which path prefixes belong to which [`Feature`](portal_models::Feature)
//! - [`gate`]: the [`FeatureAccessGate`] deciding whether a request may reach a feature
//!
//! # Example
//!
//! ```ignore
//! use portal_auth::{Decision, FeatureAccessGate, FeatureRouteMap, TokenVerifier};
//!
//! let gate = FeatureAccessGate::new(
//!     FeatureRouteMap::from_config(&gate_config)?,
//!     gate_config.mode,
//!     TokenVerifier::new(&jwt_config),
//!     access_store,
//!     student_directory,
//! );
//!
//! match gate.authorize("/dashboard/library", Some(&token)).await {
//!     Decision::Allow | Decision::PassThrough => { /* continue */ }
//!     Decision::Deny(reason) => { /* reject */ }
//! }
//! ```

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod routes;

pub use claims::TokenClaims;
pub use gate::{Decision, DenyReason, FeatureAccessGate};
pub use jwt::{InvalidCredential, TokenVerifier, create_access_token, is_absent_token};
pub use routes::{FeatureRouteMap, RouteMapError};
