//! Student dashboard pages as JSON payloads.
//!
//! Restricted pages sit behind the feature gate; every page also requires a
//! valid token of its own.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::init_dashboard_router;
