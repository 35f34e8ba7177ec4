//! # Portal Core
//!
//! Core types, errors, and utilities shared by every portal crate.
//!
//! - [`errors`]: [`AppError`], the HTTP-facing error type
//! - [`pagination`]: page/offset query parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: serde helpers for query strings and partial updates
//!
//! # Example
//!
//! ```ignore
//! use portal_core::{AppError, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Student not found"));
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::{AppError, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
