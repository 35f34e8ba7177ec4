//! # Portal CLI
//!
//! Administrative commands and database seeding for the student portal.
//!
//! - [`admin`]: account creation, token issuing and access-control updates
//! - [`seeder`]: fake degrees, courses, books and students for development
//!
//! ```ignore
//! use portal_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::new(3)).await?;
//! ```

pub mod admin;
pub mod seeder;
