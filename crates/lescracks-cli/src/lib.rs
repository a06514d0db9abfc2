//! # LesCracks CLI
//!
//! Admin provisioning and database seeding for development.
//!
//! ```ignore
//! use lescracks_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(8, 20).with_courses(50);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
