//! # LesCracks Core
//!
//! Core types, errors, and utilities for the LesCracks API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error taxonomy with HTTP response conversion
//! - [`response`]: The `{success, data, message}` envelope, both for producing
//!   responses ([`ApiResponse`]) and for consuming them ([`ApiEnvelope`])
//! - [`password`]: bcrypt password hashing and verification
//! - [`file_storage`]: Storage backend for uploaded images
//! - [`serde`]: Custom serde deserialization helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use lescracks_core::errors::AppError;
//! use lescracks_core::password::{hash_password, verify_password};
//! use lescracks_core::response::ApiResponse;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! let body = ApiResponse::ok(course);
//! ```

pub mod errors;
pub mod file_storage;
pub mod password;
pub mod response;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError};
pub use password::{hash_password, hash_password_async, verify_password, verify_password_async};
pub use response::{ApiEnvelope, ApiResponse};
