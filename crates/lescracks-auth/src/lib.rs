//! # LesCracks Auth
//!
//! Signed, time-limited bearer tokens identifying an admin.
//!
//! Tokens are HS256 JWTs carrying the admin id (`sub`), email, issue time and
//! expiry. Nothing is stored server-side, so a token stays valid until it
//! expires; logging out is purely a client-side discard.
//!
//! ```ignore
//! use lescracks_auth::{issue_token, verify_token};
//!
//! let token = issue_token(admin.id, &admin.email, &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! assert_eq!(claims.admin_id()?, admin.id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{issue_token, issue_token_at, verify_token};
pub use lescracks_core::AuthError;
