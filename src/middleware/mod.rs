//! Request authentication.
//!
//! Protected handlers take a [`auth::CurrentAdmin`] argument. Routers that are
//! protected as a whole use [`auth::require_auth`] as a route layer, which
//! authenticates once and leaves the admin in the request extensions for any
//! `CurrentAdmin` extractor further down.
//!
//! ```ignore
//! async fn create_tag(CurrentAdmin(admin): CurrentAdmin, ...) -> Result<..., AppError> {
//!     // only runs for a valid token whose admin still exists
//! }
//! ```

pub mod auth;
