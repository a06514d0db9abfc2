//! Shared helpers for the feature modules.
//!
//! - [`associations`]: transactional replace of tag and category sets
//! - [`transaction`]: time-bounded write transactions and error translation
//! - [`background`]: fire-and-forget side effects

pub mod associations;
pub mod background;
pub mod transaction;
