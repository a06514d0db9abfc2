pub mod auth;
pub mod categories;
pub mod courses;
pub mod documents;
pub mod events;
pub mod images;
pub mod tags;
