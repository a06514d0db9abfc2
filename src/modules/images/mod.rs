pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_images_router, init_upload_router};
