// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation and token acquisition under the API prefix, plus the
// service info and health endpoints at the root.
pub mod auth;
pub mod service;

pub use auth::*;
pub use service::{health, root};
