// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth): account creation, sign-in, token refresh, service info.
// Protected (bearer token + CSRF on writes): todos, lists, own account.
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{self, Validations};

/// Parses a path identifier, rejecting malformed values with a 400.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::from(Validations::new().with("id", validation::object_id(raw))))
}
