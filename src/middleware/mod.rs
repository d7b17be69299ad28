pub mod auth;
pub mod csrf;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use csrf::{csrf_middleware, CSRF_HEADER};
pub use response::{ApiResponse, ApiResult};
